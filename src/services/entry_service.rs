//! Entry service

use uuid::Uuid;

use crate::{
    constants::{MAX_DESCRIPTION_LENGTH, MAX_FILE_PATH_LENGTH, MAX_NAME_LENGTH},
    error::{AppError, AppResult},
    models::{CompetitionEntry, EntryChanges, EntryStatus, NewEntry, Principal},
    services::{
        CompetitionService,
        authorization::{require_creator_or_admin, require_entry_editor, require_entry_remover},
    },
    state::AppState,
};

/// Entry service for contestant submissions
pub struct EntryService;

impl EntryService {
    /// Append an entry to an open competition.
    ///
    /// The store serializes order assignment; a unique-order rejection is
    /// still retried a bounded number of times.
    pub async fn add_entry(
        state: &AppState,
        competition_id: Uuid,
        entry: NewEntry,
    ) -> AppResult<CompetitionEntry> {
        let entry = validate_entry(entry)?;
        let max_attempts = state.config().rating.upsert_max_attempts;

        let mut attempt = 0;
        loop {
            attempt += 1;
            CompetitionService::get_open(state, competition_id).await?;

            match state
                .store()
                .insert_entry(competition_id, &entry, state.now())
                .await
            {
                Ok(created) => {
                    tracing::info!(
                        competition_id = %competition_id,
                        entry_id = %created.id,
                        display_order = created.display_order,
                        "Entry added"
                    );
                    return Ok(created);
                }
                Err(AppError::AlreadyExists(_)) if attempt < max_attempts => {
                    tracing::warn!(
                        competition_id = %competition_id,
                        attempt,
                        "Entry display order taken, retrying"
                    );
                }
                Err(AppError::AlreadyExists(_)) => {
                    return Err(AppError::Conflict(
                        "Could not assign an entry order, try again".to_string(),
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Contestant self-submission; the caller becomes the contestant
    pub async fn submit_entry(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
        name: String,
        description: Option<String>,
        file_path: Option<String>,
    ) -> AppResult<CompetitionEntry> {
        Self::add_entry(
            state,
            competition_id,
            NewEntry {
                name,
                description,
                file_path,
                contestant_id: Some(principal.id),
            },
        )
        .await
    }

    /// Bulk add by the creator or an admin, in request order
    pub async fn add_entries(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
        entries: Vec<NewEntry>,
    ) -> AppResult<Vec<CompetitionEntry>> {
        let competition = CompetitionService::get(state, competition_id).await?;
        require_creator_or_admin(principal, &competition)?;
        if entries.is_empty() {
            return Err(AppError::Validation(
                "At least one entry is required".to_string(),
            ));
        }

        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            created.push(Self::add_entry(state, competition_id, entry).await?);
        }
        Ok(created)
    }

    /// Get an entry, soft-deleted or not
    pub async fn get(state: &AppState, entry_id: Uuid) -> AppResult<CompetitionEntry> {
        state
            .store()
            .find_entry(entry_id)
            .await?
            .ok_or_else(|| AppError::not_found("Entry"))
    }

    /// Non-deleted entries in display order
    pub async fn list_active(
        state: &AppState,
        competition_id: Uuid,
        status: Option<EntryStatus>,
    ) -> AppResult<Vec<CompetitionEntry>> {
        CompetitionService::get(state, competition_id).await?;
        state
            .store()
            .list_active_entries(competition_id, status)
            .await
    }

    /// Moderation decision; any status may follow any other
    pub async fn set_status(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
        status: EntryStatus,
    ) -> AppResult<CompetitionEntry> {
        let entry = Self::get_active(state, entry_id).await?;
        let competition = CompetitionService::get(state, entry.competition_id).await?;
        require_creator_or_admin(principal, &competition)?;

        let updated = state
            .store()
            .update_entry_status(entry_id, status, state.now())
            .await?;

        tracing::info!(
            entry_id = %entry_id,
            from = %entry.status,
            to = %status,
            "Entry status changed"
        );
        Ok(updated)
    }

    /// Edit name, description or file reference
    pub async fn update_entry(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
        changes: EntryChanges,
    ) -> AppResult<CompetitionEntry> {
        let entry = Self::get_active(state, entry_id).await?;
        require_entry_editor(principal, &entry)?;
        validate_fields(
            changes.name.as_deref(),
            changes.description.as_deref(),
            changes.file_path.as_deref(),
        )?;
        if changes.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::Validation("Entry name must not be empty".to_string()));
        }

        state
            .store()
            .update_entry(entry_id, &changes, state.now())
            .await
    }

    /// Hide an entry from listings and aggregation; its ratings stay
    pub async fn soft_delete(state: &AppState, principal: &Principal, entry_id: Uuid) -> AppResult<()> {
        let entry = Self::get_active(state, entry_id).await?;
        let competition = state
            .store()
            .find_competition(entry.competition_id)
            .await?
            .ok_or_else(|| AppError::not_found("Competition"))?;
        require_entry_remover(principal, &competition, &entry)?;

        state.store().soft_delete_entry(entry_id, state.now()).await?;

        tracing::info!(entry_id = %entry_id, competition_id = %competition.id, "Entry deleted");
        Ok(())
    }

    async fn get_active(state: &AppState, entry_id: Uuid) -> AppResult<CompetitionEntry> {
        let entry = Self::get(state, entry_id).await?;
        if entry.is_deleted() {
            return Err(AppError::InvalidState("Entry has been deleted".to_string()));
        }
        Ok(entry)
    }
}

fn validate_fields(
    name: Option<&str>,
    description: Option<&str>,
    file_path: Option<&str>,
) -> AppResult<()> {
    let too_long = |value: Option<&str>, max: u64| value.is_some_and(|v| v.chars().count() as u64 > max);

    if too_long(name, MAX_NAME_LENGTH) {
        return Err(AppError::Validation(format!(
            "Entry name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if too_long(description, MAX_DESCRIPTION_LENGTH) {
        return Err(AppError::Validation(format!(
            "Entry description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    if too_long(file_path, MAX_FILE_PATH_LENGTH) {
        return Err(AppError::Validation(format!(
            "File reference must be at most {} characters",
            MAX_FILE_PATH_LENGTH
        )));
    }
    Ok(())
}

fn validate_entry(entry: NewEntry) -> AppResult<NewEntry> {
    validate_fields(
        Some(&entry.name),
        entry.description.as_deref(),
        entry.file_path.as_deref(),
    )?;
    let name = entry.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Entry name must not be empty".to_string()));
    }
    Ok(NewEntry { name, ..entry })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::services::LifecycleService;
    use crate::test_utils::{TestContext, admin, user};

    fn new_entry(name: &str) -> NewEntry {
        NewEntry {
            name: name.to_string(),
            description: None,
            file_path: None,
            contestant_id: None,
        }
    }

    #[tokio::test]
    async fn test_entries_append_in_order() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let creator = user();
        let competition = ctx.competition(&creator, rubric.id()).await;

        let created = EntryService::add_entries(
            &ctx.state,
            &creator,
            competition.id,
            vec![new_entry("A"), new_entry("B"), new_entry("C")],
        )
        .await
        .unwrap();

        let orders: Vec<_> = created.iter().map(|e| e.display_order).collect();
        assert_eq!(orders, [1, 2, 3]);
        assert!(created.iter().all(|e| e.status == EntryStatus::Pending));
    }

    #[tokio::test]
    async fn test_past_deadline_rejects_entries() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let competition = ctx.competition(&user(), rubric.id()).await;

        // Still ACTIVE: the sweep has not run
        ctx.clock.advance(Duration::days(2));
        let result = EntryService::add_entry(&ctx.state, competition.id, new_entry("Late")).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_ended_competition_rejects_entries() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let creator = user();
        let competition = ctx.competition(&creator, rubric.id()).await;

        LifecycleService::end_competition(&ctx.state, &creator, competition.id)
            .await
            .unwrap();
        let result = EntryService::add_entry(&ctx.state, competition.id, new_entry("Late")).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creation_never_shares_an_order() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let competition = ctx.competition(&user(), rubric.id()).await;
        for name in ["A", "B", "C"] {
            ctx.entry(&competition, name).await;
        }

        let spawn = |name: &'static str| {
            let state = ctx.state.clone();
            let competition_id = competition.id;
            tokio::spawn(async move {
                EntryService::add_entry(&state, competition_id, new_entry(name)).await
            })
        };
        let (first, second) = tokio::join!(spawn("D"), spawn("E"));

        let mut orders = vec![
            first.unwrap().unwrap().display_order,
            second.unwrap().unwrap().display_order,
        ];
        orders.sort();
        assert_eq!(orders, [4, 5]);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_entry() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let creator = user();
        let competition = ctx.competition(&creator, rubric.id()).await;
        let keep = ctx.entry(&competition, "Keep").await;
        let drop = ctx.entry(&competition, "Drop").await;

        EntryService::soft_delete(&ctx.state, &creator, drop.id).await.unwrap();

        let listed = EntryService::list_active(&ctx.state, competition.id, None).await.unwrap();
        assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), [keep.id]);
        assert!(EntryService::get(&ctx.state, drop.id).await.unwrap().is_deleted());

        let again = EntryService::soft_delete(&ctx.state, &creator, drop.id).await;
        assert!(matches!(again, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_moderation_and_status_filter() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let creator = user();
        let competition = ctx.competition(&creator, rubric.id()).await;
        let entry = ctx.entry(&competition, "A").await;
        ctx.entry(&competition, "B").await;

        let forbidden = EntryService::set_status(&ctx.state, &user(), entry.id, EntryStatus::Approved).await;
        assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

        EntryService::set_status(&ctx.state, &creator, entry.id, EntryStatus::Rejected).await.unwrap();
        let back = EntryService::set_status(&ctx.state, &admin(), entry.id, EntryStatus::Approved)
            .await
            .unwrap();
        assert_eq!(back.status, EntryStatus::Approved);

        let approved = EntryService::list_active(&ctx.state, competition.id, Some(EntryStatus::Approved))
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, entry.id);
    }

    #[tokio::test]
    async fn test_contestant_owns_submission() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let competition = ctx.competition(&user(), rubric.id()).await;
        let contestant = user();

        let entry = EntryService::submit_entry(
            &ctx.state,
            &contestant,
            competition.id,
            "Golden".to_string(),
            Some("Late harvest".to_string()),
            Some("uploads/golden.jpg".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(entry.contestant_id, Some(contestant.id));

        let changes = EntryChanges {
            name: Some("Golden II".to_string()),
            ..Default::default()
        };
        let stranger = EntryService::update_entry(&ctx.state, &user(), entry.id, changes.clone()).await;
        assert!(matches!(stranger, Err(AppError::Forbidden(_))));

        let updated = EntryService::update_entry(&ctx.state, &contestant, entry.id, changes)
            .await
            .unwrap();
        assert_eq!(updated.name, "Golden II");
        assert_eq!(updated.file_path.as_deref(), Some("uploads/golden.jpg"));

        EntryService::soft_delete(&ctx.state, &contestant, entry.id).await.unwrap();
    }
}
