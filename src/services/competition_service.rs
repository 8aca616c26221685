//! Competition service

use uuid::Uuid;

use crate::{
    constants::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH},
    db::CompetitionChanges,
    error::{AppError, AppResult},
    models::{
        Competition, CompetitionDetails, CompetitionDraft, CompetitionJudge, Principal,
    },
    services::authorization::{require_creator_or_admin, require_rating_view_access},
    state::AppState,
};

/// Competition service for the aggregate and its judge assignments
pub struct CompetitionService;

impl CompetitionService {
    /// Create a competition owned by the caller.
    ///
    /// The creator is assigned as the first judge; `judge_ids` adds more.
    pub async fn create(
        state: &AppState,
        principal: &Principal,
        mut draft: CompetitionDraft,
        judge_ids: &[Uuid],
    ) -> AppResult<Competition> {
        draft.creator_id = Some(principal.id);
        validate_lengths(Some(&draft.name), draft.description.as_deref())?;
        let new = draft.build(state.now())?;

        let rubric = state
            .store()
            .find_rubric(new.model_id)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation model"))?;
        if rubric.model.is_deleted() {
            return Err(AppError::InvalidState(
                "Evaluation model has been deleted".to_string(),
            ));
        }

        let mut judges = vec![principal.id];
        for judge_id in judge_ids {
            if !judges.contains(judge_id) {
                judges.push(*judge_id);
            }
        }

        let competition = state.store().insert_competition(&new, &judges).await?;

        tracing::info!(
            competition_id = %competition.id,
            creator_id = %principal.id,
            judges = judges.len(),
            deadline = %competition.deadline,
            "Competition created"
        );
        Ok(competition)
    }

    /// Get a non-deleted competition
    pub async fn get(state: &AppState, id: Uuid) -> AppResult<Competition> {
        state
            .store()
            .find_competition(id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| AppError::not_found("Competition"))
    }

    /// Get a competition that accepts entries and ratings right now
    pub async fn get_open(state: &AppState, id: Uuid) -> AppResult<Competition> {
        let competition = state
            .store()
            .find_competition(id)
            .await?
            .ok_or_else(|| AppError::not_found("Competition"))?;

        if competition.is_deleted() {
            return Err(AppError::InvalidState(
                "Competition has been deleted".to_string(),
            ));
        }
        if let Some(reason) = competition.closed_reason(state.now()) {
            return Err(AppError::InvalidState(reason.to_string()));
        }
        Ok(competition)
    }

    /// Get a competition with its rubric, judges and active entries
    pub async fn get_details(state: &AppState, id: Uuid) -> AppResult<CompetitionDetails> {
        let competition = Self::get(state, id).await?;
        let store = state.store();

        let (rubric, judges, entries) = tokio::try_join!(
            store.find_rubric(competition.model_id),
            store.list_judges(competition.id),
            store.list_active_entries(competition.id, None),
        )?;
        let rubric = rubric.ok_or_else(|| AppError::not_found("Evaluation model"))?;

        Ok(CompetitionDetails {
            competition,
            rubric,
            judges,
            entries,
        })
    }

    /// List all non-deleted competitions
    pub async fn list(state: &AppState) -> AppResult<Vec<Competition>> {
        state.store().list_competitions().await
    }

    /// List competitions created by the caller
    pub async fn list_created(state: &AppState, principal: &Principal) -> AppResult<Vec<Competition>> {
        state.store().list_competitions_by_creator(principal.id).await
    }

    /// List competitions the caller judges
    pub async fn list_judged(state: &AppState, principal: &Principal) -> AppResult<Vec<Competition>> {
        state.store().list_competitions_for_judge(principal.id).await
    }

    /// Update name, description or deadline
    pub async fn update(
        state: &AppState,
        principal: &Principal,
        id: Uuid,
        changes: CompetitionChanges,
    ) -> AppResult<Competition> {
        let competition = Self::get(state, id).await?;
        require_creator_or_admin(principal, &competition)?;
        validate_lengths(changes.name.as_deref(), changes.description.as_deref())?;

        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name must not be empty".to_string()));
            }
        }
        if let Some(deadline) = changes.deadline {
            if deadline <= state.now() {
                return Err(AppError::Validation(
                    "Deadline must be in the future".to_string(),
                ));
            }
        }

        let updated = state
            .store()
            .update_competition(id, &changes, state.now())
            .await?;

        tracing::info!(competition_id = %id, "Competition updated");
        Ok(updated)
    }

    /// Soft-delete a competition
    pub async fn delete(state: &AppState, principal: &Principal, id: Uuid) -> AppResult<()> {
        let competition = Self::get(state, id).await?;
        require_creator_or_admin(principal, &competition)?;

        state.store().soft_delete_competition(id, state.now()).await?;

        tracing::info!(competition_id = %id, "Competition deleted");
        Ok(())
    }

    /// Assign a judge; a pair that already exists is a conflict
    pub async fn assign_judge(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
        judge_id: Uuid,
    ) -> AppResult<CompetitionJudge> {
        let competition = Self::get(state, competition_id).await?;
        require_creator_or_admin(principal, &competition)?;

        if state.store().is_judge(competition_id, judge_id).await? {
            return Err(AppError::Conflict(
                "Judge is already assigned to this competition".to_string(),
            ));
        }

        let judge = state
            .store()
            .insert_judge(competition_id, judge_id, state.now())
            .await
            .map_err(|e| match e {
                AppError::AlreadyExists(_) => {
                    tracing::warn!(
                        competition_id = %competition_id,
                        judge_id = %judge_id,
                        "Concurrent judge assignment rejected by store"
                    );
                    AppError::Conflict("Judge is already assigned to this competition".to_string())
                }
                other => other,
            })?;

        tracing::info!(competition_id = %competition_id, judge_id = %judge_id, "Judge assigned");
        Ok(judge)
    }

    /// Remove a judge assignment
    pub async fn unassign_judge(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
        judge_id: Uuid,
    ) -> AppResult<()> {
        let competition = Self::get(state, competition_id).await?;
        require_creator_or_admin(principal, &competition)?;

        if !state.store().delete_judge(competition_id, judge_id).await? {
            return Err(AppError::not_found("Judge assignment"));
        }

        tracing::info!(competition_id = %competition_id, judge_id = %judge_id, "Judge unassigned");
        Ok(())
    }

    /// List judges in assignment order
    pub async fn list_judges(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionJudge>> {
        let competition = Self::get(state, competition_id).await?;
        require_rating_view_access(state, principal, &competition).await?;
        state.store().list_judges(competition_id).await
    }

    /// Number of judges assigned to a competition
    pub async fn count_judges(state: &AppState, competition_id: Uuid) -> AppResult<i64> {
        Self::get(state, competition_id).await?;
        state.store().count_judges(competition_id).await
    }
}

fn validate_lengths(name: Option<&str>, description: Option<&str>) -> AppResult<()> {
    if name.is_some_and(|n| n.chars().count() as u64 > MAX_NAME_LENGTH) {
        return Err(AppError::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if description.is_some_and(|d| d.chars().count() as u64 > MAX_DESCRIPTION_LENGTH) {
        return Err(AppError::Validation(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}
