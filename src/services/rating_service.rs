//! Rating service
//!
//! Judges score entries one parameter at a time. At most one active rating
//! exists per (entry, judge, parameter); the store's uniqueness constraint
//! decides races and the loser retries as an update.

use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    constants::MAX_NOTE_LENGTH,
    error::{AppError, AppResult},
    models::{
        Competition, CompetitionEntry, CompetitionRating, CompetitionRatingSummary,
        CompletionStatus, EntryScore, EntryStatus, EntrySummary, NewRating, ParameterAverage,
        Principal, Rubric,
    },
    services::{
        CompetitionService,
        authorization::{require_assigned_judge, require_rating_view_access},
        scoring,
    },
    state::AppState,
};

/// Entry together with the competition and rubric it is judged under
struct RatingTarget {
    competition: Competition,
    entry: CompetitionEntry,
    rubric: Rubric,
}

/// Rating service for score submission and aggregation
pub struct RatingService;

impl RatingService {
    /// Record a judge's score for one parameter, updating it in place on resubmission
    pub async fn submit_or_update_score(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
        parameter_id: Uuid,
        score: Decimal,
        note: Option<String>,
    ) -> AppResult<CompetitionRating> {
        scoring::validate_score(score)?;
        validate_note(note.as_deref())?;

        let target = Self::open_target(state, principal, entry_id).await?;
        let parameter = state
            .store()
            .find_parameter(parameter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation parameter"))?;
        if target.rubric.parameter(parameter.id).is_none() {
            return Err(AppError::Validation(
                "Parameter does not belong to this competition's evaluation model".to_string(),
            ));
        }

        Self::upsert(state, &target, principal.id, parameter_id, score, note.as_deref()).await
    }

    /// Record one score per rubric parameter; every parameter must be present
    pub async fn submit_rating(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
        scores: Vec<(Uuid, Decimal)>,
        note: Option<String>,
    ) -> AppResult<Vec<CompetitionRating>> {
        validate_note(note.as_deref())?;
        let target = Self::open_target(state, principal, entry_id).await?;

        let mut seen = HashSet::new();
        for (parameter_id, score) in &scores {
            if target.rubric.parameter(*parameter_id).is_none() {
                return Err(AppError::Validation(format!(
                    "Parameter {} does not belong to this competition's evaluation model",
                    parameter_id
                )));
            }
            if !seen.insert(*parameter_id) {
                return Err(AppError::Validation(format!(
                    "Parameter {} is scored more than once",
                    parameter_id
                )));
            }
            scoring::validate_score(*score)?;
        }
        if let Some(missing) = target.rubric.parameters.iter().find(|p| !seen.contains(&p.id)) {
            return Err(AppError::Validation(format!(
                "Missing score for parameter '{}'",
                missing.name
            )));
        }

        let mut ratings = Vec::with_capacity(target.rubric.parameter_count());
        for parameter in &target.rubric.parameters {
            let score = scores
                .iter()
                .find(|(id, _)| *id == parameter.id)
                .map(|(_, score)| *score)
                .ok_or_else(|| AppError::Validation("Missing score".to_string()))?;
            ratings.push(
                Self::upsert(state, &target, principal.id, parameter.id, score, note.as_deref())
                    .await?,
            );
        }

        tracing::info!(
            entry_id = %entry_id,
            judge_id = %principal.id,
            parameters = ratings.len(),
            "Rating submitted"
        );
        Ok(ratings)
    }

    /// Number of active ratings a judge has given an entry
    pub async fn judge_completion_count(
        state: &AppState,
        entry_id: Uuid,
        judge_id: Uuid,
    ) -> AppResult<i64> {
        state.store().count_active_ratings(entry_id, judge_id).await
    }

    /// Whether the caller has rated every parameter of an entry
    pub async fn completion_status(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
    ) -> AppResult<CompletionStatus> {
        let target = Self::target(state, entry_id).await?;
        let rated = Self::judge_completion_count(state, entry_id, principal.id).await?;

        Ok(CompletionStatus::new(
            target.entry.id,
            principal.id,
            rated,
            target.rubric.parameter_count() as i64,
        ))
    }

    /// Per-parameter means in rubric order; unrated parameters have no mean
    pub async fn average_scores_by_parameter(
        state: &AppState,
        entry_id: Uuid,
    ) -> AppResult<Vec<ParameterAverage>> {
        Ok(Self::score(state, entry_id).await?.parameters)
    }

    /// Weight-normalized aggregate of the parameter means, None if unrated
    pub async fn weighted_entry_score(
        state: &AppState,
        entry_id: Uuid,
    ) -> AppResult<Option<Decimal>> {
        Ok(Self::score(state, entry_id).await?.weighted_score)
    }

    /// Averages and weighted score for callers allowed to see rating data
    pub async fn entry_score(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
    ) -> AppResult<EntryScore> {
        let target = Self::target(state, entry_id).await?;
        require_rating_view_access(state, principal, &target.competition).await?;
        Self::score(state, entry_id).await
    }

    /// Active ratings of one entry
    pub async fn list_for_entry(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        let target = Self::target(state, entry_id).await?;
        require_rating_view_access(state, principal, &target.competition).await?;
        state.store().list_ratings_for_entry(entry_id).await
    }

    /// Every active rating of a competition in export order
    pub async fn list_for_competition(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        let competition = CompetitionService::get(state, competition_id).await?;
        require_rating_view_access(state, principal, &competition).await?;
        state.store().list_ratings_for_competition(competition_id).await
    }

    /// The caller's own active ratings in a competition
    pub async fn list_mine(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
    ) -> AppResult<Vec<CompetitionRating>> {
        CompetitionService::get(state, competition_id).await?;
        state
            .store()
            .list_ratings_for_judge(competition_id, principal.id)
            .await
    }

    /// Scores of every approved, active entry plus judge completion
    pub async fn competition_summary(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
    ) -> AppResult<CompetitionRatingSummary> {
        let competition = CompetitionService::get(state, competition_id).await?;
        require_rating_view_access(state, principal, &competition).await?;

        let store = state.store();
        let (rubric, entries, judges, ratings) = tokio::try_join!(
            store.find_rubric(competition.model_id),
            store.list_active_entries(competition_id, Some(EntryStatus::Approved)),
            store.list_judges(competition_id),
            store.list_ratings_for_competition(competition_id),
        )?;
        let rubric = rubric.ok_or_else(|| AppError::not_found("Evaluation model"))?;
        let judge_ids: HashSet<Uuid> = judges.iter().map(|j| j.judge_id).collect();

        let entries = entries
            .into_iter()
            .map(|entry| {
                let entry_ratings: Vec<&CompetitionRating> =
                    ratings.iter().filter(|r| r.entry_id == entry.id).collect();
                let tallies = scoring::tally(entry_ratings.iter().copied());

                EntrySummary {
                    entry_id: entry.id,
                    name: entry.name,
                    display_order: entry.display_order,
                    score: scoring::entry_score(entry.id, &rubric, &tallies),
                    completed_judges: scoring::completed_judges(
                        &rubric,
                        &judge_ids,
                        entry_ratings.iter().copied(),
                    ),
                }
            })
            .collect();

        Ok(CompetitionRatingSummary {
            competition_id,
            total_judges: judge_ids.len() as i64,
            entries,
        })
    }

    async fn score(state: &AppState, entry_id: Uuid) -> AppResult<EntryScore> {
        let target = Self::target(state, entry_id).await?;
        if target.entry.is_deleted() {
            return Err(AppError::InvalidState(
                "Entry has been deleted".to_string(),
            ));
        }

        let tallies = state.store().parameter_tallies(entry_id).await?;
        Ok(scoring::entry_score(entry_id, &target.rubric, &tallies))
    }

    /// Load entry, competition and rubric without any window checks
    async fn target(state: &AppState, entry_id: Uuid) -> AppResult<RatingTarget> {
        let entry = state
            .store()
            .find_entry(entry_id)
            .await?
            .ok_or_else(|| AppError::not_found("Entry"))?;
        let competition = state
            .store()
            .find_competition(entry.competition_id)
            .await?
            .ok_or_else(|| AppError::not_found("Competition"))?;
        let rubric = state
            .store()
            .find_rubric(competition.model_id)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation model"))?;

        Ok(RatingTarget {
            competition,
            entry,
            rubric,
        })
    }

    /// Load a target the principal may rate right now
    async fn open_target(
        state: &AppState,
        principal: &Principal,
        entry_id: Uuid,
    ) -> AppResult<RatingTarget> {
        let entry = state
            .store()
            .find_entry(entry_id)
            .await?
            .ok_or_else(|| AppError::not_found("Entry"))?;
        let competition = CompetitionService::get_open(state, entry.competition_id).await?;
        require_assigned_judge(state, principal, &competition).await?;

        if entry.is_deleted() {
            return Err(AppError::InvalidState("Entry has been deleted".to_string()));
        }
        if state.config().rating.require_approved_entries && !entry.is_approved() {
            return Err(AppError::InvalidState(
                "Only approved entries can be rated".to_string(),
            ));
        }

        let rubric = state
            .store()
            .find_rubric(competition.model_id)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation model"))?;

        Ok(RatingTarget {
            competition,
            entry,
            rubric,
        })
    }

    /// Fetch, then update or insert; a rejected insert means another request
    /// won the race and the next attempt finds its row
    async fn upsert(
        state: &AppState,
        target: &RatingTarget,
        judge_id: Uuid,
        parameter_id: Uuid,
        score: Decimal,
        note: Option<&str>,
    ) -> AppResult<CompetitionRating> {
        let store = state.store();
        let max_attempts = state.config().rating.upsert_max_attempts;

        for attempt in 1..=max_attempts {
            let now = state.now();

            if let Some(existing) = store
                .find_active_rating(target.entry.id, judge_id, parameter_id)
                .await?
            {
                match store.update_rating(existing.id, score, note, now).await {
                    Ok(updated) => return Ok(updated),
                    // Soft-deleted between the read and the write
                    Err(AppError::NotFound(_)) => continue,
                    Err(e) => return Err(e),
                }
            }

            let rating = NewRating {
                id: Uuid::new_v4(),
                competition_id: target.competition.id,
                entry_id: target.entry.id,
                judge_id,
                parameter_id,
                score,
                note: note.map(str::to_string),
                submitted_at: now,
            };
            match store.insert_rating(&rating).await {
                Ok(created) => return Ok(created),
                Err(AppError::AlreadyExists(_)) => {
                    tracing::warn!(
                        entry_id = %target.entry.id,
                        judge_id = %judge_id,
                        parameter_id = %parameter_id,
                        attempt,
                        "Concurrent first rating, retrying as update"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(
            "Rating changed concurrently, try again".to_string(),
        ))
    }
}

fn validate_note(note: Option<&str>) -> AppResult<()> {
    if note.is_some_and(|n| n.chars().count() as u64 > MAX_NOTE_LENGTH) {
        return Err(AppError::Validation(format!(
            "Note must be at most {} characters",
            MAX_NOTE_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::config::Config;
    use crate::db::Store;
    use crate::services::{CompetitionService, EntryService, ExportService, LifecycleService};
    use crate::test_utils::{TestContext, user};

    struct Fixture {
        ctx: TestContext,
        creator: Principal,
        competition: Competition,
        rubric: Rubric,
        entry: CompetitionEntry,
    }

    async fn fixture_with(config: Config) -> Fixture {
        let ctx = TestContext::with_config(config);
        let rubric = ctx.rubric().await;
        let creator = user();
        let competition = ctx.competition(&creator, rubric.id()).await;
        let entry = ctx.entry(&competition, "Golden").await;
        Fixture {
            ctx,
            creator,
            competition,
            rubric,
            entry,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(Config::default()).await
    }

    impl Fixture {
        async fn judge(&self) -> Principal {
            let judge = user();
            CompetitionService::assign_judge(&self.ctx.state, &self.creator, self.competition.id, judge.id)
                .await
                .unwrap();
            judge
        }

        async fn rate_all(&self, judge: &Principal, entry_id: Uuid, scores: [i64; 3]) {
            let scores = self
                .rubric
                .parameters
                .iter()
                .zip(scores)
                .map(|(p, s)| (p.id, Decimal::from(s)))
                .collect();
            RatingService::submit_rating(&self.ctx.state, judge, entry_id, scores, None)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_weighted_score_from_two_judges() {
        let f = fixture().await;
        let (a, b) = (f.judge().await, f.judge().await);
        f.rate_all(&a, f.entry.id, [90, 80, 70]).await;
        f.rate_all(&b, f.entry.id, [70, 90, 80]).await;

        let averages = RatingService::average_scores_by_parameter(&f.ctx.state, f.entry.id)
            .await
            .unwrap();
        let means: Vec<_> = averages.iter().map(|p| (p.name.as_str(), p.mean, p.count)).collect();
        assert_eq!(
            means,
            [
                ("Taste", Some(Decimal::from(80)), 2),
                ("Color", Some(Decimal::from(85)), 2),
                ("Aroma", Some(Decimal::from(75)), 2),
            ]
        );

        let weighted = RatingService::weighted_entry_score(&f.ctx.state, f.entry.id).await.unwrap();
        assert_eq!(weighted, Some(Decimal::from(80)));
    }

    #[tokio::test]
    async fn test_unrated_entry_has_no_score() {
        let f = fixture().await;
        let weighted = RatingService::weighted_entry_score(&f.ctx.state, f.entry.id).await.unwrap();
        assert_eq!(weighted, None);

        let averages = RatingService::average_scores_by_parameter(&f.ctx.state, f.entry.id)
            .await
            .unwrap();
        assert_eq!(averages.len(), 3);
        assert!(averages.iter().all(|p| p.mean.is_none() && p.count == 0));
    }

    #[tokio::test]
    async fn test_resubmission_updates_in_place() {
        let f = fixture().await;
        let judge = f.judge().await;
        let taste = f.rubric.parameters[0].id;

        let first = RatingService::submit_or_update_score(
            &f.ctx.state, &judge, f.entry.id, taste, Decimal::from(60), None,
        )
        .await
        .unwrap();
        assert_eq!(
            RatingService::judge_completion_count(&f.ctx.state, f.entry.id, judge.id).await.unwrap(),
            1
        );

        f.ctx.clock.advance(Duration::minutes(5));
        let second = RatingService::submit_or_update_score(
            &f.ctx.state,
            &judge,
            f.entry.id,
            taste,
            Decimal::new(9050, 2),
            Some("Better on second taste".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.submitted_at > first.submitted_at);
        assert_eq!(
            RatingService::judge_completion_count(&f.ctx.state, f.entry.id, judge.id).await.unwrap(),
            1
        );
        let averages = RatingService::average_scores_by_parameter(&f.ctx.state, f.entry.id)
            .await
            .unwrap();
        assert_eq!(averages[0].mean, Some(Decimal::new(9050, 2)));
        assert_eq!(averages[0].count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_submissions_keep_one_row() {
        let f = fixture().await;
        let judge = f.judge().await;
        let taste = f.rubric.parameters[0].id;

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let state = f.ctx.state.clone();
                let entry_id = f.entry.id;
                tokio::spawn(async move {
                    RatingService::submit_or_update_score(
                        &state,
                        &judge,
                        entry_id,
                        taste,
                        Decimal::from(50 + i),
                        None,
                    )
                    .await
                })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let ratings = f.ctx.store.list_ratings_for_entry(f.entry.id).await.unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(
            RatingService::judge_completion_count(&f.ctx.state, f.entry.id, judge.id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_window_and_assignment_checks() {
        let f = fixture().await;
        let judge = f.judge().await;
        let taste = f.rubric.parameters[0].id;

        let outsider = RatingService::submit_or_update_score(
            &f.ctx.state, &user(), f.entry.id, taste, Decimal::from(50), None,
        )
        .await;
        assert!(matches!(outsider, Err(AppError::Forbidden(_))));

        // Strict cutoff: past the deadline while still ACTIVE
        f.ctx.clock.advance(Duration::days(1));
        let late = RatingService::submit_or_update_score(
            &f.ctx.state, &judge, f.entry.id, taste, Decimal::from(50), None,
        )
        .await;
        assert!(matches!(late, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_ended_competition_rejects_ratings() {
        let f = fixture().await;
        let judge = f.judge().await;
        LifecycleService::end_competition(&f.ctx.state, &f.creator, f.competition.id)
            .await
            .unwrap();

        let result = RatingService::submit_or_update_score(
            &f.ctx.state, &judge, f.entry.id, f.rubric.parameters[0].id, Decimal::from(50), None,
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_score_and_parameter_validation() {
        let f = fixture().await;
        let judge = f.judge().await;
        let taste = f.rubric.parameters[0].id;

        let too_high = RatingService::submit_or_update_score(
            &f.ctx.state, &judge, f.entry.id, taste, Decimal::from(101), None,
        )
        .await;
        assert!(matches!(too_high, Err(AppError::Validation(_))));

        let unknown = RatingService::submit_or_update_score(
            &f.ctx.state, &judge, f.entry.id, Uuid::new_v4(), Decimal::from(50), None,
        )
        .await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));

        let other_rubric = f.ctx.rubric().await;
        let foreign = RatingService::submit_or_update_score(
            &f.ctx.state,
            &judge,
            f.entry.id,
            other_rubric.parameters[0].id,
            Decimal::from(50),
            None,
        )
        .await;
        assert!(matches!(foreign, Err(AppError::Validation(_))));

        let partial = RatingService::submit_rating(
            &f.ctx.state,
            &judge,
            f.entry.id,
            vec![(taste, Decimal::from(50))],
            None,
        )
        .await;
        assert!(matches!(partial, Err(AppError::Validation(_))));
        assert_eq!(
            RatingService::judge_completion_count(&f.ctx.state, f.entry.id, judge.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_deleted_entry_cannot_be_rated_or_scored() {
        let f = fixture().await;
        let judge = f.judge().await;
        f.rate_all(&judge, f.entry.id, [80, 80, 80]).await;
        EntryService::soft_delete(&f.ctx.state, &f.creator, f.entry.id).await.unwrap();

        let rate = RatingService::submit_or_update_score(
            &f.ctx.state, &judge, f.entry.id, f.rubric.parameters[0].id, Decimal::from(50), None,
        )
        .await;
        assert!(matches!(rate, Err(AppError::InvalidState(_))));

        let score = RatingService::weighted_entry_score(&f.ctx.state, f.entry.id).await;
        assert!(matches!(score, Err(AppError::InvalidState(_))));

        // Prior ratings stay in the export
        let rows = ExportService::export_rows(&f.ctx.state, &f.creator, f.competition.id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.entry_id == f.entry.id && r.entry_deleted));
    }

    #[tokio::test]
    async fn test_approved_only_mode() {
        let mut config = Config::default();
        config.rating.require_approved_entries = true;
        let f = fixture_with(config).await;
        let judge = f.judge().await;
        let taste = f.rubric.parameters[0].id;

        let pending = RatingService::submit_or_update_score(
            &f.ctx.state, &judge, f.entry.id, taste, Decimal::from(50), None,
        )
        .await;
        assert!(matches!(pending, Err(AppError::InvalidState(_))));

        EntryService::set_status(&f.ctx.state, &f.creator, f.entry.id, EntryStatus::Approved)
            .await
            .unwrap();
        RatingService::submit_or_update_score(&f.ctx.state, &judge, f.entry.id, taste, Decimal::from(50), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_completion_and_summary() {
        let f = fixture().await;
        let judge = f.judge().await;
        let second = f.ctx.entry(&f.competition, "Silver").await;
        for entry_id in [f.entry.id, second.id] {
            EntryService::set_status(&f.ctx.state, &f.creator, entry_id, EntryStatus::Approved)
                .await
                .unwrap();
        }

        f.rate_all(&judge, f.entry.id, [90, 80, 70]).await;
        RatingService::submit_or_update_score(
            &f.ctx.state, &judge, second.id, f.rubric.parameters[0].id, Decimal::from(60), None,
        )
        .await
        .unwrap();

        let done = RatingService::completion_status(&f.ctx.state, &judge, f.entry.id).await.unwrap();
        assert!(done.complete);
        let partial = RatingService::completion_status(&f.ctx.state, &judge, second.id).await.unwrap();
        assert_eq!((partial.rated, partial.required, partial.complete), (1, 3, false));

        let outsider = RatingService::competition_summary(&f.ctx.state, &user(), f.competition.id).await;
        assert!(matches!(outsider, Err(AppError::Forbidden(_))));

        let summary = RatingService::competition_summary(&f.ctx.state, &judge, f.competition.id)
            .await
            .unwrap();
        assert_eq!(summary.total_judges, 2);
        assert_eq!(summary.entries.len(), 2);
        assert_eq!(summary.entries[0].completed_judges, 1);
        assert_eq!(summary.entries[0].score.weighted_score, Some(Decimal::from(81)));
        assert_eq!(summary.entries[1].completed_judges, 0);
        assert_eq!(summary.entries[1].score.weighted_score, Some(Decimal::from(60)));

        // Public once the deadline passed
        f.ctx.clock.advance(Duration::days(2));
        assert!(RatingService::competition_summary(&f.ctx.state, &user(), f.competition.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_judges_see_every_rating_of_competition() {
        let f = fixture().await;
        let (a, b) = (f.judge().await, f.judge().await);
        let second = f.ctx.entry(&f.competition, "Silver").await;
        f.rate_all(&a, f.entry.id, [90, 80, 70]).await;
        f.rate_all(&b, second.id, [70, 90, 80]).await;

        let outsider = RatingService::list_for_competition(&f.ctx.state, &user(), f.competition.id).await;
        assert!(matches!(outsider, Err(AppError::Forbidden(_))));

        let ratings = RatingService::list_for_competition(&f.ctx.state, &a, f.competition.id)
            .await
            .unwrap();
        assert_eq!(ratings.len(), 6);
        assert!(ratings[..3].iter().all(|r| r.entry_id == f.entry.id && r.judge_id == a.id));
        assert!(ratings[3..].iter().all(|r| r.entry_id == second.id && r.judge_id == b.id));

        LifecycleService::end_competition(&f.ctx.state, &f.creator, f.competition.id)
            .await
            .unwrap();
        let public = RatingService::list_for_competition(&f.ctx.state, &user(), f.competition.id)
            .await
            .unwrap();
        assert_eq!(public.len(), 6);
    }
}
