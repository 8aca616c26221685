//! Competition lifecycle: manual end and the deadline-driven expiry sweep

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Competition, Principal},
    services::authorization::require_creator_or_admin,
    state::AppState,
    utils::format_duration,
};

/// Outcome of one expiry sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepStats {
    /// Overdue competitions selected
    pub scanned: usize,
    /// Transitioned to ENDED by this sweep
    pub ended: usize,
    /// Ended concurrently before this sweep got to them
    pub already_ended: usize,
    /// Left ACTIVE because the update failed; picked up again next sweep
    pub errors: usize,
}

/// Lifecycle service for status transitions
pub struct LifecycleService;

impl LifecycleService {
    /// End a competition now. Ending an ended competition is a no-op.
    pub async fn end_competition(
        state: &AppState,
        principal: &Principal,
        competition_id: Uuid,
    ) -> AppResult<Competition> {
        let competition = state
            .store()
            .find_competition(competition_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| AppError::not_found("Competition"))?;
        require_creator_or_admin(principal, &competition)?;

        if competition.is_ended() {
            return Ok(competition);
        }

        if state
            .store()
            .end_competition(competition_id, state.now())
            .await?
        {
            tracing::info!(
                competition_id = %competition_id,
                ended_by = %principal.id,
                "Competition ended"
            );
        }

        state
            .store()
            .find_competition(competition_id)
            .await?
            .ok_or_else(|| AppError::not_found("Competition"))
    }

    /// Move every ACTIVE competition whose deadline has passed to ENDED.
    ///
    /// Each competition is handled on its own; a failed update is logged and
    /// counted, and the sweep carries on with the rest.
    pub async fn sweep_expired(state: &AppState) -> AppResult<SweepStats> {
        let now = state.now();
        let expired = state.store().find_expired_competitions(now).await?;
        let mut stats = SweepStats {
            scanned: expired.len(),
            ..SweepStats::default()
        };

        for competition in &expired {
            match state.store().end_competition(competition.id, now).await {
                Ok(true) => {
                    stats.ended += 1;
                    tracing::info!(
                        competition_id = %competition.id,
                        overdue = %format_duration(now - competition.deadline),
                        "Competition expired"
                    );
                }
                Ok(false) => stats.already_ended += 1,
                Err(e) => {
                    stats.errors += 1;
                    tracing::error!(
                        competition_id = %competition.id,
                        error = %e,
                        "Failed to expire competition"
                    );
                }
            }
        }

        if stats.scanned > 0 {
            tracing::info!(
                scanned = stats.scanned,
                ended = stats.ended,
                already_ended = stats.already_ended,
                errors = stats.errors,
                "Expiry sweep finished"
            );
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::CompetitionStatus;
    use crate::services::CompetitionService;
    use crate::test_utils::{TestContext, admin, user};

    #[tokio::test]
    async fn test_end_is_idempotent() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let creator = user();
        let competition = ctx.competition(&creator, rubric.id()).await;

        let stranger = LifecycleService::end_competition(&ctx.state, &user(), competition.id).await;
        assert!(matches!(stranger, Err(AppError::Forbidden(_))));

        let ended = LifecycleService::end_competition(&ctx.state, &creator, competition.id)
            .await
            .unwrap();
        assert_eq!(ended.status, CompetitionStatus::Ended);

        ctx.clock.advance(Duration::minutes(1));
        let again = LifecycleService::end_competition(&ctx.state, &admin(), competition.id)
            .await
            .unwrap();
        assert_eq!(again.status, CompetitionStatus::Ended);
        assert_eq!(again.updated_at, ended.updated_at);
    }

    #[tokio::test]
    async fn test_sweep_ends_only_overdue_competitions() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let creator = user();
        let overdue = ctx.competition(&creator, rubric.id()).await;
        ctx.clock.advance(Duration::hours(12));
        let current = ctx.competition(&creator, rubric.id()).await;

        // At the deadline instant it is not yet overdue
        ctx.clock.advance(Duration::hours(12));
        let stats = LifecycleService::sweep_expired(&ctx.state).await.unwrap();
        assert_eq!(stats, SweepStats::default());

        ctx.clock.advance(Duration::seconds(1));
        let stats = LifecycleService::sweep_expired(&ctx.state).await.unwrap();
        assert_eq!((stats.scanned, stats.ended, stats.errors), (1, 1, 0));

        let overdue = CompetitionService::get(&ctx.state, overdue.id).await.unwrap();
        let current = CompetitionService::get(&ctx.state, current.id).await.unwrap();
        assert!(overdue.is_ended());
        assert!(!current.is_ended());

        // Re-running is a no-op
        let stats = LifecycleService::sweep_expired(&ctx.state).await.unwrap();
        assert_eq!(stats.scanned, 0);
    }

    #[tokio::test]
    async fn test_sweep_continues_past_failures() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let creator = user();
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(ctx.competition(&creator, rubric.id()).await.id);
        }
        ctx.store.fail_end_for(ids[1]);
        ctx.clock.advance(Duration::days(2));

        let stats = LifecycleService::sweep_expired(&ctx.state).await.unwrap();
        assert_eq!(
            stats,
            SweepStats {
                scanned: 3,
                ended: 2,
                already_ended: 0,
                errors: 1,
            }
        );

        let failed = CompetitionService::get(&ctx.state, ids[1]).await.unwrap();
        assert!(!failed.is_ended());
        for id in [ids[0], ids[2]] {
            assert!(CompetitionService::get(&ctx.state, id).await.unwrap().is_ended());
        }
    }
}
