//! Periodic expiry sweep
//!
//! One ticker task owned by the process. Sweeps never overlap: the ticker and
//! the on-demand admin trigger both take the sweep guard from `AppState`, and
//! a caller that finds it held skips instead of queueing.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{
    error::AppResult,
    services::{LifecycleService, SweepStats},
    state::AppState,
};

/// Drives `LifecycleService::sweep_expired` on a fixed interval
pub struct ExpiryScheduler {
    state: AppState,
    interval: Duration,
}

/// Handle to a running scheduler
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ExpiryScheduler {
    pub fn new(state: AppState, interval: Duration) -> Self {
        Self { state, interval }
    }

    /// Run one sweep unless another is in progress, in which case `None`
    pub async fn run_once(state: &AppState) -> AppResult<Option<SweepStats>> {
        let guard = state.sweep_guard();
        let Ok(_running) = guard.try_lock() else {
            tracing::debug!("Expiry sweep already running, skipping");
            return Ok(None);
        };

        LifecycleService::sweep_expired(state).await.map(Some)
    }

    /// Start ticking. The first sweep runs immediately.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Expiry scheduler started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = Self::run_once(&self.state).await {
                        tracing::error!(error = %e, "Expiry sweep failed");
                    }
                }

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Expiry scheduler stopped");
    }
}

impl SchedulerHandle {
    /// Stop ticking and wait for an in-flight sweep to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Expiry scheduler task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    use crate::services::CompetitionService;
    use crate::test_utils::{TestContext, user};

    #[tokio::test]
    async fn test_run_once_skips_while_sweep_in_progress() {
        let ctx = TestContext::new();

        let guard = ctx.state.sweep_guard();
        let held = guard.lock().await;
        assert_eq!(ExpiryScheduler::run_once(&ctx.state).await.unwrap(), None);
        drop(held);

        let stats = ExpiryScheduler::run_once(&ctx.state).await.unwrap();
        assert_eq!(stats, Some(SweepStats::default()));
    }

    #[tokio::test]
    async fn test_spawned_scheduler_expires_and_stops() {
        let ctx = TestContext::new();
        let rubric = ctx.rubric().await;
        let competition = ctx.competition(&user(), rubric.id()).await;
        ctx.clock.advance(ChronoDuration::days(2));

        let handle = ExpiryScheduler::new(ctx.state.clone(), Duration::from_millis(10)).spawn();

        let mut ended = false;
        for _ in 0..200 {
            if CompetitionService::get(&ctx.state, competition.id)
                .await
                .unwrap()
                .is_ended()
            {
                ended = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(ended);

        tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
            .await
            .unwrap();
    }
}
