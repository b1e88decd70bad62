//! Background refresh loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::context::AppContext;
use crate::db::log::UpdateSource;

/// Start the periodic refresh task once per process. Returns false when a
/// scheduler is already running.
pub fn spawn_scheduler(ctx: Arc<AppContext>) -> bool {
    if !ctx.claim_scheduler() {
        info!("scheduler already running");
        return false;
    }

    let interval_mins = ctx.config().server.auto_update_interval.max(1);
    info!(interval_mins, "starting scheduler");

    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(interval_mins * 60));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            // The first tick completes immediately.
            interval.tick().await;
            match ctx.refresh(UpdateSource::Scheduler, false).await {
                Ok(snapshot) => info!(
                    events = snapshot.stats.total_events,
                    unassigned = snapshot.stats.unassigned_events,
                    "scheduled refresh done"
                ),
                Err(e) => error!(error = %e, "scheduled refresh failed"),
            }
        }
    });

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::fixture_context;

    #[tokio::test]
    async fn first_tick_publishes_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Arc::new(fixture_context(dir.path()));

        assert!(spawn_scheduler(Arc::clone(&ctx)));
        assert!(!spawn_scheduler(Arc::clone(&ctx)));

        for _ in 0..100 {
            if ctx.status().total_updates > 0 {
                break;
            }
            time::sleep(Duration::from_millis(50)).await;
        }

        let snapshot = ctx.snapshot().expect("scheduler published nothing");
        assert_eq!(snapshot.stats.total_events, 2);
        assert_eq!(ctx.recent_updates(1).unwrap()[0].source, "scheduler");
    }
}
