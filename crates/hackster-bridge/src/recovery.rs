//! Stale-claim recovery
//!
//! A worker that dies mid-claim leaves its row in `processing` forever. The
//! janitor returns such rows to `pending` so a live worker picks them up;
//! the dedup check makes the replay harmless. It also owns the queue depth
//! gauge, since it is already polling the table.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use hackster_common::telemetry::set_queue_depth;
use hackster_core::traits::EventQueueRepository;

/// Sweep cadence: half the visibility timeout, floored so a tiny timeout
/// cannot turn the janitor into a busy loop
fn sweep_interval(visibility_timeout: Duration) -> Duration {
    (visibility_timeout / 2).max(Duration::from_secs(5))
}

/// Periodic sweep loop; runs until the shutdown flag flips
pub async fn run_janitor(
    queue: Arc<dyn EventQueueRepository>,
    visibility_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let interval = sweep_interval(visibility_timeout);
    info!(interval_secs = interval.as_secs(), "Janitor started");

    loop {
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        match queue.requeue_stale(visibility_timeout).await {
            Ok(0) => {}
            Ok(recovered) => warn!(recovered, "Requeued stale in-flight events"),
            Err(e) => warn!(error = %e, "Stale sweep failed"),
        }

        match queue.depth().await {
            Ok(depth) => set_queue_depth(depth),
            Err(e) => debug!(error = %e, "Queue depth probe failed"),
        }
    }

    info!("Janitor stopped");
}
