//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries, bounding
//! memory for keys that are never read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::config::MIN_INTERVAL;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// Intervals below [`MIN_INTERVAL`] are raised to it.
///
/// Overlapping sweeps (for instance with `POST /health`) are harmless since
/// removing an already removed key is a no-op.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: Cache, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(MIN_INTERVAL);
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
