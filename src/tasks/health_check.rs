//! Periodic Health Check Task
//!
//! Keeps the retained health snapshot fresh so that the staleness window only
//! trips when probing has actually stopped.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::MIN_INTERVAL;
use crate::resilience::HealthMonitor;

/// Spawns a task probing the backing store every `interval`.
pub fn spawn_health_check_task(monitor: Arc<HealthMonitor>, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(MIN_INTERVAL);
    tokio::spawn(async move {
        info!(
            "Starting health check task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let snapshot = monitor.check_connection().await;
            debug!(
                "Health check: healthy={} latency={}ms",
                snapshot.is_healthy, snapshot.latency_ms
            );
        }
    })
}
