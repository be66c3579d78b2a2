//! Health Monitor
//!
//! Keeps a single snapshot of the latest probe of the backing store. Probe
//! failures are recorded in the snapshot, never returned as errors.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::warn;

use crate::config::{Config, MIN_INTERVAL};
use crate::error::{Retryable, StoreError};
use crate::resilience::{with_timeout, Probe, RetryExecutor, RetryPolicy};

// == Health Snapshot ==
/// Outcome of one probe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    /// Wall-clock time of the probe
    pub timestamp: DateTime<Utc>,
    pub is_healthy: bool,
    /// Time until success or failure
    pub latency_ms: u64,
    pub error: Option<String>,
    #[serde(skip)]
    checked_at: Instant,
}

impl HealthSnapshot {
    fn healthy(latency: Duration, checked_at: Instant) -> Self {
        Self {
            timestamp: Utc::now(),
            is_healthy: true,
            latency_ms: latency.as_millis() as u64,
            error: None,
            checked_at,
        }
    }

    fn unhealthy(latency: Duration, error: String, checked_at: Instant) -> Self {
        Self {
            timestamp: Utc::now(),
            is_healthy: false,
            latency_ms: latency.as_millis() as u64,
            error: Some(error),
            checked_at,
        }
    }

    /// Time since the probe finished.
    pub fn age(&self) -> Duration {
        self.checked_at.elapsed()
    }
}

// == Health Monitor ==
pub struct HealthMonitor {
    probe: Arc<dyn Probe>,
    last: RwLock<Option<HealthSnapshot>>,
    check_interval: Duration,
    probe_timeout: Duration,
    retry: RetryExecutor,
}

impl HealthMonitor {
    pub fn new(
        probe: Arc<dyn Probe>,
        check_interval: Duration,
        probe_timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            probe,
            last: RwLock::new(None),
            check_interval: check_interval.max(MIN_INTERVAL),
            probe_timeout,
            retry: RetryExecutor::new(retry_policy),
        }
    }

    pub fn from_config(config: &Config, probe: Arc<dyn Probe>) -> Self {
        Self::new(
            probe,
            config.health_check_interval(),
            config.probe_timeout(),
            config.retry_policy(),
        )
    }

    /// Snapshots older than this are no longer trusted.
    pub fn staleness_window(&self) -> Duration {
        self.check_interval.saturating_mul(2)
    }

    // == Check Connection ==
    /// Probes the store and replaces the retained snapshot with the outcome.
    pub async fn check_connection(&self) -> HealthSnapshot {
        let start = Instant::now();
        let probe = self.probe.clone();
        let outcome: Result<(), StoreError> =
            with_timeout(async move { probe.ping().await }, self.probe_timeout).await;
        let latency = start.elapsed();

        let snapshot = match outcome {
            Ok(()) => HealthSnapshot::healthy(latency, Instant::now()),
            Err(err) => {
                warn!("Database health check failed after {}ms: {}", latency.as_millis(), err);
                HealthSnapshot::unhealthy(latency, err.to_string(), Instant::now())
            }
        };

        *self.last.write().await = Some(snapshot.clone());
        snapshot
    }

    /// The retained snapshot, if any probe has run.
    pub async fn last_snapshot(&self) -> Option<HealthSnapshot> {
        self.last.read().await.clone()
    }

    // == Is Connection Healthy ==
    /// Optimistic before the first probe; afterwards healthy only if the last
    /// probe succeeded within the staleness window.
    pub async fn is_connection_healthy(&self) -> bool {
        match self.last.read().await.as_ref() {
            None => true,
            Some(snapshot) => snapshot.is_healthy && snapshot.age() < self.staleness_window(),
        }
    }

    // == Quick Connection Test ==
    /// Ad-hoc bounded probe that leaves the retained snapshot untouched.
    pub async fn quick_connection_test(&self, timeout: Duration) -> bool {
        let probe = self.probe.clone();
        let outcome: Result<(), StoreError> =
            with_timeout(async move { probe.ping().await }, timeout).await;

        match outcome {
            Ok(()) => true,
            Err(err) => {
                warn!("Quick connection test failed: {}", err);
                false
            }
        }
    }

    /// Runs `operation` under the retry policy, probing this monitor before
    /// each retry for diagnostics.
    pub async fn execute_with_connection_retry<T, E, F, Fut>(
        &self,
        label: &str,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        self.retry.execute_with_probe(label, self, operation).await
    }
}
