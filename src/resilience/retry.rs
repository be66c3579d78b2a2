//! Retry Executor
//!
//! Runs a fallible operation up to `max_attempts` times with exponential
//! backoff. Fatal errors stop the loop at once; on exhaustion the last
//! attempt's error is returned as-is.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::Retryable;
use crate::resilience::HealthMonitor;

/// Label used when callers do not name their operation.
pub const DEFAULT_OPERATION_LABEL: &str = "Database operation";

// == Retry Policy ==
/// Attempt bound and backoff base, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; zero is treated as one
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles for each later one
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff after `failed_attempts` retryable failures: `base * 2^(n-1)`.
    pub fn delay_for(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1);
        let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

// == Retry Executor ==
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Runs `operation` until it succeeds, fails fatally, or attempts run out.
    pub async fn execute_with_retry<T, E, F, Fut>(&self, label: &str, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        self.run(label, operation, None).await
    }

    /// Same as `execute_with_retry`, probing `monitor` before every attempt
    /// after the first. The probe result is only logged.
    pub async fn execute_with_probe<T, E, F, Fut>(
        &self,
        label: &str,
        monitor: &HealthMonitor,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        self.run(label, operation, Some(monitor)).await
    }

    async fn run<T, E, F, Fut>(
        &self,
        label: &str,
        mut operation: F,
        monitor: Option<&HealthMonitor>,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            debug!("{}: attempt {}/{}", label, attempt, max_attempts);

            if attempt > 1 {
                if let Some(monitor) = monitor {
                    let health = monitor.check_connection().await;
                    if !health.is_healthy {
                        warn!(
                            "{}: connection unhealthy (latency: {}ms): {}",
                            label,
                            health.latency_ms,
                            health.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                }
            }

            let err = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{}: succeeded on attempt {}", label, attempt);
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            warn!("{}: attempt {} failed: {}", label, attempt, err);

            if !err.is_retryable() {
                warn!("{}: not retrying due to error type", label);
                return Err(err);
            }

            if attempt >= max_attempts {
                error!("{}: all {} attempts failed", label, max_attempts);
                return Err(err);
            }

            let delay = self.policy.delay_for(attempt);
            info!(
                "{}: waiting {}ms before retry",
                label,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
