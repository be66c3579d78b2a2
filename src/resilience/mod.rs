//! Resilience Module
//!
//! Guards around the backing store: advisory timeouts, retry with exponential
//! backoff, and a single-snapshot health monitor.

mod health;
mod probe;
mod retry;
mod timeout;

pub use health::{HealthMonitor, HealthSnapshot};
pub use probe::{Probe, TcpProbe};
pub use retry::{RetryExecutor, RetryPolicy, DEFAULT_OPERATION_LABEL};
pub use timeout::{with_timeout, with_timeout_cancelling};
