//! Timeout Guard
//!
//! Bounds how long a caller waits for an operation. The default guard is
//! advisory: the operation runs as a detached task and keeps going after the
//! caller has given up, side effects included. `with_timeout_cancelling` is
//! the explicit opt-in that drops the operation at the deadline.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::TimeoutError;

/// Waits at most `limit` for `operation` to settle.
///
/// On timeout the caller receives `TimeoutError::Elapsed` while the operation
/// continues in the background; its eventual result is discarded. A panic
/// inside the operation is resumed on the caller.
pub async fn with_timeout<F, T, E>(operation: F, limit: Duration) -> Result<T, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: From<TimeoutError> + Send + 'static,
{
    let handle = tokio::spawn(operation);

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
        Ok(Err(_)) => Err(TimeoutError::Aborted.into()),
        Err(_) => {
            debug!(
                "Stopped waiting after {}ms; operation left running",
                limit.as_millis()
            );
            Err(TimeoutError::Elapsed(limit).into())
        }
    }
}

/// Waits at most `limit` for `operation`, dropping it at the deadline.
///
/// Work the operation has not reached by then never happens.
pub async fn with_timeout_cancelling<F, T, E>(operation: F, limit: Duration) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Cancelled operation after {}ms", limit.as_millis());
            Err(TimeoutError::Elapsed(limit).into())
        }
    }
}
