//! Integration Tests for the read path
//!
//! Combines cache-aside, the retry executor, the timeout guard and the health
//! monitor the way a domain collaborator does. Time is paused so backoff and
//! staleness assertions are exact.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_cache::cache::keys;
use storefront_cache::error::Result as StoreResult;
use storefront_cache::resilience::{Probe, DEFAULT_OPERATION_LABEL};
use storefront_cache::{
    with_timeout, Cache, ErrorKind, HealthMonitor, RetryExecutor, RetryPolicy, StoreError,
};
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Product {
    id: u32,
    name: String,
}

fn catalog() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Desk lamp".to_string(),
        },
        Product {
            id: 2,
            name: "Notebook".to_string(),
        },
    ]
}

struct SwitchProbe {
    failures_left: AtomicU32,
}

#[async_trait]
impl Probe for SwitchProbe {
    async fn ping(&self) -> StoreResult<()> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            Err(StoreError::transient("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_cached_read_survives_transient_failures() {
    let cache = Cache::new(100, Duration::from_secs(300));
    let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_millis(100)));
    let calls = Arc::new(AtomicU32::new(0));
    let key = keys::products(1, 10);

    let fetch = || {
        let calls = calls.clone();
        let executor = executor.clone();
        async move {
            executor
                .execute_with_retry(DEFAULT_OPERATION_LABEL, || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n < 2 {
                            Err(StoreError::from_message("Connection reset by peer"))
                        } else {
                            Ok(catalog())
                        }
                    }
                })
                .await
        }
    };

    let start = Instant::now();
    let first: Vec<Product> = assert_ok!(cache.with_cache(&key, fetch, None).await);
    // 100ms + 200ms of backoff
    assert_eq!(start.elapsed(), Duration::from_millis(300));
    assert_eq!(first, catalog());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let second: Vec<Product> = assert_ok!(
        cache
            .with_cache(
                &key,
                || async { Err::<Vec<Product>, _>(StoreError::transient("unused")) },
                None,
            )
            .await
    );
    assert_eq!(second, catalog());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_error_is_not_retried_or_cached() {
    let cache = Cache::new(100, Duration::from_secs(300));
    let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_millis(100)));
    let calls = AtomicU32::new(0);
    let key = keys::order_count();

    let start = Instant::now();
    let result: Result<u64, StoreError> = cache
        .with_cache(
            &key,
            || {
                executor.execute_with_retry("Count orders", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(StoreError::from_message("Unique constraint failed")) }
                })
            },
            None,
        )
        .await;

    let err = assert_err!(result);
    assert_eq!(err.kind(), ErrorKind::Constraint);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(!cache.has(&key).await);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_attempts_are_retried() {
    let executor = RetryExecutor::new(RetryPolicy::new(2, Duration::from_millis(50)));
    let calls = AtomicU32::new(0);

    let result: Result<&str, StoreError> = executor
        .execute_with_retry("Slow aggregate", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            with_timeout(
                async move {
                    if n == 0 {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                    }
                    Ok("report")
                },
                Duration::from_secs(1),
            )
        })
        .await;

    assert_eq!(assert_ok!(result), "report");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_connection_retry_probes_between_attempts() {
    let probe = Arc::new(SwitchProbe {
        failures_left: AtomicU32::new(1),
    });
    let monitor = HealthMonitor::new(
        probe,
        Duration::from_secs(30),
        Duration::from_secs(1),
        RetryPolicy::new(3, Duration::from_millis(10)),
    );
    let calls = AtomicU32::new(0);

    let result: Result<u32, StoreError> = monitor
        .execute_with_connection_retry(DEFAULT_OPERATION_LABEL, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(StoreError::transient("socket closed"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

    assert_eq!(assert_ok!(result), 1);
    // The single pre-retry probe hit the scripted failure
    let snapshot = monitor.last_snapshot().await.unwrap();
    assert!(!snapshot.is_healthy);
    assert!(!monitor.is_connection_healthy().await);
}

#[tokio::test(start_paused = true)]
async fn test_health_goes_stale_without_fresh_probes() {
    let probe = Arc::new(SwitchProbe {
        failures_left: AtomicU32::new(0),
    });
    let monitor = HealthMonitor::new(
        probe,
        Duration::from_secs(30),
        Duration::from_secs(1),
        RetryPolicy::default(),
    );

    assert!(monitor.is_connection_healthy().await);

    let snapshot = monitor.check_connection().await;
    assert!(snapshot.is_healthy);
    assert!(monitor.is_connection_healthy().await);

    tokio::time::advance(Duration::from_secs(59)).await;
    assert!(monitor.is_connection_healthy().await);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(!monitor.is_connection_healthy().await);
}

#[tokio::test(start_paused = true)]
async fn test_scope_invalidation_after_write() {
    let cache = Cache::new(100, Duration::from_secs(300));
    cache.set(&keys::products(1, 10), &catalog(), None).await;
    cache.set(&keys::product_count(), &2u64, None).await;
    cache.set(&keys::analytics_overview(), &"ok", None).await;

    // A product write invalidates product listings and the derived analytics
    let removed = cache.invalidate_products().await + cache.invalidate_analytics().await;

    assert_eq!(removed, 3);
    assert!(cache.is_empty().await);
}
