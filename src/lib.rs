//! Storefront Cache - caching and database-resilience layer
//!
//! Every read path of the storefront funnels through this crate: a bounded
//! TTL cache with LRU eviction and glob invalidation, a cache-aside helper,
//! an advisory timeout guard, and a retry executor paired with a health
//! monitor for the backing store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod resilience;
pub mod tasks;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
pub use error::{ErrorKind, Retryable, StoreError, TimeoutError};
pub use resilience::{with_timeout, HealthMonitor, HealthSnapshot, RetryExecutor, RetryPolicy};
pub use tasks::{spawn_cleanup_task, spawn_health_check_task};
