//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction, glob
//! invalidation and a cache-aside helper.

mod aside;
mod entry;
pub mod keys;
mod pattern;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, MAX_TTL};
pub use pattern::{InvalidationScope, KeyPattern};
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
