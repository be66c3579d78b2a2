//! Shared Cache Handle
//!
//! The one cache instance of the process, cloned into every collaborator.
//! Values are held as JSON so collaborators can cache any serde type.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{CacheStats, CacheStore, InvalidationScope};
use crate::config::Config;

// == Cache ==
/// Cloneable handle over the process-wide cache store.
///
/// Each method takes the lock for one store operation only, so no call
/// holds the lock across an await of caller code.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<RwLock<CacheStore<Value>>>,
}

impl Cache {
    /// Creates an empty cache.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self::from_store(CacheStore::new(max_entries, default_ttl))
    }

    pub fn from_store(store: CacheStore<Value>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, config.default_ttl())
    }

    // == Get ==
    /// Returns the cached value for `key` as `T`.
    ///
    /// A value stored under a different shape is reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.store
            .write()
            .await
            .get_with(key, |value| match T::deserialize(value) {
                Ok(data) => Some(data),
                Err(err) => {
                    warn!("Cached value for key {} has unexpected shape: {}", key, err);
                    None
                }
            })
    }

    // == Set ==
    /// Stores `data` under `key`. Values that fail to serialize are not cached.
    pub async fn set<T: Serialize>(&self, key: &str, data: &T, ttl: Option<Duration>) {
        match serde_json::to_value(data) {
            Ok(value) => self.store.write().await.set(key, value, ttl),
            Err(err) => warn!("Skipping cache write for key {}: {}", key, err),
        }
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    // == Cleanup ==
    /// Sweeps expired entries. Returns the number removed.
    pub async fn cleanup(&self) -> usize {
        self.store.write().await.cleanup()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Invalidation ==
    /// Deletes every key matching the glob `pattern`.
    pub async fn invalidate(&self, pattern: &str) -> usize {
        self.store.write().await.invalidate(pattern)
    }

    pub async fn invalidate_scope(&self, scope: InvalidationScope) -> usize {
        self.store.write().await.invalidate_scope(scope)
    }

    pub async fn invalidate_products(&self) -> usize {
        self.invalidate_scope(InvalidationScope::Products).await
    }

    pub async fn invalidate_orders(&self) -> usize {
        self.invalidate_scope(InvalidationScope::Orders).await
    }

    pub async fn invalidate_sales(&self) -> usize {
        self.invalidate_scope(InvalidationScope::Sales).await
    }

    pub async fn invalidate_analytics(&self) -> usize {
        self.invalidate_scope(InvalidationScope::Analytics).await
    }

    pub async fn invalidate_all(&self) -> usize {
        self.invalidate_scope(InvalidationScope::All).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Product {
        sku: String,
        stock: u32,
    }

    fn cache() -> Cache {
        Cache::new(100, Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_typed_set_and_get() {
        let cache = cache();
        let product = Product {
            sku: "SKU-1".into(),
            stock: 12,
        };

        cache.set("products:1", &product, None).await;

        assert_eq!(cache.get::<Product>("products:1").await, Some(product));
        assert!(cache.has("products:1").await);
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_a_miss() {
        let cache = cache();
        cache.set("products:count", &42u32, None).await;

        assert_eq!(cache.get::<Product>("products:count").await, None);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);

        assert_eq!(cache.get::<u32>("products:count").await, Some(42));
        assert_eq!(cache.stats().await.hits, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let cache = cache();
        let other = cache.clone();

        cache.set("orders:count", &3u32, None).await;

        assert_eq!(other.get::<u32>("orders:count").await, Some(3));
        assert!(other.delete("orders:count").await);
        assert!(!cache.has("orders:count").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_through_handle() {
        let cache = cache();
        cache.set("sales:count", &1u32, Some(Duration::from_secs(5))).await;

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.stats().await.expired, 1);
        assert_eq!(cache.get::<u32>("sales:count").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_named_invalidation_helpers() {
        let cache = cache();
        for key in ["products:1:10", "product:count", "orders:1:10", "sales:count", "analytics:overview"] {
            cache.set(key, &0u8, None).await;
        }

        assert_eq!(cache.invalidate_products().await, 2);
        assert_eq!(cache.invalidate_orders().await, 1);
        assert_eq!(cache.invalidate_sales().await, 1);
        assert_eq!(cache.invalidate_analytics().await, 1);
        assert!(cache.is_empty().await);

        cache.set("categories:all", &0u8, None).await;
        assert_eq!(cache.invalidate_all().await, 1);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_clear_and_cleanup() {
        let cache = cache();
        cache.set("a", &1u8, None).await;
        assert_eq!(cache.cleanup().await, 0);
        assert_eq!(cache.clear().await, 1);
    }
}
