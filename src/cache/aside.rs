//! Cache-aside execution
//!
//! `with_cache` checks the cache, runs the fetcher on a miss and stores its
//! result. Concurrent misses on one key are not collapsed: each caller runs
//! its own fetcher and the last write wins.

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::Cache;

impl Cache {
    /// Returns the cached value for `key`, or runs `fetcher` and caches its result.
    ///
    /// A fetcher error is returned unchanged and nothing is cached. No retry
    /// happens here; wrap the fetcher with the retry executor for that.
    pub async fn with_cache<T, E, F, Fut>(
        &self,
        key: &str,
        fetcher: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            debug!("Cache hit for key: {}", key);
            return Ok(cached);
        }

        debug!("Cache miss for key: {}, fetching", key);
        let data = fetcher().await?;
        self.set(key, &data, ttl).await;
        Ok(data)
    }
}
