//! Cache Store Module
//!
//! Main cache engine: HashMap storage with lazy TTL expiration and LRU eviction.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::stats::AccessCounters;
use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Bounded key-value store with lazy expiration and LRU eviction.
///
/// Not synchronized; share it through [`crate::cache::Cache`].
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Hit/miss/eviction counters
    counters: AccessCounters,
    /// Monotonic access sequence
    tick: u64,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            counters: AccessCounters::default(),
            tick: 0,
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// A hit refreshes `access_count` and `last_accessed_at`. An expired entry
    /// is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_with(key, |data| Some(data.clone()))
    }

    /// Like `get`, reading the live value through `read`.
    ///
    /// When `read` yields `None` the lookup counts as a miss and the entry's
    /// access stats stay untouched.
    pub fn get_with<T, F>(&mut self, key: &str, read: F) -> Option<T>
    where
        F: FnOnce(&V) -> Option<T>,
    {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.counters.record_miss();
            return None;
        }

        let Some(value) = self.entries.get(key).and_then(|entry| read(&entry.data)) else {
            self.counters.record_miss();
            return None;
        };

        let tick = self.next_tick();
        if let Some(entry) = self.entries.get_mut(key) {
            entry.touch(now, tick);
        }
        self.counters.record_hit();
        Some(value)
    }

    // == Set ==
    /// Stores `data` under `key`, overwriting any previous entry.
    ///
    /// When inserting a new key into a full store, the least recently accessed
    /// entry is evicted first.
    pub fn set(&mut self, key: impl Into<String>, data: V, ttl: Option<Duration>) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_least_recently_used();
        }

        let now = Instant::now();
        let tick = self.next_tick();
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key, CacheEntry::new(data, ttl, now, tick));
    }

    /// Removes the entry with the oldest `last_accessed_at` by full scan.
    fn evict_least_recently_used(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.recency())
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.counters.record_eviction();
            debug!("Evicted least recently used key: {}", key);
        }
    }

    // == Has ==
    /// Same expiry check as `get`, without touching access stats.
    pub fn has(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Cleanup ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    /// Removes every entry whose key satisfies `predicate`.
    pub(crate) fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        before - self.entries.len()
    }

    // == Stats ==
    /// Classifies entries by expiry without removing any.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let active = self
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count();
        CacheStats::new(self.entries.len(), active, self.max_entries, self.counters)
    }

    /// Raw entry access, including expired entries.
    #[cfg(test)]
    pub(crate) fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Keys currently stored, expired or not.
    #[cfg(test)]
    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    // == Length ==
    /// Returns the current number of entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
