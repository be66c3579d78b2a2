//! Cache Statistics Module
//!
//! Point-in-time classification of entries plus lifetime hit/miss/eviction counters.

use serde::Serialize;

// == Access Counters ==
/// Lifetime counters kept by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AccessCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl AccessCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Cache Stats ==
/// Snapshot of cache occupancy and performance.
///
/// `expired` counts entries past their TTL that no read or sweep has removed
/// yet; `get` already treats them as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Entries physically present
    pub total: usize,
    /// Entries still within their TTL
    pub active: usize,
    /// Entries past their TTL awaiting removal
    pub expired: usize,
    /// Capacity bound
    pub max_size: usize,
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl CacheStats {
    pub(crate) fn new(
        total: usize,
        active: usize,
        max_size: usize,
        counters: AccessCounters,
    ) -> Self {
        Self {
            total,
            active,
            expired: total - active,
            max_size,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            hit_rate: hit_rate(counters.hits, counters.misses),
        }
    }

    // == Hit Rate ==
    /// Hit rate rendered as a percentage with one decimal, e.g. `"83.3%"`.
    pub fn hit_rate_percent(&self) -> String {
        format!("{:.1}%", self.hit_rate * 100.0)
    }
}

/// Returns hits / (hits + misses), or 0.0 if no reads have been made.
fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
