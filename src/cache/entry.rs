//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access tracking.

use std::time::Duration;

use tokio::time::Instant;

/// Longest lifetime an entry can be given; larger TTLs are clamped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub data: V,
    /// When the entry was written
    pub created_at: Instant,
    /// When the entry stops being visible to readers
    pub expires_at: Instant,
    /// Number of reads served since the entry was written
    pub access_count: u64,
    /// Last read (or write) of the entry
    pub last_accessed_at: Instant,
    /// Store-wide access sequence number, breaks ties between equal instants
    pub(crate) access_tick: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` after `now`.
    ///
    /// A zero TTL is bumped to one millisecond so that `expires_at` always
    /// lies strictly after `created_at`. TTLs above [`MAX_TTL`] are clamped.
    pub fn new(data: V, ttl: Duration, now: Instant, tick: u64) -> Self {
        let ttl = ttl.clamp(Duration::from_millis(1), MAX_TTL);
        Self {
            data,
            created_at: now,
            expires_at: now + ttl,
            access_count: 0,
            last_accessed_at: now,
            access_tick: tick,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Touch ==
    /// Records a read.
    pub fn touch(&mut self, now: Instant, tick: u64) {
        self.access_count += 1;
        self.last_accessed_at = now;
        self.access_tick = tick;
    }

    /// Ordering key for LRU victim selection.
    pub(crate) fn recency(&self) -> (Instant, u64) {
        (self.last_accessed_at, self.access_tick)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new("value", Duration::from_secs(60), now, 0);

        assert_eq!(entry.data, "value");
        assert_eq!(entry.access_count, 0);
        assert_eq!(entry.last_accessed_at, now);
        assert!(entry.expires_at > entry.created_at);
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_still_expires_after_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, Duration::ZERO, now, 0);
        assert!(entry.expires_at > entry.created_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiration_is_strict() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, Duration::from_secs(10), now, 0);

        // Exactly at the deadline the entry is still live
        assert!(!entry.is_expired_at(entry.expires_at));
        assert!(entry.is_expired_at(entry.expires_at + Duration::from_millis(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_with_time() {
        let entry = CacheEntry::new(1u32, Duration::from_secs(1), Instant::now(), 0);

        tokio::time::advance(Duration::from_millis(1001)).await;

        assert!(entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_updates_access_stats() {
        let mut entry = CacheEntry::new(1u32, Duration::from_secs(60), Instant::now(), 0);

        tokio::time::advance(Duration::from_secs(5)).await;
        let later = Instant::now();
        entry.touch(later, 7);

        assert_eq!(entry.access_count, 1);
        assert_eq!(entry.last_accessed_at, later);
        assert_eq!(entry.recency(), (later, 7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_is_clamped() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, Duration::MAX, now, 0);

        assert_eq!(entry.expires_at, now + MAX_TTL);
        assert!(!entry.is_expired());
    }
}
