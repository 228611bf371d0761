//! Cache Store Module
//!
//! Bounded key/value map combining HashMap storage with LRU tracking and
//! lazy plus periodic TTL expiry.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Local cache storage with LRU eviction and TTL support.
///
/// Invariants after every call: `len() <= capacity()` and every stored key is
/// tracked exactly once in the recency order.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Recency order, most recent first
    lru: LruTracker,
    stats: CacheStats,
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// A zero capacity is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "cache capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Set ==
    /// Stores a key-value pair expiring `ttl` from now.
    ///
    /// An existing entry for `key` is replaced. When the store is full the
    /// least recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) {
        if self.entries.remove(&key).is_some() {
            self.lru.remove(&key);
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                tracing::debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key, refreshing its recency.
    ///
    /// Expired entries are removed on access and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        self.lru.touch(key);
        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Evict Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn evict_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();

        let lru = &mut self.lru;
        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                lru.remove(key);
            }
            keep
        });

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns true if `key` is stored, expired or not. Does not touch recency.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn recency(&self) -> Vec<String> {
        self.lru.keys()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const HOUR: Duration = Duration::from_secs(3600);

    fn store(capacity: usize) -> CacheStore {
        CacheStore::new(capacity).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_zero_capacity_rejected() {
        assert!(matches!(
            CacheStore::new(0),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string(), HOUR);

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string(), HOUR);
        store.set("key1".to_string(), "value2".to_string(), HOUR);

        assert_eq!(store.get("key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.recency(), vec!["key1"]);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict_other_keys() {
        let mut store = store(2);

        store.set("a".to_string(), "1".to_string(), HOUR);
        store.set("b".to_string(), "2".to_string(), HOUR);
        store.set("a".to_string(), "3".to_string(), HOUR);

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.recency(), vec!["a", "b"]);
    }

    #[test]
    fn test_store_zero_ttl_not_found() {
        let mut store = store(10);

        store.set("gone".to_string(), "v".to_string(), Duration::ZERO);

        assert_eq!(store.get("gone"), None);
        assert!(!store.contains_key("gone"));
        assert!(store.recency().is_empty());
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string(), Duration::from_millis(50));
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(3);

        store.set("key1".to_string(), "value1".to_string(), HOUR);
        store.set("key2".to_string(), "value2".to_string(), HOUR);
        store.set("key3".to_string(), "value3".to_string(), HOUR);
        store.set("key4".to_string(), "value4".to_string(), HOUR);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(3);

        store.set("key1".to_string(), "value1".to_string(), HOUR);
        store.set("key2".to_string(), "value2".to_string(), HOUR);
        store.set("key3".to_string(), "value3".to_string(), HOUR);

        store.get("key1").unwrap();

        store.set("key4".to_string(), "value4".to_string(), HOUR);

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_capacity_two_end_to_end() {
        let mut store = store(2);

        store.set("k1".to_string(), "v1".to_string(), HOUR);
        store.set("k2".to_string(), "v2".to_string(), HOUR);
        store.set("k3".to_string(), "v3".to_string(), HOUR);

        assert_eq!(store.get("k1"), None);
        assert_eq!(store.get("k2").as_deref(), Some("v2"));
        assert_eq!(store.get("k3").as_deref(), Some("v3"));
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string(), HOUR);
        store.get("key1").unwrap();
        let _ = store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_evict_expired() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string(), Duration::ZERO);
        store.set("key2".to_string(), "value2".to_string(), HOUR);
        store.set("key3".to_string(), "value3".to_string(), Duration::ZERO);

        let removed = store.evict_expired();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.recency(), vec!["key2"]);
        assert_eq!(store.stats().expirations, 2);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_store_evict_expired_nothing_to_do() {
        let mut store = store(4);
        assert_eq!(store.evict_expired(), 0);

        store.set("k".to_string(), "v".to_string(), HOUR);
        assert_eq!(store.evict_expired(), 0);
        assert_eq!(store.len(), 1);
    }
}
