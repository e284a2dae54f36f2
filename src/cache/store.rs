//! Value Store Module
//!
//! Bounded storage combining a HashMap of entries with LRU tracking and
//! byte-size accounting against a memory limit.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Fingerprint, LruTracker};

// == Value Store ==
/// Fingerprint-keyed storage that never holds more bytes than its limit.
#[derive(Debug)]
pub struct ValueStore<V> {
    /// Fingerprint to entry storage
    entries: HashMap<Fingerprint, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Sum of the sizes of all live entries
    memory_usage: usize,
    /// Maximum bytes the live entries may occupy
    memory_limit: usize,
}

impl<V> ValueStore<V> {
    // == Constructor ==
    /// Creates an empty store bounded to `memory_limit` bytes.
    pub fn new(memory_limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            memory_usage: 0,
            memory_limit,
        }
    }

    // == Get ==
    /// Looks up a value, marking it most recently used on a hit.
    ///
    /// Returns the stored handle itself, so repeated lookups of the same
    /// entry are `Arc::ptr_eq`.
    pub fn get(&mut self, key: &Fingerprint) -> Option<Arc<V>> {
        match self.entries.get(key) {
            Some(entry) => {
                let value = entry.share();
                self.stats.record_hit();
                self.lru.touch(*key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Inserts or replaces the value stored under `key`.
    ///
    /// Least recently used entries are evicted until the total fits the
    /// limit again. A value larger than the whole limit is not retained and
    /// leaves the other entries alone; any previous value under `key` is
    /// still dropped. Returns whether the value is now stored.
    pub fn put(&mut self, key: Fingerprint, value: Arc<V>, size: usize) -> bool {
        self.remove(&key);

        if self.memory_limit == 0 {
            return false;
        }

        if size > self.memory_limit {
            self.stats.record_rejection();
            debug!(
                "Rejected {:?}: {} bytes exceeds limit of {} bytes",
                key, size, self.memory_limit
            );
            return false;
        }

        self.entries.insert(key, CacheEntry::new(value, size));
        self.lru.touch(key);
        self.memory_usage += size;

        self.evict_to_limit();
        true
    }

    // == Remove ==
    /// Removes an entry, releasing its bytes.
    pub fn remove(&mut self, key: &Fingerprint) -> Option<Arc<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.memory_usage -= entry.size;
        Some(entry.value)
    }

    // == Set Limit ==
    /// Changes the memory limit, evicting immediately if usage no longer fits.
    ///
    /// A limit of 0 clears the store.
    pub fn set_limit(&mut self, memory_limit: usize) {
        self.memory_limit = memory_limit;
        if memory_limit == 0 {
            self.clear();
        } else {
            self.evict_to_limit();
        }
    }

    // == Limit ==
    pub fn limit(&self) -> usize {
        self.memory_limit
    }

    // == Clear ==
    /// Drops every entry. Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.memory_usage = 0;
        count
    }

    // == Evict To Limit ==
    /// Evicts least recently used entries until usage fits the limit.
    ///
    /// Returns the number of entries evicted.
    fn evict_to_limit(&mut self) -> usize {
        let mut evicted = 0;

        while self.memory_usage > self.memory_limit {
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.memory_usage -= entry.size;
                self.stats.record_eviction();
                evicted += 1;
                debug!("Evicted {:?} ({} bytes)", key, entry.size);
            }
        }

        evicted
    }

    // == Contains ==
    /// Checks for an entry without touching its recency or the stats.
    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains_key(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.memory_usage = self.memory_usage;
        stats.memory_limit = self.memory_limit;
        stats
    }

    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{fingerprint, UpstreamState};

    fn key(name: &str) -> Fingerprint {
        fingerprint(name, &UpstreamState::new())
    }

    fn value(s: &str) -> Arc<String> {
        Arc::new(s.to_string())
    }

    #[test]
    fn test_store_new() {
        let store: ValueStore<String> = ValueStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.limit(), 100);
        assert_eq!(store.memory_usage(), 0);
    }

    #[test]
    fn test_store_put_and_get_shares_value() {
        let mut store = ValueStore::new(100);

        assert!(store.put(key("a"), value("d"), 10));
        let v1 = store.get(&key("a")).unwrap();
        let v2 = store.get(&key("a")).unwrap();

        assert_eq!(*v1, "d");
        assert!(Arc::ptr_eq(&v1, &v2));
        assert_eq!(store.memory_usage(), 10);
    }

    #[test]
    fn test_store_get_missing() {
        let mut store: ValueStore<String> = ValueStore::new(100);
        assert!(store.get(&key("missing")).is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_replace_releases_old_bytes() {
        let mut store = ValueStore::new(100);

        store.put(key("a"), value("one"), 30);
        store.put(key("a"), value("two"), 20);

        assert_eq!(store.len(), 1);
        assert_eq!(store.memory_usage(), 20);
        assert_eq!(*store.get(&key("a")).unwrap(), "two");
    }

    #[test]
    fn test_store_evicts_lru_by_size() {
        let mut store = ValueStore::new(30);

        store.put(key("a"), value("a"), 10);
        store.put(key("b"), value("b"), 10);
        store.put(key("c"), value("c"), 10);
        store.put(key("d"), value("d"), 10);

        assert_eq!(store.len(), 3);
        assert_eq!(store.memory_usage(), 30);
        assert!(!store.contains(&key("a")));
        assert!(store.contains(&key("d")));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_get_refreshes_recency() {
        let mut store = ValueStore::new(30);

        store.put(key("a"), value("a"), 10);
        store.put(key("b"), value("b"), 10);
        store.put(key("c"), value("c"), 10);

        store.get(&key("a"));
        store.put(key("d"), value("d"), 10);

        assert!(store.contains(&key("a")));
        assert!(!store.contains(&key("b")));
    }

    #[test]
    fn test_store_large_put_evicts_many() {
        let mut store = ValueStore::new(30);

        store.put(key("a"), value("a"), 10);
        store.put(key("b"), value("b"), 10);
        store.put(key("c"), value("c"), 10);
        store.put(key("big"), value("big"), 25);

        assert_eq!(store.len(), 1);
        assert!(store.contains(&key("big")));
        assert_eq!(store.stats().evictions, 3);
    }

    #[test]
    fn test_store_oversized_value_never_retained() {
        let mut store = ValueStore::new(30);

        store.put(key("a"), value("a"), 10);
        assert!(!store.put(key("huge"), value("huge"), 31));

        assert!(store.get(&key("huge")).is_none());
        assert!(store.contains(&key("a")));
        assert_eq!(store.memory_usage(), 10);
        assert_eq!(store.stats().rejections, 1);
    }

    #[test]
    fn test_store_set_limit_evicts() {
        let mut store = ValueStore::new(100);

        store.put(key("a"), value("a"), 10);
        store.put(key("b"), value("b"), 10);
        store.put(key("c"), value("c"), 10);

        store.set_limit(20);
        assert_eq!(store.len(), 2);
        assert!(!store.contains(&key("a")));

        // Same limit again is a no-op
        store.set_limit(20);
        assert_eq!(store.len(), 2);
        assert_eq!(store.memory_usage(), 20);
    }

    #[test]
    fn test_store_zero_limit_clears_and_refuses() {
        let mut store = ValueStore::new(100);

        store.put(key("a"), value("a"), 10);
        store.set_limit(0);

        assert!(store.is_empty());
        assert_eq!(store.memory_usage(), 0);
        assert!(!store.put(key("a"), value("a"), 10));
        assert!(store.get(&key("a")).is_none());
        assert_eq!(store.stats().rejections, 0);
    }

    #[test]
    fn test_store_remove_and_clear() {
        let mut store = ValueStore::new(100);

        store.put(key("a"), value("a"), 10);
        store.put(key("b"), value("b"), 10);

        assert_eq!(*store.remove(&key("a")).unwrap(), "a");
        assert!(store.remove(&key("a")).is_none());
        assert_eq!(store.memory_usage(), 10);

        assert_eq!(store.clear(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_stats() {
        let mut store = ValueStore::new(100);

        store.put(key("a"), value("a"), 10);
        store.get(&key("a"));
        store.get(&key("missing"));

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.memory_usage, 10);
        assert_eq!(stats.memory_limit, 100);
    }
}
