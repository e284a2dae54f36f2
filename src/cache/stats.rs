//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a stored value
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Number of entries evicted to stay within the memory limit
    pub evictions: u64,
    /// Number of values refused because they alone exceed the limit
    pub rejections: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Bytes currently charged against the limit
    pub memory_usage: usize,
    /// Configured memory limit in bytes
    pub memory_limit: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_rejection(&mut self) {
        self.rejections += 1;
    }
}
