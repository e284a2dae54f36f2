//! Cache Module
//!
//! Memoizes computed slot values under a memory budget with LRU eviction.

mod entry;
mod fingerprint;
mod lru;
mod stats;
mod store;
mod value_cache;


// Re-export public types
pub use entry::{CacheEntry, MemoryUsage};
pub use fingerprint::{fingerprint, Fingerprint, UpstreamState};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::ValueStore;
pub use value_cache::{clamp_limit, Evaluation, Evaluator, ValueCache, DEFAULT_MEMORY_LIMIT};
