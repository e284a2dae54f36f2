//! Value Cache - Memoized, memory-bounded evaluation of graph slots
//!
//! Caches computed values by a fingerprint of the slot and its upstream
//! state, sharing stored values by reference and evicting least recently
//! used entries to stay within a memory limit.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Evaluator, ValueCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_stats_reporter;
