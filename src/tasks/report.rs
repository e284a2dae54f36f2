//! Stats Reporter Task
//!
//! Background task that periodically logs value cache usage.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, ValueCache};

/// Spawns a background task that periodically logs cache statistics.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between reports. Reading the stats only takes the cache lock briefly.
///
/// # Arguments
/// * `cache` - Shared reference to the value cache
/// * `interval_secs` - Interval in seconds between reports
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ValueCache::<Data>::default());
/// let reporter = spawn_stats_reporter(cache.clone(), 30);
/// // Later, during shutdown:
/// reporter.abort();
/// ```
pub fn spawn_stats_reporter<V>(cache: Arc<ValueCache<V>>, interval_secs: u64) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache stats reporter with interval of {} seconds",
            interval.as_secs()
        );

        let mut last_lookups = 0;
        loop {
            tokio::time::sleep(interval).await;

            let stats = cache.stats();
            let lookups = stats.hits + stats.misses;
            if lookups != last_lookups {
                info!("{}", summarize(&stats));
            } else {
                debug!("Cache idle: {}", summarize(&stats));
            }
            last_lookups = lookups;
        }
    })
}

fn summarize(stats: &CacheStats) -> String {
    format!(
        "cache usage {}/{} bytes, {} entries, hit rate {:.1}%, {} evictions",
        stats.memory_usage,
        stats.memory_limit,
        stats.total_entries,
        stats.hit_rate() * 100.0,
        stats.evictions
    )
}
