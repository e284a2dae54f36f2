//! Value Cache Module
//!
//! Thread-safe cache context: the memory limit / enable policy around a
//! [`ValueStore`], and the lookup-or-compute path used by evaluators.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::cache::{fingerprint, CacheStats, Fingerprint, MemoryUsage, UpstreamState, ValueStore};
use crate::error::Result;

// == Public Constants ==
/// Memory limit a cache starts with unless configured otherwise (500 MiB)
pub const DEFAULT_MEMORY_LIMIT: usize = 500 * 1024 * 1024;

// == Evaluator ==
/// The graph engine side of the cache: knows how to describe a slot's
/// upstream state and how to compute its value.
pub trait Evaluator {
    type Value: MemoryUsage;

    /// Snapshot of everything `slot` transitively depends on.
    ///
    /// Fails with `CacheError::InvalidSlot` for slots the evaluator
    /// cannot resolve.
    fn upstream_state(&self, slot: &str) -> Result<UpstreamState>;

    /// Computes the value of `slot`.
    ///
    /// The cache is passed along so inputs can be resolved through it.
    fn compute(&self, slot: &str, cache: &ValueCache<Self::Value>) -> Result<Self::Value>;
}

// == Evaluation ==
/// Result of a lookup-or-compute call.
#[derive(Debug)]
pub struct Evaluation<V> {
    /// Shared handle to the value
    pub value: Arc<V>,
    /// Key the value is stored under
    pub fingerprint: Fingerprint,
    /// Whether the value came from the cache rather than a fresh compute
    pub cached: bool,
}

// == Value Cache ==
/// Memory-bounded memoization context shared by evaluation threads.
///
/// All store state sits behind one mutex; the lock is never held while an
/// evaluator computes.
#[derive(Debug)]
pub struct ValueCache<V> {
    store: Mutex<ValueStore<V>>,
}

impl<V> ValueCache<V> {
    // == Constructor ==
    /// Creates a cache bounded to `memory_limit` bytes (0 = disabled).
    pub fn new(memory_limit: usize) -> Self {
        Self {
            store: Mutex::new(ValueStore::new(memory_limit)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ValueStore<V>> {
        // Store operations never panic mid-update, so a poisoned lock still
        // guards consistent state
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Policy ==
    /// True while the memory limit is above zero.
    pub fn is_enabled(&self) -> bool {
        self.lock().limit() > 0
    }

    pub fn memory_limit(&self) -> usize {
        self.lock().limit()
    }

    /// Sets the memory limit, evicting immediately if usage no longer fits.
    ///
    /// A limit of 0 disables the cache and drops every entry; raising it
    /// again starts from an empty store.
    pub fn set_memory_limit(&self, memory_limit: usize) {
        let mut store = self.lock();
        let previous = store.limit();
        store.set_limit(memory_limit);

        if previous != memory_limit {
            info!(
                "Cache memory limit changed from {} to {} bytes ({} entries retained)",
                previous,
                memory_limit,
                store.len()
            );
        }
    }

    /// Drops every entry without changing the limit.
    pub fn clear(&self) -> usize {
        let removed = self.lock().clear();
        info!("Cache cleared: {} entries removed", removed);
        removed
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.lock().memory_usage()
    }

    // == Lookup / Store ==
    /// Returns the shared value stored under `key`, if any.
    ///
    /// Always a miss while the cache is disabled.
    pub fn lookup(&self, key: &Fingerprint) -> Option<Arc<V>> {
        self.lock().get(key)
    }

    /// Stores a value under `key`. A no-op while the cache is disabled.
    ///
    /// A concurrent store under the same key replaces the earlier one.
    pub fn store(&self, key: Fingerprint, value: Arc<V>, size: usize) -> bool {
        self.lock().put(key, value, size)
    }

    // == Get Value ==
    /// Looks up or computes `slot`, returning the fingerprint alongside.
    pub fn evaluate<E>(&self, evaluator: &E, slot: &str) -> Result<Evaluation<V>>
    where
        E: Evaluator<Value = V>,
        V: MemoryUsage,
    {
        let upstream = evaluator.upstream_state(slot)?;
        let key = fingerprint(slot, &upstream);

        if let Some(value) = self.lookup(&key) {
            debug!("Cache hit for '{}' ({:?})", slot, key);
            return Ok(Evaluation {
                value,
                fingerprint: key,
                cached: true,
            });
        }

        debug!("Cache miss for '{}' ({:?}), computing", slot, key);
        let value = Arc::new(evaluator.compute(slot, self)?);
        self.store(key, Arc::clone(&value), value.memory_usage());

        Ok(Evaluation {
            value,
            fingerprint: key,
            cached: false,
        })
    }

    /// Returns a shared handle to the value of `slot`.
    ///
    /// While the entry survives, repeated calls return the same allocation
    /// (`Arc::ptr_eq` holds). A failed compute stores nothing.
    pub fn get_value<E>(&self, evaluator: &E, slot: &str) -> Result<Arc<V>>
    where
        E: Evaluator<Value = V>,
        V: MemoryUsage,
    {
        Ok(self.evaluate(evaluator, slot)?.value)
    }

    /// Returns an independent copy of the value of `slot`.
    pub fn get_value_copy<E>(&self, evaluator: &E, slot: &str) -> Result<V>
    where
        E: Evaluator<Value = V>,
        V: MemoryUsage + Clone,
    {
        let value = self.get_value(evaluator, slot)?;
        Ok(V::clone(&value))
    }
}

impl<V> Default for ValueCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_LIMIT)
    }
}

// == Limit Clamping ==
/// Converts a signed byte count from an external surface into a limit.
///
/// Negative values clamp to 0 (disabled).
pub fn clamp_limit(bytes: i64) -> usize {
    usize::try_from(bytes.max(0)).unwrap_or(usize::MAX)
}
