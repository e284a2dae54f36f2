//! Cache Entry Module
//!
//! Defines the structure for individual cached values with size accounting.

use std::sync::Arc;

// == Cache Entry ==
/// A stored value together with the bytes it is charged for.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// Shared handle to the stored value
    pub value: Arc<V>,
    /// Accounted size in bytes
    pub size: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - Shared handle to the value
    /// * `size` - Size in bytes charged against the memory limit
    pub fn new(value: Arc<V>, size: usize) -> Self {
        Self { value, size }
    }

    // == Share ==
    /// Returns another handle to the stored value, never a copy.
    pub fn share(&self) -> Arc<V> {
        Arc::clone(&self.value)
    }
}

// == Memory Usage ==
/// Estimates how many bytes a value occupies.
///
/// Implementations should include heap allocations owned by the value;
/// the estimate is what the cache charges against its memory limit.
pub trait MemoryUsage {
    fn memory_usage(&self) -> usize;
}

impl MemoryUsage for String {
    fn memory_usage(&self) -> usize {
        std::mem::size_of::<String>() + self.len()
    }
}

impl MemoryUsage for Vec<u8> {
    fn memory_usage(&self) -> usize {
        std::mem::size_of::<Vec<u8>>() + self.len()
    }
}
