//! Integration Tests for the value cache
//!
//! Drives `ValueCache` through the public API with the demo network and
//! with a custom evaluator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use value_cache::cache::{Evaluator, MemoryUsage, UpstreamState, ValueCache};
use value_cache::graph::{Data, Network, Op};
use value_cache::{CacheError, Result};

// == Helper Functions ==

/// `n.out` mirrors the string on `n.in`.
fn caching_test_node(input: &str) -> Network {
    let mut network = Network::new();
    network.add_node("n", Op::Passthrough).unwrap();
    network.set_input("n", 0, Data::from(input)).unwrap();
    network
}

/// Evaluator whose slots are `block0`, `block1`, ... each producing a
/// fixed-size buffer.
struct Blocks {
    size: usize,
    computations: AtomicUsize,
}

impl Blocks {
    fn new(size: usize) -> Self {
        Self {
            size,
            computations: AtomicUsize::new(0),
        }
    }
}

struct Block(Vec<u8>);

impl MemoryUsage for Block {
    fn memory_usage(&self) -> usize {
        self.0.len()
    }
}

impl Evaluator for Blocks {
    type Value = Block;

    fn upstream_state(&self, slot: &str) -> Result<UpstreamState> {
        if !slot.starts_with("block") {
            return Err(CacheError::InvalidSlot(slot.to_string()));
        }
        Ok(UpstreamState::new().with("size", self.size.to_le_bytes()))
    }

    fn compute(&self, _slot: &str, _cache: &ValueCache<Block>) -> Result<Block> {
        self.computations.fetch_add(1, Ordering::SeqCst);
        Ok(Block(vec![0; self.size]))
    }
}

// == Memory Limit Scenario ==

#[test]
fn test_cache_memory_limit() {
    let cache = ValueCache::default();
    let original_limit = cache.memory_limit();
    let n = caching_test_node("d");

    let v1 = cache.get_value(&n, "n").unwrap();
    let v2 = cache.get_value(&n, "n").unwrap();

    assert_eq!(v1, v2);
    assert_eq!(*v1, Data::from("d"));
    // The second call returned the cached result
    assert!(Arc::ptr_eq(&v1, &v2));

    cache.set_memory_limit(0);

    let v3 = cache.get_value(&n, "n").unwrap();
    assert_eq!(*v3, Data::from("d"));
    // The cache was cleared
    assert!(!Arc::ptr_eq(&v3, &v2));

    cache.set_memory_limit(original_limit);

    let v1 = cache.get_value(&n, "n").unwrap();
    let v2 = cache.get_value(&n, "n").unwrap();

    assert_eq!(v1, v2);
    assert_eq!(*v1, Data::from("d"));
    // Caching resumed
    assert!(Arc::ptr_eq(&v1, &v2));
}

#[test]
fn test_copy_path_returns_owned_value() {
    let cache = ValueCache::default();
    let n = caching_test_node("d");

    let copy: Data = cache.get_value_copy(&n, "n").unwrap();
    assert_eq!(copy, Data::from("d"));
    assert_eq!(cache.len(), 1);
}

// == Eviction ==

#[test]
fn test_tight_limit_keeps_most_recent() {
    let blocks = Blocks::new(100);
    let cache = ValueCache::new(350);

    for i in 0..5 {
        cache.get_value(&blocks, &format!("block{}", i)).unwrap();
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.memory_usage(), 300);
    assert_eq!(cache.stats().evictions, 2);

    // block2..block4 survive; block0 must be recomputed
    let before = blocks.computations.load(Ordering::SeqCst);
    for i in 2..5 {
        cache.get_value(&blocks, &format!("block{}", i)).unwrap();
    }
    assert_eq!(blocks.computations.load(Ordering::SeqCst), before);

    cache.get_value(&blocks, "block0").unwrap();
    assert_eq!(blocks.computations.load(Ordering::SeqCst), before + 1);
}

#[test]
fn test_value_larger_than_limit_is_never_retained() {
    let blocks = Blocks::new(1000);
    let cache = ValueCache::new(500);

    let v1 = cache.get_value(&blocks, "block0").unwrap();
    let v2 = cache.get_value(&blocks, "block0").unwrap();

    assert!(!Arc::ptr_eq(&v1, &v2));
    assert!(cache.is_empty());
    assert_eq!(cache.stats().rejections, 2);
}

#[test]
fn test_shrinking_limit_evicts_immediately() {
    let blocks = Blocks::new(100);
    let cache = ValueCache::new(1000);

    for i in 0..5 {
        cache.get_value(&blocks, &format!("block{}", i)).unwrap();
    }
    cache.set_memory_limit(200);

    assert_eq!(cache.len(), 2);
    assert!(cache.memory_usage() <= cache.memory_limit());
}

#[test]
fn test_invalid_slot() {
    let cache = ValueCache::new(1000);

    let result = cache.get_value(&Blocks::new(1), "other");
    assert!(matches!(result, Err(CacheError::InvalidSlot(_))));
}
