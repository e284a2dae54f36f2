//! Fingerprint Module
//!
//! Builds cache keys from a slot name and a snapshot of its upstream state.

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};

// == Upstream State ==
/// Snapshot of everything a slot transitively depends on.
///
/// Entries are kept ordered by name, so the order in which an evaluator
/// inserts them never changes the resulting fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamState {
    entries: BTreeMap<String, Vec<u8>>,
}

impl UpstreamState {
    // == Constructor ==
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Records the state of one dependency, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl AsRef<[u8]>) {
        self.entries.insert(name.into(), bytes.as_ref().to_vec());
    }

    /// Builder form of [`UpstreamState::insert`].
    pub fn with(mut self, name: impl Into<String>, bytes: impl AsRef<[u8]>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Fingerprint ==
/// SHA-256 digest identifying a (slot, upstream state) pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 6 bytes are plenty to tell entries apart in logs
        write!(f, "Fingerprint({})", hex::encode(&self.0[..6]))
    }
}

// == Fingerprint Construction ==
/// Computes the cache key for `slot` given its upstream state.
///
/// Every field is length-prefixed so that adjacent fields can never be
/// re-split into a different (name, bytes) sequence with the same digest.
pub fn fingerprint(slot: &str, upstream: &UpstreamState) -> Fingerprint {
    let mut hasher = Sha256::new();
    update_field(&mut hasher, slot.as_bytes());
    hasher.update((upstream.entries.len() as u64).to_le_bytes());

    for (name, bytes) in &upstream.entries {
        update_field(&mut hasher, name.as_bytes());
        update_field(&mut hasher, bytes);
    }

    Fingerprint(hasher.finalize().into())
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
