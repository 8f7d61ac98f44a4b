//! Key → node lookup.
//!
//! A thin wrapper over `HashMap<K, NodeId, S>` (FxHash by default). Order is
//! not tracked here; it lives only in the recency ring. A key is present in
//! the index iff its node is linked into the ring, and the façade is the only
//! writer, so `insert` treats an existing key as a caller bug.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

use crate::ds::node_pool::NodeId;

#[derive(Debug, Clone)]
pub struct KeyIndex<K, S = FxBuildHasher> {
    map: HashMap<K, NodeId, S>,
}

impl<K> KeyIndex<K, FxBuildHasher>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(0, FxBuildHasher)
    }
}

impl<K, S> KeyIndex<K, S> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl<K, S> KeyIndex<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    #[inline]
    pub fn lookup<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Maps `key` to `id`. The key must not already be present.
    #[inline]
    pub fn insert(&mut self, key: K, id: NodeId) {
        let previous = self.map.insert(key, id);
        debug_assert!(
            previous.is_none(),
            "key re-inserted into index; refresh must relocate instead"
        );
    }

    /// Removes `key`; absent keys are a no-op.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn hasher(&self) -> &S {
        self.map.hasher()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, NodeId)> {
        self.map.iter().map(|(key, &id)| (key, id))
    }
}

impl<K> Default for KeyIndex<K, FxBuildHasher>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
