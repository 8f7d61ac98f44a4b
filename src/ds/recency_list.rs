//! Recency ring backed by a [`NodePool`].
//!
//! Nodes are linked by [`NodeId`] into a circular list that passes through a
//! single sentinel (pool index 0). The sentinel marks both ends, so linking
//! and unlinking never special-case an empty list or a boundary node.
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!      [sentinel] ◄──► [A] ◄──► [B] ◄──► [C] ◄──────────────┘
//!                      front                back
//!                      (MRU)                (LRU)
//!
//!   empty ring:  [sentinel].next == [sentinel].prev == sentinel
//! ```
//!
//! ## Operations
//! - `push_front(value, stamp)`: acquire from the pool + link after sentinel
//! - `move_to_front(id)`: unlink + relink after sentinel, O(1)
//! - `unlink(id)`: splice out, node stays allocated and self-linked
//! - `remove(id)`: unlink + release to the pool
//!
//! The sentinel is never returned: `front`/`back` yield `None` on an empty
//! ring.

use crate::ds::node_pool::{NodeId, NodePool};
use crate::error::InvariantError;

#[derive(Debug)]
pub struct RecencyList<T> {
    pool: NodePool<T>,
}

impl<T> RecencyList<T> {
    /// Creates an empty ring.
    pub fn new() -> Self {
        Self {
            pool: NodePool::new(),
        }
    }

    /// Creates an empty ring with node storage reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: NodePool::with_capacity(capacity),
        }
    }

    /// Live nodes, linked or not. Matches the ring length whenever no node
    /// is held unlinked between `unlink` and `remove`/`link_front`.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// `true` when no node is linked into the ring.
    pub fn is_empty(&self) -> bool {
        self.pool.next(NodeId::SENTINEL) == NodeId::SENTINEL
    }

    /// Returns `true` if `id` is a live node of this ring.
    pub fn contains(&self, id: NodeId) -> bool {
        self.pool.contains(id)
    }

    /// Read access to the backing pool (free list statistics, invariants).
    pub fn pool(&self) -> &NodePool<T> {
        &self.pool
    }

    /// Most recently used node.
    pub fn front(&self) -> Option<NodeId> {
        self.non_sentinel(self.pool.next(NodeId::SENTINEL))
    }

    /// Least recently used node.
    pub fn back(&self) -> Option<NodeId> {
        self.non_sentinel(self.pool.prev(NodeId::SENTINEL))
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.pool.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.pool.get_mut(id)
    }

    pub fn stamp(&self, id: NodeId) -> Option<u64> {
        self.pool.stamp(id)
    }

    pub fn set_stamp(&mut self, id: NodeId, stamp: u64) -> bool {
        self.pool.set_stamp(id, stamp)
    }

    /// Acquires a node for `value` and links it at the front.
    pub fn push_front(&mut self, value: T, stamp: u64) -> NodeId {
        let id = self.pool.acquire(value, stamp);
        self.attach_after(NodeId::SENTINEL, id);
        id
    }

    /// Links a live, currently unlinked node at the front.
    ///
    /// Returns `false` if `id` is not live or is already linked.
    pub fn link_front(&mut self, id: NodeId) -> bool {
        if !self.pool.contains(id) || self.is_linked(id) {
            return false;
        }
        self.attach_after(NodeId::SENTINEL, id);
        true
    }

    /// Splices `id` out of the ring. The node stays allocated.
    ///
    /// Returns `false` if `id` is not live or not linked.
    pub fn unlink(&mut self, id: NodeId) -> bool {
        if !self.pool.contains(id) || !self.is_linked(id) {
            return false;
        }
        self.detach(id);
        true
    }

    /// Moves a live node to the front; returns `false` if `id` is not live.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.pool.contains(id) {
            return false;
        }
        if self.pool.next(NodeId::SENTINEL) == id {
            return true;
        }
        if self.is_linked(id) {
            self.detach(id);
        }
        self.attach_after(NodeId::SENTINEL, id);
        true
    }

    /// Unlinks `id` (if linked) and returns its payload to the caller.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.pool.contains(id) {
            return None;
        }
        if self.is_linked(id) {
            self.detach(id);
        }
        self.pool.release(id)
    }

    /// Removes and returns the back (LRU) payload.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.back()?;
        self.remove(id)
    }

    /// Drops every node and resets to the empty ring.
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    /// Iterates payloads from front (MRU) to back (LRU).
    pub fn iter(&self) -> RecencyIter<'_, T> {
        RecencyIter {
            list: self,
            current: self.pool.next(NodeId::SENTINEL),
        }
    }

    /// Iterates `(NodeId, &T)` from front to back.
    pub fn iter_entries(&self) -> RecencyEntryIter<'_, T> {
        RecencyEntryIter {
            list: self,
            current: self.pool.next(NodeId::SENTINEL),
        }
    }

    pub fn approx_bytes(&self) -> usize {
        self.pool.approx_bytes()
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns the ring order as NodeIds from front to back.
    pub fn debug_snapshot_ids(&self) -> Vec<NodeId> {
        self.iter_entries().map(|(id, _)| id).collect()
    }

    /// Walks the ring and checks link symmetry and the node count.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.pool.check_invariants()?;

        let mut count = 0usize;
        let mut current = NodeId::SENTINEL;
        loop {
            let next = self.pool.next(current);
            if self.pool.prev(next) != current {
                return Err(InvariantError::new(format!(
                    "broken link: {:?}.next = {:?} but {:?}.prev = {:?}",
                    current,
                    next,
                    next,
                    self.pool.prev(next)
                )));
            }
            if next == NodeId::SENTINEL {
                break;
            }
            if !self.pool.contains(next) {
                return Err(InvariantError::new(format!(
                    "ring links free node {next:?}"
                )));
            }
            count += 1;
            if count > self.pool.len() {
                return Err(InvariantError::new("cycle detected in recency ring"));
            }
            current = next;
        }

        if count != self.pool.len() {
            return Err(InvariantError::new(format!(
                "ring length {} != live nodes {}",
                count,
                self.pool.len()
            )));
        }
        Ok(())
    }

    fn non_sentinel(&self, id: NodeId) -> Option<NodeId> {
        (id != NodeId::SENTINEL).then_some(id)
    }

    // A live node outside the ring is self-linked.
    fn is_linked(&self, id: NodeId) -> bool {
        self.pool.next(id) != id
    }

    fn attach_after(&mut self, anchor: NodeId, id: NodeId) {
        let next = self.pool.next(anchor);
        self.pool.set_next(anchor, id);
        self.pool.set_prev(id, anchor);
        self.pool.set_next(id, next);
        self.pool.set_prev(next, id);
    }

    fn detach(&mut self, id: NodeId) {
        let prev = self.pool.prev(id);
        let next = self.pool.next(id);
        self.pool.set_next(prev, next);
        self.pool.set_prev(next, prev);
        // drop references to the old neighbours
        self.pool.set_prev(id, id);
        self.pool.set_next(id, id);
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over payloads from front to back.
pub struct RecencyIter<'a, T> {
    list: &'a RecencyList<T>,
    current: NodeId,
}

impl<'a, T> Iterator for RecencyIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NodeId::SENTINEL {
            return None;
        }
        let id = self.current;
        self.current = self.list.pool.next(id);
        self.list.pool.get(id)
    }
}

/// Iterator over `(NodeId, &T)` pairs from front to back.
pub struct RecencyEntryIter<'a, T> {
    list: &'a RecencyList<T>,
    current: NodeId,
}

impl<'a, T> Iterator for RecencyEntryIter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NodeId::SENTINEL {
            return None;
        }
        let id = self.current;
        self.current = self.list.pool.next(id);
        self.list.pool.get(id).map(|value| (id, value))
    }
}
