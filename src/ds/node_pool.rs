//! Node storage with a free-index stack.
//!
//! Every node of the recency ring lives in one `Vec`, addressed by a stable
//! [`NodeId`]. Index 0 is the ring's sentinel: it is created with the pool,
//! never carries a payload and is never handed out or released.
//!
//! ```text
//!   nodes: Vec<Node<T>>
//!   ┌───────┬──────────────────────────────────────────────┐
//!   │ index │ Node { value, prev, next, stamp }            │
//!   ├───────┼──────────────────────────────────────────────┤
//!   │   0   │ sentinel (value: None)                       │
//!   │   1   │ { value: Some(A), prev: 2, next: 0, .. }     │
//!   │   2   │ { value: Some(B), prev: 0, next: 1, .. }     │
//!   │   3   │ { value: None, prev: 3, next: 3 }  ◄─ free   │
//!   └───────┴──────────────────────────────────────────────┘
//!   free_list: [3]
//! ```
//!
//! `release` takes the payload out of the node before pushing its index on
//! the free list, so a recycled slot never keeps a stale key or value alive.

use std::mem;

use crate::error::InvariantError;

/// Stable handle to a node in a [`NodePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The ring sentinel. Never refers to caller data.
    pub(crate) const SENTINEL: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node<T> {
    value: Option<T>,
    prev: NodeId,
    next: NodeId,
    stamp: u64,
}

impl<T> Node<T> {
    fn vacant(id: NodeId) -> Self {
        Self {
            value: None,
            prev: id,
            next: id,
            stamp: 0,
        }
    }
}

#[derive(Debug)]
pub struct NodePool<T> {
    nodes: Vec<Node<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> NodePool<T> {
    /// Creates a pool holding only the sentinel.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a pool with room for `capacity` nodes besides the sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::vacant(NodeId::SENTINEL));
        Self {
            nodes,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Hands out a node holding `value`, recycling a released one when possible.
    ///
    /// The node comes back self-linked; linking it into a ring is the caller's job.
    pub fn acquire(&mut self, value: T, stamp: u64) -> NodeId {
        let id = match self.free_list.pop() {
            Some(idx) => {
                let node = &mut self.nodes[idx];
                node.value = Some(value);
                node.stamp = stamp;
                NodeId(idx)
            },
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(Node {
                    value: Some(value),
                    prev: id,
                    next: id,
                    stamp,
                });
                id
            },
        };
        self.len += 1;
        id
    }

    /// Scrubs the node and returns it to the free list, handing back its payload.
    ///
    /// The node must already be unlinked. Returns `None` for the sentinel, for
    /// a free node, or for an id this pool never issued.
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        if id == NodeId::SENTINEL {
            return None;
        }
        let node = self.nodes.get_mut(id.0)?;
        let value = node.value.take()?;
        debug_assert!(
            node.prev == id && node.next == id,
            "released node {id:?} is still linked"
        );
        node.prev = id;
        node.next = id;
        node.stamp = 0;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).and_then(|node| node.value.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0).and_then(|node| node.value.as_mut())
    }

    /// Returns `true` if `id` currently holds a payload.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn stamp(&self, id: NodeId) -> Option<u64> {
        self.nodes
            .get(id.0)
            .filter(|node| node.value.is_some())
            .map(|node| node.stamp)
    }

    /// Sets the stamp of a live node; returns `false` otherwise.
    pub fn set_stamp(&mut self, id: NodeId, stamp: u64) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) if node.value.is_some() => {
                node.stamp = stamp;
                true
            },
            _ => false,
        }
    }

    /// Number of nodes currently holding a payload.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of released nodes waiting to be recycled.
    pub fn free_len(&self) -> usize {
        self.free_list.len()
    }

    /// Number of nodes ever allocated, live or free, not counting the sentinel.
    pub fn slot_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Drops every payload and forgets all nodes except the sentinel.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = Node::vacant(NodeId::SENTINEL);
        self.free_list.clear();
        self.len = 0;
    }

    pub fn approx_bytes(&self) -> usize {
        mem::size_of::<Self>()
            + self.nodes.capacity() * mem::size_of::<Node<T>>()
            + self.free_list.capacity() * mem::size_of::<usize>()
    }

    pub(crate) fn prev(&self, id: NodeId) -> NodeId {
        self.nodes[id.0].prev
    }

    pub(crate) fn next(&self, id: NodeId) -> NodeId {
        self.nodes[id.0].next
    }

    pub(crate) fn set_prev(&mut self, id: NodeId, prev: NodeId) {
        self.nodes[id.0].prev = prev;
    }

    pub(crate) fn set_next(&mut self, id: NodeId, next: NodeId) {
        self.nodes[id.0].next = next;
    }

    /// Checks that live and free slots partition the backing array.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.nodes[0].value.is_some() {
            return Err(InvariantError::new("sentinel holds a payload"));
        }
        let live = self.nodes.iter().filter(|n| n.value.is_some()).count();
        if live != self.len {
            return Err(InvariantError::new(format!(
                "pool len {} != live nodes {}",
                self.len, live
            )));
        }
        if live + self.free_list.len() != self.slot_count() {
            return Err(InvariantError::new(format!(
                "live {} + free {} != slots {}",
                live,
                self.free_list.len(),
                self.slot_count()
            )));
        }
        for &idx in &self.free_list {
            let node = self.nodes.get(idx).ok_or_else(|| {
                InvariantError::new(format!("free list holds unknown index {idx}"))
            })?;
            if idx == 0 || node.value.is_some() {
                return Err(InvariantError::new(format!(
                    "free list holds occupied index {idx}"
                )));
            }
        }
        Ok(())
    }
}

impl<T> Default for NodePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_release_recycles_index() {
        let mut pool = NodePool::new();
        let a = pool.acquire("a", 1);
        let b = pool.acquire("b", 2);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(a), Some(&"a"));
        assert_eq!(pool.stamp(b), Some(2));

        assert_eq!(pool.release(a), Some("a"));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.free_len(), 1);
        assert!(!pool.contains(a));

        let c = pool.acquire("c", 3);
        assert_eq!(c.index(), a.index());
        assert_eq!(pool.get(c), Some(&"c"));
        assert_eq!(pool.free_len(), 0);
        assert_eq!(pool.slot_count(), 2);
        pool.check_invariants().unwrap();
    }

    #[test]
    fn first_node_is_never_the_sentinel() {
        let mut pool = NodePool::new();
        let id = pool.acquire(7u32, 0);
        assert_ne!(id, NodeId::SENTINEL);
        assert!(!pool.contains(NodeId::SENTINEL));
    }

    #[test]
    fn release_sentinel_free_or_foreign_is_noop() {
        let mut pool = NodePool::new();
        let id = pool.acquire(1u8, 0);
        assert_eq!(pool.release(NodeId::SENTINEL), None);
        assert_eq!(pool.release(NodeId(42)), None);
        assert_eq!(pool.release(id), Some(1));
        assert_eq!(pool.release(id), None);
        assert_eq!(pool.free_len(), 1);
        pool.check_invariants().unwrap();
    }

    #[test]
    fn release_hands_payload_back_to_caller() {
        use std::rc::Rc;

        let payload = Rc::new(5);
        let mut pool = NodePool::new();
        let id = pool.acquire(Rc::clone(&payload), 0);
        assert_eq!(Rc::strong_count(&payload), 2);

        let returned = pool.release(id);
        assert_eq!(Rc::strong_count(&payload), 2);
        drop(returned);
        assert_eq!(Rc::strong_count(&payload), 1);
    }

    #[test]
    fn released_node_has_zero_stamp_and_self_links() {
        let mut pool = NodePool::new();
        let id = pool.acquire('x', 9);
        pool.release(id);
        assert_eq!(pool.stamp(id), None);
        assert!(!pool.set_stamp(id, 4));
        assert_eq!(pool.prev(id), id);
        assert_eq!(pool.next(id), id);
    }

    #[test]
    fn clear_resets_to_sentinel_only() {
        let mut pool = NodePool::with_capacity(4);
        for i in 0..4 {
            pool.acquire(i, i as u64);
        }
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.slot_count(), 0);
        assert_eq!(pool.free_len(), 0);
        assert_eq!(pool.prev(NodeId::SENTINEL), NodeId::SENTINEL);
        pool.check_invariants().unwrap();
    }
}
