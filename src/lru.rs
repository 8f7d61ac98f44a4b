//! # LRU map
//!
//! Fixed-capacity key/value map that evicts the least recently used entry on
//! overflow and reports every entry it drops through an optional hook.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                           LruMap<K, V, S>                            │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  KeyIndex<K, S>   (HashMap<K, NodeId>, FxHash by default)     │   │
//!   │   │     "a" ─► 2        "b" ─► 3        "c" ─► 1                  │   │
//!   │   └──────────────────────────────────┬───────────────────────────┘   │
//!   │                                      │                               │
//!   │   ┌──────────────────────────────────▼───────────────────────────┐   │
//!   │   │  RecencyList<Entry<K, V>>  (ring over NodePool)              │   │
//!   │   │                                                              │   │
//!   │   │   ┌─► [sentinel] ◄─► [2:a] ◄─► [1:c] ◄─► [3:b] ◄─┐          │   │
//!   │   │   └──────────────────────────────────────────────┘          │   │
//!   │   │                     front/MRU            back/LRU            │   │
//!   │   │                                                              │   │
//!   │   │   free_list: []   (released nodes are recycled first)        │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   on_remove: Option<Box<dyn FnMut(&K, &V, RemovalCause) + Send>>     │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   set(d, 4) with capacity 3, ring [a, c, b]
//!   ═══════════════════════════════════════════════════════════════════
//!     1. index miss for d
//!     2. len == capacity → victim = back = b
//!     3. unlink b, release its node, drop "b" from the index
//!     4. on_remove(&"b", &2, Evicted) on the pair taken out of the node
//!     5. drop the pair
//!     6. acquire (recycles b's node), link at front, index d
//!   After: [d, a, c]
//!
//!   get(c) with ring [d, a, c]
//!   ═══════════════════════════════════════════════════════════════════
//!     1. index hit → NodeId
//!     2. move_to_front, new stamp
//!   After: [c, d, a]
//! ```
//!
//! ## Methods
//!
//! | Method                   | Touches | Notes                                     |
//! |--------------------------|---------|-------------------------------------------|
//! | `get` / `get_mut`        | yes     | miss has no side effects                  |
//! | `set`                    | yes     | replace fires hook with `Replaced`        |
//! | `get_or_compute`         | yes     | loader only on miss; `Err` leaves no trace|
//! | `get_or_insert_with`     | yes     | infallible loader                         |
//! | `delete`                 | -       | hook with `Deleted`; absent is a no-op    |
//! | `touch`                  | yes     |                                           |
//! | `pop_lru`                | -       | hook with `Evicted`                       |
//! | `peek` / `contains`      | no      |                                           |
//! | `peek_lru` / `iter`      | no      | `iter` runs MRU → LRU                     |
//! | `recency_rank`           | no      | O(n)                                      |
//! | `clear`                  | -       | hook with `Deleted` for every entry       |
//!
//! All but `recency_rank`, `iter` and `clear` are O(1).
//!
//! ## Removal hook
//!
//! The hook runs synchronously inside the mutating call, after the entry has
//! left the index and the ring and before the node is handed out again, so it
//! always sees the final key and value. A panicking hook unwinds out of the
//! call with the entry already gone and the map consistent. It must not call back into the same map.
//! Through safe code it cannot: it only receives `&K`, `&V` and the cause.
//! Reaching the map through shared ownership (`Rc<RefCell<_>>`, or the
//! `ConcurrentLruMap` handle) panics or deadlocks respectively.
//!
//! Dropping the map does not run the hook.
//!
//! ## Thread Safety
//!
//! - `LruMap`: single-threaded; every touching method takes `&mut self`.
//! - `ConcurrentLruMap` (feature `concurrency`): one `parking_lot::Mutex`
//!   around the whole map. Every call, including the loader and the hook, runs
//!   under that lock.
//!
//! ## Example
//!
//! ```
//! use lrumap::lru::{LruMap, RemovalCause};
//! use std::sync::{Arc, Mutex};
//!
//! let removed = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&removed);
//!
//! let mut map = LruMap::builder(2)
//!     .on_remove(move |k: &&str, v: &i32, cause| sink.lock().unwrap().push((*k, *v, cause)))
//!     .build();
//!
//! map.set("a", 1);
//! map.set("b", 2);
//! map.get("a");
//! map.set("c", 3); // evicts "b"
//!
//! assert_eq!(*removed.lock().unwrap(), vec![("b", 2, RemovalCause::Evicted)]);
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["c", "a"]);
//! ```

use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use crate::builder::LruMapBuilder;
use crate::ds::{KeyIndex, NodeId, RecencyList};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMapMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMapMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
#[cfg(feature = "concurrency")]
use crate::traits::ConcurrentCache;
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Upper bound on storage reserved at construction; larger maps grow on demand.
const MAX_PREALLOC: usize = 4096;

/// Why an entry left the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalCause {
    /// Dropped to make room for a new key, or taken by `pop_lru`.
    Evicted,
    /// Removed by `delete` or `clear`.
    Deleted,
    /// Value overwritten by `set`; the hook receives the old value.
    Replaced,
}

impl RemovalCause {
    pub fn was_evicted(self) -> bool {
        matches!(self, RemovalCause::Evicted)
    }
}

/// Callback invoked once per removed entry.
pub type RemovalHook<K, V> = Box<dyn FnMut(&K, &V, RemovalCause) + Send>;

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity map with least-recently-used eviction.
///
/// Keys are stored twice (index and node), hence `K: Clone`. The hasher
/// defaults to FxHash; pass another through
/// [`LruMapBuilder::hasher`](crate::builder::LruMapBuilder::hasher).
pub struct LruMap<K, V, S = FxBuildHasher> {
    index: KeyIndex<K, S>,
    ring: RecencyList<Entry<K, V>>,
    capacity: usize,
    clock: u64,
    on_remove: Option<RemovalHook<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: LruMapMetrics,
}

impl<K, V> LruMap<K, V, FxBuildHasher>
where
    K: Eq + Hash + Clone,
{
    /// Creates a map holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(map) => map,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a map, rejecting a zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity == 0`.
    ///
    /// ```
    /// use lrumap::lru::LruMap;
    ///
    /// assert!(LruMap::<u32, u32>::try_new(0).is_err());
    /// assert_eq!(LruMap::<u32, u32>::try_new(8).unwrap().capacity(), 8);
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::from_parts(capacity, FxBuildHasher, None)
    }

    /// Starts a builder for setting the removal hook or a custom hasher.
    pub fn builder(capacity: usize) -> LruMapBuilder<K, V> {
        LruMapBuilder::new(capacity)
    }
}

impl<K, V, S> LruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub(crate) fn from_parts(
        capacity: usize,
        hasher: S,
        on_remove: Option<RemovalHook<K, V>>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(capacity, "rejected lru map configuration");
            return Err(ConfigError::zero_capacity());
        }
        let prealloc = capacity.min(MAX_PREALLOC);
        Ok(Self {
            index: KeyIndex::with_capacity_and_hasher(prealloc, hasher),
            ring: RecencyList::with_capacity(prealloc),
            capacity,
            clock: 0,
            on_remove,
            #[cfg(feature = "metrics")]
            metrics: LruMapMetrics::default(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss changes nothing.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.hit(key)?;
        Some(&self.entry(id).value)
    }

    /// Like [`get`](Self::get), returning a mutable reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.hit(key)?;
        Some(&mut self.entry_mut(id).value)
    }

    /// Inserts or replaces `key` and marks it most recently used.
    ///
    /// Replacing keeps the size unchanged, fires the hook with the old value
    /// and [`RemovalCause::Replaced`], and returns the old value. A new key
    /// evicts the least recently used entry first when the map is full.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_set_call();

        if let Some(id) = self.index.lookup(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_set_update();

            self.touch_node(id);
            let previous = mem::replace(&mut self.entry_mut(id).value, value);
            if Self::notify(&mut self.on_remove, &key, &previous, RemovalCause::Replaced) {
                #[cfg(feature = "metrics")]
                self.metrics.record_removal_notified();
            }
            return Some(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_set_new();

        self.insert_new(key, value);
        None
    }

    /// Returns the value for `key`, loading it on a miss.
    ///
    /// On a hit the entry is touched and `loader` is never called. On a miss
    /// `loader` runs once; `Ok` is inserted exactly as [`set`](Self::set)
    /// would, `Err` is handed back and the map is left exactly as it was.
    ///
    /// ```
    /// use lrumap::lru::LruMap;
    ///
    /// let mut map = LruMap::new(4);
    /// let v = map.get_or_compute("x", |_| Ok::<_, String>(99)).unwrap();
    /// assert_eq!(*v, 99);
    ///
    /// let v = map.get_or_compute("x", |_| -> Result<i32, String> { unreachable!() });
    /// assert_eq!(v, Ok(&99));
    ///
    /// let err = map.get_or_compute("y", |k| Err(format!("no value for {k}")));
    /// assert_eq!(err, Err("no value for y".to_string()));
    /// assert!(!map.contains("y"));
    /// ```
    pub fn get_or_compute<E, F>(&mut self, key: K, loader: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        let id = match self.hit(&key) {
            Some(id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_load_call();

                let value = match loader(&key) {
                    Ok(value) => value,
                    Err(e) => {
                        #[cfg(feature = "metrics")]
                        self.metrics.record_load_failure();
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            capacity = self.capacity,
                            len = self.index.len(),
                            "loader failed, map unchanged"
                        );
                        return Err(e);
                    },
                };
                self.insert_new(key, value)
            },
        };
        Ok(&self.entry(id).value)
    }

    /// Infallible form of [`get_or_compute`](Self::get_or_compute).
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        match self.get_or_compute(key, |k| Ok::<V, Infallible>(f(k))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Removes `key`, firing the hook with [`RemovalCause::Deleted`].
    ///
    /// An absent key is a no-op and does not fire the hook.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(id) = self.index.lookup(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_delete_missing();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_delete_found();

        self.retire(id, RemovalCause::Deleted)
            .map(|(_, value)| value)
    }

    /// Marks `key` most recently used; `false` if absent.
    pub fn touch<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        match self.index.lookup(key) {
            Some(id) => {
                self.touch_node(id);
                #[cfg(feature = "metrics")]
                self.metrics.record_touch_found();
                true
            },
            None => false,
        }
    }

    /// Returns the value without touching it.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let id = self.index.lookup(key)?;

        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_found();

        Some(&self.entry(id).value)
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    /// The entry that the next overflow would evict.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let entry = self.ring.get(self.ring.back()?)?;
        Some((&entry.key, &entry.value))
    }

    /// Removes the least recently used entry, firing the hook with
    /// [`RemovalCause::Evicted`].
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let id = self.ring.back()?;
        let popped = self.retire(id, RemovalCause::Evicted);

        #[cfg(feature = "metrics")]
        if popped.is_some() {
            self.metrics.record_pop_lru_found();
        }

        popped
    }

    /// Touch sequence number recorded when `key` was last used.
    ///
    /// Increases with every touch and wraps after `u64::MAX` of them;
    /// diagnostic only.
    pub fn touch_stamp<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ring.stamp(self.index.lookup(key)?)
    }

    /// Position of `key` in recency order, `0` being the most recent. O(n).
    pub fn recency_rank<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_recency_rank_call();

        let target = self.index.lookup(key)?;
        for (rank, (id, _)) in self.ring.iter_entries().enumerate() {
            #[cfg(feature = "metrics")]
            (&self.metrics).record_recency_rank_scan_step();

            if id == target {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_recency_rank_found();
                return Some(rank);
            }
        }
        None
    }

    /// Entries from most to least recently used, without touching them.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.ring.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.ring.iter().map(|entry| &entry.key)
    }

    /// Released nodes waiting to be reused.
    pub fn free_nodes(&self) -> usize {
        self.ring.pool().free_len()
    }

    /// Nodes allocated over the map's lifetime, live or free. Never exceeds
    /// `capacity`.
    pub fn allocated_nodes(&self) -> usize {
        self.ring.pool().slot_count()
    }

    /// Removes every entry, least recently used first, firing the hook with
    /// [`RemovalCause::Deleted`] for each. Nodes stay pooled for reuse.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        while let Some(id) = self.ring.back() {
            self.retire(id, RemovalCause::Deleted);
        }
        debug_assert!(self.index.is_empty());
    }

    /// Verifies that the index, the ring and the pool agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.ring.check_invariants()?;

        if self.index.len() != self.ring.len() {
            return Err(InvariantError::new(format!(
                "index length {} != ring length {}",
                self.index.len(),
                self.ring.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        if self.ring.pool().slot_count() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} nodes allocated for capacity {}",
                self.ring.pool().slot_count(),
                self.capacity
            )));
        }
        for (key, id) in self.index.iter() {
            let entry = self.ring.get(id).ok_or_else(|| {
                InvariantError::new(format!("index points at free node {id:?}"))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "node {id:?} holds a different key than its index entry"
                )));
            }
        }
        Ok(())
    }

    /// Index lookup plus touch on hit.
    fn hit<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(id) = self.index.lookup(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.touch_node(id);
        Some(id)
    }

    fn insert_new(&mut self, key: K, value: V) -> NodeId {
        if self.index.len() >= self.capacity {
            self.evict_lru();
        }
        let stamp = self.next_stamp();
        let id = self.ring.push_front(
            Entry {
                key: key.clone(),
                value,
            },
            stamp,
        );
        self.index.insert(key, id);
        debug_assert!(self.index.len() <= self.capacity);
        debug_assert_eq!(self.index.len(), self.ring.len());
        id
    }

    fn evict_lru(&mut self) {
        let Some(victim) = self.ring.back() else {
            invariant_violation(format_args!(
                "eviction requested on an empty ring (len {}, capacity {})",
                self.index.len(),
                self.capacity
            ));
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            capacity = self.capacity,
            len = self.index.len(),
            cause = "evicted",
            "evicting least recently used entry"
        );

        // the evicted pair drops here, after the hook has seen it
        if self.retire(victim, RemovalCause::Evicted).is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
    }

    /// Unlink, unindex, release, then notify with the owned pair.
    ///
    /// The node is back on the free list before the hook runs, so a
    /// panicking hook cannot strand it. Nothing acquires a node until the
    /// hook has returned, and the pair drops only afterwards.
    fn retire(&mut self, id: NodeId, cause: RemovalCause) -> Option<(K, V)> {
        let entry = self.ring.remove(id)?;
        self.index.remove(&entry.key);
        if Self::notify(&mut self.on_remove, &entry.key, &entry.value, cause) {
            #[cfg(feature = "metrics")]
            self.metrics.record_removal_notified();
        }
        Some((entry.key, entry.value))
    }

    fn notify(
        hook: &mut Option<RemovalHook<K, V>>,
        key: &K,
        value: &V,
        cause: RemovalCause,
    ) -> bool {
        match hook {
            Some(hook) => {
                hook(key, value, cause);
                true
            },
            None => false,
        }
    }

    fn touch_node(&mut self, id: NodeId) {
        let stamp = self.next_stamp();
        self.ring.move_to_front(id);
        self.ring.set_stamp(id, stamp);
    }

    fn next_stamp(&mut self) -> u64 {
        self.clock = self.clock.wrapping_add(1);
        self.clock
    }

    fn entry(&self, id: NodeId) -> &Entry<K, V> {
        match self.ring.get(id) {
            Some(entry) => entry,
            None => invariant_violation(format_args!("indexed node {id:?} is free")),
        }
    }

    fn entry_mut(&mut self, id: NodeId) -> &mut Entry<K, V> {
        match self.ring.get_mut(id) {
            Some(entry) => entry,
            None => invariant_violation(format_args!("indexed node {id:?} is free")),
        }
    }
}

#[cold]
#[inline(never)]
fn invariant_violation(args: fmt::Arguments<'_>) -> ! {
    panic!("lrumap invariant violated: {args}")
}

impl<K, V, S> CoreCache<K, V> for LruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.set(key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        LruMap::get(self, key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        LruMap::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        LruMap::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        LruMap::clear(self)
    }
}

impl<K, V, S> MutableCache<K, V> for LruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        self.delete(key)
    }
}

impl<K, V, S> LruCacheTrait<K, V> for LruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        LruMap::pop_lru(self)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        LruMap::peek_lru(self)
    }

    fn touch(&mut self, key: &K) -> bool {
        LruMap::touch(self, key)
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        LruMap::recency_rank(self, key)
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> LruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub fn metrics_snapshot(&self) -> LruMapMetricsSnapshot {
        let m = &self.metrics;
        LruMapMetricsSnapshot {
            get_calls: m.get_calls,
            get_hits: m.get_hits,
            get_misses: m.get_misses,
            set_calls: m.set_calls,
            set_new: m.set_new,
            set_updates: m.set_updates,
            evicted_entries: m.evicted_entries,
            clear_calls: m.clear_calls,
            delete_found: m.delete_found,
            delete_missing: m.delete_missing,
            load_calls: m.load_calls,
            load_failures: m.load_failures,
            removals_notified: m.removals_notified,
            touch_calls: m.touch_calls,
            touch_found: m.touch_found,
            pop_lru_calls: m.pop_lru_calls,
            pop_lru_found: m.pop_lru_found,
            peek_calls: m.peek_calls.get(),
            peek_found: m.peek_found.get(),
            recency_rank_calls: m.recency_rank_calls.get(),
            recency_rank_found: m.recency_rank_found.get(),
            recency_rank_scan_steps: m.recency_rank_scan_steps.get(),
            cache_len: self.index.len(),
            capacity: self.capacity,
            free_nodes: self.ring.pool().free_len(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> MetricsSnapshotProvider<LruMapMetricsSnapshot> for LruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn snapshot(&self) -> LruMapMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, S> fmt::Debug for LruMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruMap")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .field("has_removal_hook", &self.on_remove.is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V, S> Extend<(K, V)> for LruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

/// [`LruMap`] behind a single `parking_lot::Mutex`.
///
/// Every call holds the lock for its full duration, including the loader of
/// [`get_or_compute`](Self::get_or_compute) and the removal hook, which
/// therefore must not use this handle. Values are returned as clones.
#[cfg(feature = "concurrency")]
pub struct ConcurrentLruMap<K, V, S = FxBuildHasher> {
    inner: Arc<Mutex<LruMap<K, V, S>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V, S> Clone for ConcurrentLruMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> fmt::Debug for ConcurrentLruMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(map) => f
                .debug_struct("ConcurrentLruMap")
                .field("len", &map.ring.len())
                .field("capacity", &map.capacity)
                .finish_non_exhaustive(),
            None => f
                .debug_struct("ConcurrentLruMap")
                .field("locked", &true)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruMap<K, V, FxBuildHasher>
where
    K: Eq + Hash + Clone,
{
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        Self::from_map(LruMap::new(capacity))
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        LruMap::try_new(capacity).map(Self::from_map)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> ConcurrentLruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Wraps an existing map, keeping its hook and hasher.
    pub fn from_map(map: LruMap<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().set(key, value)
    }

    /// Loader runs under the lock; concurrent misses on the same key load once.
    pub fn get_or_compute<E, F>(&self, key: K, loader: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
        V: Clone,
    {
        self.inner.lock().get_or_compute(key, loader).cloned()
    }

    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(key)
    }

    pub fn touch<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().touch(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lru()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs `f` with exclusive access to the map.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruMap<K, V, S>) -> R) -> R {
        let mut map = self.inner.lock();
        f(&mut map)
    }

    /// Like [`with_lock`](Self::with_lock) but gives up instead of blocking.
    pub fn try_with_lock<R>(&self, f: impl FnOnce(&mut LruMap<K, V, S>) -> R) -> Option<R> {
        let mut map = self.inner.try_lock()?;
        Some(f(&mut map))
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

#[cfg(all(feature = "metrics", feature = "concurrency"))]
impl<K, V, S> ConcurrentLruMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub fn metrics_snapshot(&self) -> LruMapMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> ConcurrentCache for ConcurrentLruMap<K, V, S>
where
    K: Send,
    V: Send,
    S: Send,
{
}
