//! # Cache traits
//!
//! Generic code can drive [`LruMap`](crate::lru::LruMap) through these traits
//! instead of the inherent API. The split mirrors what each caller needs:
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │  insert, get, contains, len, capacity,  │
//!   │  is_empty, clear                        │
//!   └────────────────────┬────────────────────┘
//!                        ▼
//!   ┌─────────────────────────────────────────┐
//!   │           MutableCache<K, V>            │
//!   │  remove, remove_batch                   │
//!   └────────────────────┬────────────────────┘
//!                        ▼
//!   ┌─────────────────────────────────────────┐
//!   │           LruCacheTrait<K, V>           │
//!   │  pop_lru, peek_lru, touch, recency_rank │
//!   └─────────────────────────────────────────┘
//!
//!   ConcurrentCache: Send + Sync marker for lock-wrapped caches
//! ```
//!
//! ```
//! use lrumap::lru::LruMap;
//! use lrumap::traits::{CoreCache, MutableCache};
//!
//! fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, &str)]) {
//!     for (key, value) in data {
//!         cache.insert(*key, value.to_string());
//!     }
//! }
//!
//! fn invalidate<C: MutableCache<u64, String>>(cache: &mut C, keys: &[u64]) {
//!     for key in keys {
//!         cache.remove(key);
//!     }
//! }
//!
//! let mut cache = LruMap::new(8);
//! warm(&mut cache, &[(1, "one"), (2, "two"), (3, "three")]);
//! invalidate(&mut cache, &[2]);
//! assert_eq!(cache.len(), 2);
//! ```

/// Operations every cache supports.
pub trait CoreCache<K, V> {
    /// Inserts or replaces `key`, returning the previous value.
    ///
    /// A new key may evict one entry first when the cache is full.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, updating its recency.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks membership without touching recency.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

/// Caches that allow removal by key.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in order; the result lines up with `keys`.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// Recency-ordered caches.
///
/// ```
/// use lrumap::lru::LruMap;
/// use lrumap::traits::{CoreCache, LruCacheTrait};
///
/// let mut cache = LruMap::new(3);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.insert(3, "c");
///
/// assert!(cache.touch(&1));
/// assert_eq!(cache.recency_rank(&1), Some(0));
/// assert_eq!(cache.peek_lru(), Some((&2, &"b")));
/// assert_eq!(cache.pop_lru(), Some((2, "b")));
/// ```
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without touching it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used; `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position in recency order, `0` being the most recent. O(n).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Marker for caches safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}
