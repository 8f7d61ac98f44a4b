//! Builder for [`LruMap`] when the defaults are not enough.
//!
//! Capacity is the only required setting. The removal hook and the hasher
//! are optional; validation happens once, in [`LruMapBuilder::try_build`].
//!
//! ## Example
//!
//! ```rust
//! use lrumap::builder::LruMapBuilder;
//! use lrumap::lru::RemovalCause;
//! use std::collections::hash_map::RandomState;
//!
//! let mut map = LruMapBuilder::new(100)
//!     .hasher(RandomState::new())
//!     .on_remove(|key: &u64, _value: &String, cause| {
//!         if cause == RemovalCause::Evicted {
//!             println!("dropped {key}");
//!         }
//!     })
//!     .build();
//!
//! map.set(1, "hello".to_string());
//! assert_eq!(map.get(&1), Some(&"hello".to_string()));
//! ```

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use rustc_hash::FxBuildHasher;

use crate::error::ConfigError;
#[cfg(feature = "concurrency")]
use crate::lru::ConcurrentLruMap;
use crate::lru::{LruMap, RemovalCause, RemovalHook};

/// Collects construction options for an [`LruMap`].
pub struct LruMapBuilder<K, V, S = FxBuildHasher> {
    capacity: usize,
    hasher: S,
    on_remove: Option<RemovalHook<K, V>>,
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V> LruMapBuilder<K, V, FxBuildHasher> {
    /// Starts a builder for a map holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            hasher: FxBuildHasher,
            on_remove: None,
            _marker: PhantomData,
        }
    }
}

impl<K, V, S> LruMapBuilder<K, V, S> {
    /// Installs the callback run for every entry that leaves the map.
    ///
    /// Replaces any hook set earlier.
    pub fn on_remove<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&K, &V, RemovalCause) + Send + 'static,
    {
        self.on_remove = Some(Box::new(hook));
        self
    }

    /// Swaps the key hasher. FxHash is fast but not DoS-resistant; use
    /// `RandomState` for keys chosen by untrusted input.
    pub fn hasher<S2>(self, hasher: S2) -> LruMapBuilder<K, V, S2> {
        LruMapBuilder {
            capacity: self.capacity,
            hasher,
            on_remove: self.on_remove,
            _marker: PhantomData,
        }
    }
}

impl<K, V, S> LruMapBuilder<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn try_build(self) -> Result<LruMap<K, V, S>, ConfigError> {
        LruMap::from_parts(self.capacity, self.hasher, self.on_remove)
    }

    /// # Panics
    ///
    /// Panics if the capacity is zero.
    pub fn build(self) -> LruMap<K, V, S> {
        match self.try_build() {
            Ok(map) => map,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the map behind a mutex for sharing across threads.
    #[cfg(feature = "concurrency")]
    pub fn try_build_concurrent(self) -> Result<ConcurrentLruMap<K, V, S>, ConfigError> {
        self.try_build().map(ConcurrentLruMap::from_map)
    }
}

impl<K, V, S> fmt::Debug for LruMapBuilder<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruMapBuilder")
            .field("capacity", &self.capacity)
            .field("has_removal_hook", &self.on_remove.is_some())
            .finish_non_exhaustive()
    }
}
