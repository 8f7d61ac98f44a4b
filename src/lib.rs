//! lrumap: a fixed-capacity LRU map over a recycled node pool.
//!
//! Recency order lives in a circular doubly-linked list with a sentinel
//! ([`ds::RecencyList`]), whose nodes come from an arena ([`ds::NodePool`])
//! that hands released nodes back out before growing. A hash index
//! ([`ds::KeyIndex`]) maps keys to nodes. [`lru::LruMap`] ties the three
//! together and reports every removal through an optional hook.
//!
//! ```
//! use lrumap::prelude::*;
//!
//! let mut map = LruMap::new(2);
//! map.set("a", 1);
//! map.set("b", 2);
//! map.get("a");
//! map.set("c", 3);
//!
//! assert!(!map.contains("b"));
//! assert_eq!(map.peek_lru(), Some((&"a", &1)));
//! ```
//!
//! Features: `concurrency` adds `lru::ConcurrentLruMap`, `metrics` adds
//! operation counters, `tracing` emits events on eviction and failed loads.

pub mod builder;
pub mod ds;
pub mod error;
pub mod lru;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
