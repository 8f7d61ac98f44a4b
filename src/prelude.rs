pub use crate::builder::LruMapBuilder;
pub use crate::ds::{KeyIndex, NodeId, NodePool, RecencyList};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "concurrency")]
pub use crate::lru::ConcurrentLruMap;
pub use crate::lru::{LruMap, RemovalCause, RemovalHook};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMapMetricsSnapshot;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
pub use crate::traits::ConcurrentCache;
