//! Error types for lrumap.
//!
//! - [`ConfigError`]: construction was rejected (e.g. zero capacity). No map
//!   is produced.
//! - [`InvariantError`]: a `check_invariants` walk found the ring, the key
//!   index and the size counters disagreeing. Always a bug in this crate.
//!
//! Loader failures in [`LruMap::get_or_compute`](crate::lru::LruMap::get_or_compute)
//! are not wrapped: the caller's own error type is handed back unchanged.
//!
//! ```
//! use lrumap::error::ConfigError;
//! use lrumap::lru::LruMap;
//!
//! let ok: Result<LruMap<String, i32>, ConfigError> = LruMap::try_new(100);
//! assert!(ok.is_ok());
//!
//! let err = LruMap::<String, i32>::try_new(0).unwrap_err();
//! assert!(err.to_string().contains("capacity"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Internal consistency check failed.
///
/// Produced by [`LruMap::check_invariants`](crate::lru::LruMap::check_invariants)
/// and the equivalent methods on the ring and the pool. Carries a description
/// of the first violation found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Construction arguments were rejected.
///
/// Returned by [`LruMap::try_new`](crate::lru::LruMap::try_new) and
/// [`LruMapBuilder::try_build`](crate::builder::LruMapBuilder::try_build).
///
/// # Example
///
/// ```
/// use lrumap::builder::LruMapBuilder;
///
/// let err = LruMapBuilder::<u64, u64>::new(0).try_build().unwrap_err();
/// assert_eq!(err.message(), "cache capacity must be greater than zero");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The error every constructor reports for `capacity == 0`.
    #[inline]
    pub fn zero_capacity() -> Self {
        Self::new("cache capacity must be greater than zero")
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}
