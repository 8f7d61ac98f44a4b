#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMapMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub set_calls: u64,
    pub set_new: u64,
    pub set_updates: u64,

    pub evicted_entries: u64,
    pub clear_calls: u64,
    pub delete_found: u64,
    pub delete_missing: u64,

    pub load_calls: u64,
    pub load_failures: u64,
    pub removals_notified: u64,

    pub touch_calls: u64,
    pub touch_found: u64,
    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub peek_calls: u64,
    pub peek_found: u64,
    pub recency_rank_calls: u64,
    pub recency_rank_found: u64,
    pub recency_rank_scan_steps: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
    pub free_nodes: usize,
}

impl LruMapMetricsSnapshot {
    /// Fraction of `get`-style lookups that hit; `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}
