use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder};

#[derive(Debug, Default)]
pub struct LruMapMetrics {
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
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
    pub recency_rank_calls: MetricsCell,
    pub recency_rank_found: MetricsCell,
    pub recency_rank_scan_steps: MetricsCell,
}

impl CoreMetricsRecorder for LruMapMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_set_call(&mut self) {
        self.set_calls += 1;
    }

    fn record_set_new(&mut self) {
        self.set_new += 1;
    }

    fn record_set_update(&mut self) {
        self.set_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LruMetricsRecorder for LruMapMetrics {
    fn record_delete_found(&mut self) {
        self.delete_found += 1;
    }

    fn record_delete_missing(&mut self) {
        self.delete_missing += 1;
    }

    fn record_load_call(&mut self) {
        self.load_calls += 1;
    }

    fn record_load_failure(&mut self) {
        self.load_failures += 1;
    }

    fn record_removal_notified(&mut self) {
        self.removals_notified += 1;
    }

    fn record_touch_call(&mut self) {
        self.touch_calls += 1;
    }

    fn record_touch_found(&mut self) {
        self.touch_found += 1;
    }

    fn record_pop_lru_call(&mut self) {
        self.pop_lru_calls += 1;
    }

    fn record_pop_lru_found(&mut self) {
        self.pop_lru_found += 1;
    }
}

impl LruMetricsReadRecorder for &LruMapMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }

    fn record_recency_rank_call(&self) {
        self.recency_rank_calls.incr();
    }

    fn record_recency_rank_found(&self) {
        self.recency_rank_found.incr();
    }

    fn record_recency_rank_scan_step(&self) {
        self.recency_rank_scan_steps.incr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_hit_and_miss_both_count_calls() {
        let mut m = LruMapMetrics::default();
        m.record_get_hit();
        m.record_get_miss();
        m.record_get_miss();
        assert_eq!(m.get_calls, 3);
        assert_eq!(m.get_hits, 1);
        assert_eq!(m.get_misses, 2);
    }

    #[test]
    fn read_recorder_works_through_shared_ref() {
        let m = LruMapMetrics::default();
        (&m).record_peek_call();
        (&m).record_peek_found();
        (&m).record_recency_rank_scan_step();
        assert_eq!(m.peek_calls.get(), 1);
        assert_eq!(m.peek_found.get(), 1);
        assert_eq!(m.recency_rank_scan_steps.get(), 1);
    }
}
