//! Recorder / snapshot / exporter split.
//!
//! ```text
//!   ┌──────────────────────────┐
//!   │   CoreMetricsRecorder    │  get hit/miss, set new/update, evictions
//!   └────────────┬─────────────┘
//!                ▼
//!   ┌──────────────────────────┐     ┌────────────────────────────┐
//!   │   LruMetricsRecorder     │     │  LruMetricsReadRecorder    │
//!   │ delete, load, hook, pop  │     │ peek, recency_rank (&self) │
//!   └──────────────────────────┘     └────────────────────────────┘
//!
//!   MetricsSnapshotProvider<S>  (tests, benches)
//!   MetricsExporter<S>          (monitoring)
//! ```

/// Counters every cache operation feeds.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_set_call(&mut self);
    fn record_set_new(&mut self);
    fn record_set_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LRU-map specific counters on `&mut self` paths.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_delete_found(&mut self);
    fn record_delete_missing(&mut self);
    fn record_load_call(&mut self);
    fn record_load_failure(&mut self);
    fn record_removal_notified(&mut self);
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
}

/// Counters bumped from `&self` methods through interior mutability.
pub trait LruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_recency_rank_call(&self);
    fn record_recency_rank_found(&self);
    fn record_recency_rank_scan_step(&self);
}

/// Point-in-time copy for tests and benchmarks.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publishes a snapshot to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
