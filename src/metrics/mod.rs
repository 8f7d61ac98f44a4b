//! Operation counters for [`LruMap`](crate::lru::LruMap), compiled in only
//! with the `metrics` feature.
//!
//! Recording lives in [`metrics_impl`], point-in-time copies in [`snapshot`],
//! publishing in [`exporter`]. The recorder traits keep the three apart.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::LruMapMetrics;
pub use snapshot::LruMapMetricsSnapshot;
pub use traits::{MetricsExporter, MetricsSnapshotProvider};
