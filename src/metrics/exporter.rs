use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::LruMapMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for [`LruMapMetricsSnapshot`].
///
/// Writes the text exposition format so the output can be scraped by
/// Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn gauge(&self, suffix: &str, value: usize) {
        self.write_metric("gauge", suffix, value as u64);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<LruMapMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, s: &LruMapMetricsSnapshot) {
        self.counter("get_calls_total", s.get_calls);
        self.counter("get_hits_total", s.get_hits);
        self.counter("get_misses_total", s.get_misses);
        self.counter("set_calls_total", s.set_calls);
        self.counter("set_new_total", s.set_new);
        self.counter("set_updates_total", s.set_updates);
        self.counter("evicted_entries_total", s.evicted_entries);
        self.counter("clear_calls_total", s.clear_calls);
        self.counter("delete_found_total", s.delete_found);
        self.counter("delete_missing_total", s.delete_missing);
        self.counter("load_calls_total", s.load_calls);
        self.counter("load_failures_total", s.load_failures);
        self.counter("removals_notified_total", s.removals_notified);
        self.counter("touch_calls_total", s.touch_calls);
        self.counter("touch_found_total", s.touch_found);
        self.counter("pop_lru_calls_total", s.pop_lru_calls);
        self.counter("pop_lru_found_total", s.pop_lru_found);
        self.counter("peek_calls_total", s.peek_calls);
        self.counter("peek_found_total", s.peek_found);
        self.counter("recency_rank_calls_total", s.recency_rank_calls);
        self.counter("recency_rank_found_total", s.recency_rank_found);
        self.counter("recency_rank_scan_steps_total", s.recency_rank_scan_steps);
        self.gauge("cache_len", s.cache_len);
        self.gauge("capacity", s.capacity);
        self.gauge("free_nodes", s.free_nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_prefixed_text_format() {
        let exporter = PrometheusTextExporter::new("lrumap", Vec::new());
        let snapshot = LruMapMetricsSnapshot {
            get_calls: 5,
            evicted_entries: 2,
            cache_len: 3,
            capacity: 8,
            ..Default::default()
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE lrumap_get_calls_total counter\nlrumap_get_calls_total 5\n"));
        assert!(text.contains("lrumap_evicted_entries_total 2\n"));
        assert!(text.contains("# TYPE lrumap_capacity gauge\nlrumap_capacity 8\n"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&LruMapMetricsSnapshot::default());
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.starts_with("# TYPE get_calls_total counter\n"));
    }
}
