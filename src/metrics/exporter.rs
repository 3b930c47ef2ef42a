use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::snapshot::TableMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for table metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// directly or forwarded to an OpenTelemetry collector.
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

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", &self.metric_name(suffix), value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<TableMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TableMetricsSnapshot) {
        self.write_counter("increment_calls_total", snapshot.increment_calls);
        self.write_counter("increment_existing_total", snapshot.increment_existing);
        self.write_counter("increment_new_total", snapshot.increment_new);
        self.write_counter("decrement_calls_total", snapshot.decrement_calls);
        self.write_counter("decrement_absent_total", snapshot.decrement_absent);
        self.write_counter("decrement_releases_total", snapshot.decrement_releases);
        self.write_counter("lookup_calls_total", snapshot.lookup_calls);
        self.write_counter("lookup_hits_total", snapshot.lookup_hits);
        self.write_counter("lookup_misses_total", snapshot.lookup_misses);
        self.write_counter("chain_steps_total", snapshot.chain_steps);
        self.write_counter("lookup_chain_steps_total", snapshot.lookup_chain_steps);
        self.write_counter("growth_events_total", snapshot.growth_events);
        self.write_counter("growth_failures_total", snapshot.growth_failures);
        self.write_counter("grown_slots_total", snapshot.grown_slots);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_gauge("distinct_count", snapshot.distinct_count as u64);
        self.write_gauge("total_count", snapshot.total_count);
        self.write_gauge("bucket_count", snapshot.bucket_count as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
        self.write_gauge("free_slots", snapshot.free_slots as u64);
        self.write_gauge("max_bucket_len", snapshot.max_bucket_len as u64);
    }
}
