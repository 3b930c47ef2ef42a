//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are separate responsibilities, each
//! behind a small trait, so the table's hot paths only ever see a recorder.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────┐   ┌─────────────────────────────┐
//!   │    TableMetricsRecorder     │   │  TableMetricsReadRecorder   │
//!   │  increment/decrement/grow   │   │  lookups through &self      │
//!   └──────────────┬──────────────┘   └──────────────┬──────────────┘
//!                  │                                 │
//!                  └───────────────┬─────────────────┘
//!                                  ▼
//!                          ┌──────────────┐
//!                          │ TableMetrics │
//!                          └──────┬───────┘
//!                                 │ snapshot()
//!                                 ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (monitoring)                 │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters for mutating table operations.
pub trait TableMetricsRecorder {
    fn record_increment_call(&mut self);
    fn record_increment_existing(&mut self);
    fn record_increment_new(&mut self);
    fn record_decrement_call(&mut self);
    fn record_decrement_absent(&mut self);
    fn record_decrement_release(&mut self);
    fn record_chain_step(&mut self);
    fn record_growth(&mut self, added_slots: usize);
    fn record_growth_failure(&mut self);
    fn record_clear(&mut self);
}

/// Counters for `&self` lookups (uses interior mutability).
pub trait TableMetricsReadRecorder {
    fn record_lookup_call(&self);
    fn record_lookup_hit(&self);
    fn record_lookup_miss(&self);
    fn record_lookup_chain_step(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
