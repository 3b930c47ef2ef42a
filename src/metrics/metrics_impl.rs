use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{TableMetricsReadRecorder, TableMetricsRecorder};

#[derive(Debug, Default)]
pub struct TableMetrics {
    pub increment_calls: u64,
    pub increment_existing: u64,
    pub increment_new: u64,
    pub decrement_calls: u64,
    pub decrement_absent: u64,
    pub decrement_releases: u64,
    pub chain_steps: u64,
    pub growth_events: u64,
    pub growth_failures: u64,
    pub grown_slots: u64,
    pub clear_calls: u64,
    pub lookup_calls: MetricsCell,
    pub lookup_hits: MetricsCell,
    pub lookup_misses: MetricsCell,
    pub lookup_chain_steps: MetricsCell,
}

impl TableMetrics {
    pub fn reset(&mut self) {
        self.increment_calls = 0;
        self.increment_existing = 0;
        self.increment_new = 0;
        self.decrement_calls = 0;
        self.decrement_absent = 0;
        self.decrement_releases = 0;
        self.chain_steps = 0;
        self.growth_events = 0;
        self.growth_failures = 0;
        self.grown_slots = 0;
        self.clear_calls = 0;
        self.lookup_calls.reset();
        self.lookup_hits.reset();
        self.lookup_misses.reset();
        self.lookup_chain_steps.reset();
    }
}

impl TableMetricsRecorder for TableMetrics {
    fn record_increment_call(&mut self) {
        self.increment_calls += 1;
    }

    fn record_increment_existing(&mut self) {
        self.increment_existing += 1;
    }

    fn record_increment_new(&mut self) {
        self.increment_new += 1;
    }

    fn record_decrement_call(&mut self) {
        self.decrement_calls += 1;
    }

    fn record_decrement_absent(&mut self) {
        self.decrement_absent += 1;
    }

    fn record_decrement_release(&mut self) {
        self.decrement_releases += 1;
    }

    fn record_chain_step(&mut self) {
        self.chain_steps += 1;
    }

    fn record_growth(&mut self, added_slots: usize) {
        self.growth_events += 1;
        self.grown_slots += added_slots as u64;
    }

    fn record_growth_failure(&mut self) {
        self.growth_failures += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl TableMetricsReadRecorder for &TableMetrics {
    fn record_lookup_call(&self) {
        self.lookup_calls.incr();
    }

    fn record_lookup_hit(&self) {
        self.lookup_hits.incr();
    }

    fn record_lookup_miss(&self) {
        self.lookup_misses.incr();
    }

    fn record_lookup_chain_step(&self) {
        self.lookup_chain_steps.incr();
    }
}
