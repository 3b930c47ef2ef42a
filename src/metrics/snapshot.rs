/// Point-in-time copy of a table's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableMetricsSnapshot {
    pub increment_calls: u64,
    pub increment_existing: u64,
    pub increment_new: u64,

    pub decrement_calls: u64,
    pub decrement_absent: u64,
    pub decrement_releases: u64,

    pub lookup_calls: u64,
    pub lookup_hits: u64,
    pub lookup_misses: u64,

    // chain nodes visited by mutating scans / by lookups
    pub chain_steps: u64,
    pub lookup_chain_steps: u64,

    pub growth_events: u64,
    pub growth_failures: u64,
    pub grown_slots: u64,
    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub distinct_count: usize,
    pub total_count: u64,
    pub bucket_count: usize,
    pub capacity: usize,
    pub free_slots: usize,
    pub max_bucket_len: usize,
}

impl TableMetricsSnapshot {
    /// Average chain nodes visited per lookup, `0.0` before any lookup.
    pub fn avg_lookup_chain_steps(&self) -> f64 {
        if self.lookup_calls == 0 {
            0.0
        } else {
            self.lookup_chain_steps as f64 / self.lookup_calls as f64
        }
    }

    /// Fraction of pooled slots currently occupied.
    pub fn load_factor(&self) -> f64 {
        let pooled = self.capacity.saturating_sub(self.bucket_count);
        if pooled == 0 {
            0.0
        } else {
            self.distinct_count as f64 / pooled as f64
        }
    }
}
