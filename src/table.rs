//! Fixed-bucket, separate-chaining word counter.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                             WordTable layout                             │
//! │                                                                          │
//! │   pool: EntryPool (one Vec<Entry>)                                       │
//! │                                                                          │
//! │   idx:   0     1     2    ...   n-1  │  n     n+1    n+2   ...  cap-1    │
//! │        ┌─────┬─────┬─────┬─────┬─────┼─────┬─────┬─────┬─────┬─────┐     │
//! │        │ S0  │ S1  │ S2  │ ... │Sn-1 │"the"│ free│"cat"│ ... │ free│     │
//! │        └──┬──┴─────┴──┬──┴─────┴─────┴─────┴─────┴──┬──┴─────┴─────┘     │
//! │           │           │                  ▲          │                    │
//! │           │           └──────────────────┼──────────┘ next               │
//! │           └─► (empty)                    │                               │
//! │                        S2 ─► "cat" ─► "the" ─► None                      │
//! │                                                                          │
//! │   bucket(key) = hash(key) % n          n = bucket_count (prime)          │
//! │   free: stack of EntryIds              cap = power of two ≥ 2n           │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sentinels `S0..Sn-1` are the first `bucket_count` pool slots; each holds
//! only the head link of its chain. New keys are pushed at the chain front,
//! so chains are ordered most-recently-inserted first.
//!
//! ## Operations
//!
//! | Operation    | Time        | Notes                                      |
//! |--------------|-------------|--------------------------------------------|
//! | `increment`  | O(1)*       | *expected; may trigger a doubling growth   |
//! | `decrement`  | O(1)*       | releases the slot when the count hits zero |
//! | `get_count`  | O(1)*       | never fails, absent keys count zero        |
//! | `iter`       | O(n + cap)  | bucket order, then chain order             |
//! | `clear`      | O(cap)      | keeps capacity                             |
//!
//! Expected chain length is `distinct_count / bucket_count`; pick a prime
//! bucket count near the expected vocabulary size.
//!
//! ## Growth
//!
//! When an insert needs a slot and the free list is empty the pool doubles.
//! Links are indices, so nothing needs rewriting when the buffer moves.
//! Memory is reserved before the pool is touched: on allocation failure the
//! insert returns [`TableError::OutOfMemory`] and the table is unchanged.
//! Capacity never shrinks.
//!
//! ## Example Usage
//!
//! ```
//! use wordtable::table::WordTable;
//!
//! let mut table = WordTable::new(7).unwrap();
//! for word in ["a", "b", "a"] {
//!     table.increment(word).unwrap();
//! }
//! assert_eq!(table.get_count("a"), 2);
//! assert_eq!(table.get_count("b"), 1);
//! assert_eq!(table.distinct_count(), 2);
//! assert_eq!(table.total_count(), 3);
//!
//! table.decrement("b").unwrap();
//! assert_eq!(table.get_count("b"), 0);
//! assert!(table.decrement("b").is_err());
//! ```
//!
//! ## Thread Safety
//!
//! Not synchronized. Iterators borrow the table, so it cannot be mutated
//! while one is alive.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::ds::hash::HashStrategy;
use crate::ds::key::FixedKey;
use crate::ds::pool::{EntryId, EntryPool};
use crate::ds::sizing::{initial_capacity, is_prime};
use crate::error::{InvariantError, TableError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::TableMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TableMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    MetricsReset, MetricsSnapshotProvider, TableMetricsReadRecorder, TableMetricsRecorder,
};

/// Bucket count used by the `wordcmp` tool.
pub const DEFAULT_BUCKET_COUNT: usize = 7019;

#[cfg(debug_assertions)]
const DEBUG_VALIDATE_MAX_CAPACITY: usize = 1024;

/// Word counter with a fixed, prime number of buckets.
pub struct WordTable {
    pool: EntryPool,
    bucket_count: usize,
    distinct_count: usize,
    total_count: u64,
    hasher: HashStrategy,
    #[cfg(feature = "metrics")]
    metrics: TableMetrics,
}

impl WordTable {
    /// Creates a table with `bucket_count` buckets and the default hash.
    ///
    /// # Errors
    ///
    /// - [`TableError::InvalidBucketCount`] if `bucket_count` is zero or not
    ///   prime (checked before anything is allocated)
    /// - [`TableError::OutOfMemory`] if the initial pool cannot be allocated
    ///
    /// # Example
    ///
    /// ```
    /// use wordtable::table::WordTable;
    ///
    /// assert!(WordTable::new(4).is_err());
    /// let table = WordTable::new(7).unwrap();
    /// assert_eq!(table.bucket_count(), 7);
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn new(bucket_count: usize) -> Result<Self, TableError> {
        Self::with_hasher(bucket_count, HashStrategy::default())
    }

    /// Creates a table that maps keys to buckets with `hasher`.
    pub fn with_hasher(bucket_count: usize, hasher: HashStrategy) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(bucket_count, 0, hasher)
    }

    /// Creates a table pre-sized for roughly `distinct_hint` distinct keys.
    pub fn with_capacity_and_hasher(
        bucket_count: usize,
        distinct_hint: usize,
        hasher: HashStrategy,
    ) -> Result<Self, TableError> {
        if !is_prime(bucket_count) {
            return Err(TableError::InvalidBucketCount(bucket_count));
        }
        let capacity =
            initial_capacity(bucket_count, distinct_hint).ok_or(TableError::OutOfMemory {
                requested: usize::MAX,
            })?;

        Ok(Self {
            pool: EntryPool::new(bucket_count, capacity)?,
            bucket_count,
            distinct_count: 0,
            total_count: 0,
            hasher,
            #[cfg(feature = "metrics")]
            metrics: TableMetrics::default(),
        })
    }

    /// Number of distinct keys with a non-zero count.
    #[inline]
    pub fn distinct_count(&self) -> usize {
        self.distinct_count
    }

    /// Sum of all counts.
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distinct_count == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Pool size including the bucket sentinels. Only ever grows.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Slots that can be claimed before the next growth.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.pool.free_len()
    }

    #[inline]
    pub fn hash_strategy(&self) -> HashStrategy {
        self.hasher
    }

    #[inline]
    pub(crate) fn pool(&self) -> &EntryPool {
        &self.pool
    }

    #[inline]
    fn bucket_of(&self, key: &FixedKey) -> usize {
        (self.hasher.hash_key(key) % self.bucket_count as u64) as usize
    }

    /// Adds one occurrence of `key` and returns its new count.
    ///
    /// A new key is pushed at the front of its bucket chain. If no free slot
    /// is left the pool doubles first.
    ///
    /// # Errors
    ///
    /// - [`TableError::KeyTooLong`] / [`TableError::InvalidKey`] for keys that
    ///   do not fit the fixed-width buffer
    /// - [`TableError::OutOfMemory`] if growth fails; the table is unchanged
    pub fn increment(&mut self, key: impl AsRef<[u8]>) -> Result<u64, TableError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_call();

        let key = FixedKey::new(key.as_ref())?;
        let bucket = self.bucket_of(&key);

        let mut current = self.pool.sentinel(bucket).next();
        while let Some(id) = current {
            #[cfg(feature = "metrics")]
            self.metrics.record_chain_step();

            let entry = self.pool.entry_mut(id);
            if entry.key == key {
                entry.count += 1;
                let count = entry.count;
                self.total_count += 1;

                #[cfg(feature = "metrics")]
                self.metrics.record_increment_existing();
                return Ok(count);
            }
            current = entry.next;
        }

        let id = self.acquire_slot()?;
        let sentinel = self.pool.sentinel_id(bucket);
        let head = self.pool.entry(sentinel).next();

        let entry = self.pool.entry_mut(id);
        entry.key = key;
        entry.count = 1;
        entry.next = head;
        self.pool.entry_mut(sentinel).next = Some(id);

        self.distinct_count += 1;
        self.total_count += 1;

        #[cfg(feature = "metrics")]
        self.metrics.record_increment_new();

        #[cfg(debug_assertions)]
        self.validate_invariants();

        Ok(1)
    }

    /// Removes one occurrence of `key` and returns the remaining count.
    ///
    /// When the count reaches zero the entry is unlinked and its slot goes
    /// back to the free list.
    ///
    /// # Errors
    ///
    /// - [`TableError::AbsentKey`] if `key` is not stored
    /// - [`TableError::KeyTooLong`] / [`TableError::InvalidKey`] for keys that
    ///   could never have been stored
    pub fn decrement(&mut self, key: impl AsRef<[u8]>) -> Result<u64, TableError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_decrement_call();

        let key = FixedKey::new(key.as_ref())?;
        let bucket = self.bucket_of(&key);

        let mut prev = self.pool.sentinel_id(bucket);
        let mut current = self.pool.entry(prev).next();
        while let Some(id) = current {
            #[cfg(feature = "metrics")]
            self.metrics.record_chain_step();

            if self.pool.entry(id).key == key {
                break;
            }
            prev = id;
            current = self.pool.entry(id).next();
        }

        let Some(id) = current else {
            #[cfg(feature = "metrics")]
            self.metrics.record_decrement_absent();
            return Err(TableError::AbsentKey);
        };

        let entry = self.pool.entry_mut(id);
        debug_assert!(entry.count > 0, "live entry {:?} with zero count", id);
        entry.count -= 1;
        let remaining = entry.count;
        let next = entry.next;
        self.total_count -= 1;

        if remaining == 0 {
            self.pool.entry_mut(prev).next = next;
            self.pool.release(id);
            self.distinct_count -= 1;

            #[cfg(feature = "metrics")]
            self.metrics.record_decrement_release();
        }

        #[cfg(debug_assertions)]
        self.validate_invariants();

        Ok(remaining)
    }

    /// Returns the count for `key`; zero if it is absent or not a valid key.
    pub fn get_count(&self, key: impl AsRef<[u8]>) -> u64 {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_lookup_call();

        let Ok(key) = FixedKey::new(key.as_ref()) else {
            #[cfg(feature = "metrics")]
            (&self.metrics).record_lookup_miss();
            return 0;
        };

        match self.find(&key) {
            Some(id) => {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_lookup_hit();
                self.pool.entry(id).count()
            },
            None => {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_lookup_miss();
                0
            },
        }
    }

    /// Returns `true` if `key` has a non-zero count.
    #[inline]
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.get_count(key) > 0
    }

    fn find(&self, key: &FixedKey) -> Option<EntryId> {
        let mut current = self.pool.sentinel(self.bucket_of(key)).next();
        while let Some(id) = current {
            #[cfg(feature = "metrics")]
            (&self.metrics).record_lookup_chain_step();

            let entry = self.pool.entry(id);
            if entry.key == *key {
                return Some(id);
            }
            current = entry.next();
        }
        None
    }

    /// Increments every key yielded by `keys`, stopping at the first error.
    pub fn increment_all<I>(&mut self, keys: I) -> Result<(), TableError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for key in keys {
            self.increment(key)?;
        }
        Ok(())
    }

    /// Removes every key. Capacity is kept.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.pool.reset();
        self.distinct_count = 0;
        self.total_count = 0;
    }

    /// Pops a free slot, doubling the pool first if none is left.
    fn acquire_slot(&mut self) -> Result<EntryId, TableError> {
        if let Some(id) = self.pool.acquire() {
            return Ok(id);
        }

        match self.pool.grow() {
            Ok(_added) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_growth(_added);
            },
            Err(err) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_growth_failure();
                return Err(err);
            },
        }

        self.pool.acquire().ok_or(TableError::OutOfMemory {
            requested: self.pool.capacity(),
        })
    }

    // -----------------------------------------------------------------------
    // Bucket diagnostics
    // -----------------------------------------------------------------------

    /// Chain length of `bucket`, or `None` if out of range.
    pub fn bucket_len(&self, bucket: usize) -> Option<usize> {
        if bucket >= self.bucket_count {
            return None;
        }
        let mut len = 0;
        let mut current = self.pool.sentinel(bucket).next();
        while let Some(id) = current {
            len += 1;
            current = self.pool.entry(id).next();
        }
        Some(len)
    }

    /// Chain length of every bucket, in bucket order.
    pub fn bucket_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.bucket_count];
        for (_, entry) in self.pool.pooled() {
            if !entry.is_free() {
                sizes[self.bucket_of(entry.key())] += 1;
            }
        }
        sizes
    }

    /// Longest chain in the table.
    pub fn max_bucket_len(&self) -> usize {
        self.bucket_sizes().into_iter().max().unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------------

    /// Walks every chain and the free list and verifies the table's
    /// bookkeeping.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.pool.reserved() != self.bucket_count {
            return Err(InvariantError::new(format!(
                "pool reserves {} sentinels for {} buckets",
                self.pool.reserved(),
                self.bucket_count
            )));
        }
        if self.pool.capacity() < self.bucket_count {
            return Err(InvariantError::new(format!(
                "capacity {} < bucket_count {}",
                self.pool.capacity(),
                self.bucket_count
            )));
        }

        let occupied = self.pool.occupied_len();
        let mut seen = FxHashSet::default();
        let mut total = 0u64;

        for bucket in 0..self.bucket_count {
            let sentinel = self.pool.sentinel(bucket);
            if sentinel.is_free() || sentinel.count() != 0 {
                return Err(InvariantError::new(format!(
                    "sentinel {} carries data or is marked free",
                    bucket
                )));
            }

            let mut current = sentinel.next();
            while let Some(id) = current {
                if id.index() < self.bucket_count {
                    return Err(InvariantError::new(format!(
                        "bucket {} links to sentinel {}",
                        bucket,
                        id.index()
                    )));
                }
                if !seen.insert(id) {
                    return Err(InvariantError::new(format!(
                        "entry {} reachable twice (cycle or shared tail)",
                        id.index()
                    )));
                }
                if seen.len() > occupied {
                    return Err(InvariantError::new(format!(
                        "chains hold more than {} occupied entries",
                        occupied
                    )));
                }

                let entry = self.pool.entry(id);
                if entry.is_free() {
                    return Err(InvariantError::new(format!(
                        "free entry {} linked into bucket {}",
                        id.index(),
                        bucket
                    )));
                }
                if entry.count() == 0 {
                    return Err(InvariantError::new(format!(
                        "entry {:?} has zero count",
                        entry.key()
                    )));
                }
                let home = self.bucket_of(entry.key());
                if home != bucket {
                    return Err(InvariantError::new(format!(
                        "entry {:?} in bucket {} hashes to bucket {}",
                        entry.key(),
                        bucket,
                        home
                    )));
                }
                total += entry.count();
                current = entry.next();
            }
        }

        if seen.len() != self.distinct_count || occupied != self.distinct_count {
            return Err(InvariantError::new(format!(
                "distinct_count {} but {} entries reachable and {} slots occupied",
                self.distinct_count,
                seen.len(),
                occupied
            )));
        }
        if total != self.total_count {
            return Err(InvariantError::new(format!(
                "total_count {} but counts sum to {}",
                self.total_count, total
            )));
        }

        let mut free_seen = FxHashSet::default();
        for &id in self.pool.free_ids() {
            if id.index() < self.bucket_count {
                return Err(InvariantError::new(format!(
                    "sentinel {} on the free list",
                    id.index()
                )));
            }
            if !self.pool.entry(id).is_free() || !free_seen.insert(id) {
                return Err(InvariantError::new(format!(
                    "free list entry {} is live or duplicated",
                    id.index()
                )));
            }
        }

        Ok(())
    }

    #[cfg(debug_assertions)]
    fn validate_invariants(&self) {
        if self.pool.capacity() <= DEBUG_VALIDATE_MAX_CAPACITY {
            if let Err(err) = self.check_invariants() {
                panic!("word table invariant violated: {}", err);
            }
        }
    }
}

/// Count of `key` in `table`, treating a missing table as empty.
///
/// ```
/// use wordtable::table::{count_of, WordTable};
///
/// let mut table = WordTable::new(3).unwrap();
/// table.increment("x").unwrap();
/// assert_eq!(count_of(Some(&table), "x"), 1);
/// assert_eq!(count_of(None, "x"), 0);
/// ```
#[inline]
pub fn count_of(table: Option<&WordTable>, key: impl AsRef<[u8]>) -> u64 {
    table.map_or(0, |table| table.get_count(key))
}

impl fmt::Debug for WordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordTable")
            .field("bucket_count", &self.bucket_count)
            .field("capacity", &self.pool.capacity())
            .field("distinct_count", &self.distinct_count)
            .field("total_count", &self.total_count)
            .field("hasher", &self.hasher)
            .finish()
    }
}

#[cfg(feature = "metrics")]
impl WordTable {
    pub fn metrics_snapshot(&self) -> TableMetricsSnapshot {
        TableMetricsSnapshot {
            increment_calls: self.metrics.increment_calls,
            increment_existing: self.metrics.increment_existing,
            increment_new: self.metrics.increment_new,
            decrement_calls: self.metrics.decrement_calls,
            decrement_absent: self.metrics.decrement_absent,
            decrement_releases: self.metrics.decrement_releases,
            lookup_calls: self.metrics.lookup_calls.get(),
            lookup_hits: self.metrics.lookup_hits.get(),
            lookup_misses: self.metrics.lookup_misses.get(),
            chain_steps: self.metrics.chain_steps,
            lookup_chain_steps: self.metrics.lookup_chain_steps.get(),
            growth_events: self.metrics.growth_events,
            growth_failures: self.metrics.growth_failures,
            grown_slots: self.metrics.grown_slots,
            clear_calls: self.metrics.clear_calls,
            distinct_count: self.distinct_count,
            total_count: self.total_count,
            bucket_count: self.bucket_count,
            capacity: self.pool.capacity(),
            free_slots: self.pool.free_len(),
            max_bucket_len: self.max_bucket_len(),
        }
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<TableMetricsSnapshot> for WordTable {
    fn snapshot(&self) -> TableMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl MetricsReset for WordTable {
    fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // Construction
    // ==============================================

    mod construction {
        use super::*;

        #[test]
        fn rejects_zero_and_composite_bucket_counts() {
            for n in [0, 1, 4, 9, 7018] {
                assert_eq!(
                    WordTable::new(n).unwrap_err(),
                    TableError::InvalidBucketCount(n)
                );
            }
        }

        #[test]
        fn prime_bucket_count_succeeds() {
            let table = WordTable::new(7).unwrap();
            assert!(table.is_empty());
            assert_eq!(table.distinct_count(), 0);
            assert_eq!(table.total_count(), 0);
            assert_eq!(table.capacity(), 16);
            assert_eq!(table.free_slots(), 9);
            table.check_invariants().unwrap();
        }

        #[test]
        fn capacity_hint_presizes_pool() {
            let table = WordTable::with_capacity_and_hasher(7, 1000, HashStrategy::Murmur).unwrap();
            assert_eq!(table.capacity(), 1024);
            assert!(table.free_slots() >= 1000);
        }

        #[test]
        fn unsatisfiable_capacity_hint_is_out_of_memory() {
            let err = WordTable::with_capacity_and_hasher(7, usize::MAX / 4, HashStrategy::Murmur)
                .unwrap_err();
            assert!(matches!(err, TableError::OutOfMemory { .. }));
            assert_eq!(err.kind(), crate::error::ErrorKind::OutOfMemory);
        }

        #[test]
        fn overflowing_capacity_hint_is_out_of_memory() {
            let err =
                WordTable::with_capacity_and_hasher(7, usize::MAX, HashStrategy::Murmur).unwrap_err();
            assert_eq!(err, TableError::OutOfMemory { requested: usize::MAX });
        }

        #[test]
        fn bucket_count_is_checked_before_allocating() {
            let err =
                WordTable::with_capacity_and_hasher(8, usize::MAX / 4, HashStrategy::Murmur).unwrap_err();
            assert_eq!(err, TableError::InvalidBucketCount(8));
        }

        #[test]
        fn default_bucket_count_is_prime() {
            assert!(WordTable::new(DEFAULT_BUCKET_COUNT).is_ok());
        }
    }

    // ==============================================
    // Counting
    // ==============================================

    mod counting {
        use super::*;

        #[test]
        fn increment_returns_new_count() {
            let mut table = WordTable::new(7).unwrap();
            assert_eq!(table.increment("a").unwrap(), 1);
            assert_eq!(table.increment("a").unwrap(), 2);
            assert_eq!(table.increment("b").unwrap(), 1);
        }

        #[test]
        fn three_word_scenario() {
            let mut table = WordTable::new(7).unwrap();
            table.increment_all(["a", "b", "a"]).unwrap();
            assert_eq!(table.get_count("a"), 2);
            assert_eq!(table.get_count("b"), 1);
            assert_eq!(table.distinct_count(), 2);
            assert_eq!(table.total_count(), 3);
        }

        #[test]
        fn decrement_to_zero_releases_slot() {
            let mut table = WordTable::new(7).unwrap();
            table.increment_all(["a", "b", "a"]).unwrap();
            let free_before = table.free_slots();

            assert_eq!(table.decrement("b").unwrap(), 0);
            assert_eq!(table.get_count("b"), 0);
            assert_eq!(table.distinct_count(), 1);
            assert_eq!(table.total_count(), 2);
            assert_eq!(table.free_slots(), free_before + 1);

            assert_eq!(table.decrement("b"), Err(TableError::AbsentKey));
            assert_eq!(table.total_count(), 2);
        }

        #[test]
        fn decrement_keeps_entry_while_positive() {
            let mut table = WordTable::new(7).unwrap();
            table.increment_all(["w", "w", "w"]).unwrap();
            assert_eq!(table.decrement("w").unwrap(), 2);
            assert_eq!(table.distinct_count(), 1);
            assert!(table.contains("w"));
        }

        #[test]
        fn increment_then_decrement_is_neutral() {
            let mut table = WordTable::new(11).unwrap();
            table.increment_all(["x", "y", "y"]).unwrap();
            let (distinct, total) = (table.distinct_count(), table.total_count());

            table.increment("fresh").unwrap();
            table.decrement("fresh").unwrap();

            assert_eq!(table.get_count("fresh"), 0);
            assert_eq!(table.distinct_count(), distinct);
            assert_eq!(table.total_count(), total);
        }

        #[test]
        fn invalid_keys_fail_without_side_effects() {
            let mut table = WordTable::new(7).unwrap();
            let long = "x".repeat(65);
            assert_eq!(
                table.increment(&long),
                Err(TableError::KeyTooLong { len: 65 })
            );
            assert_eq!(table.increment("a\0"), Err(TableError::InvalidKey));
            assert_eq!(table.total_count(), 0);
            assert_eq!(table.get_count(&long), 0);
        }

        #[test]
        fn get_count_is_idempotent() {
            let mut table = WordTable::new(7).unwrap();
            table.increment("k").unwrap();
            assert_eq!(table.get_count("k"), table.get_count("k"));
            assert_eq!(table.get_count("nope"), 0);
            assert_eq!(table.get_count("nope"), 0);
            assert_eq!(count_of(None, "k"), 0);
            assert_eq!(count_of(None, "k"), 0);
        }

        #[test]
        fn byte_keys_and_str_keys_agree() {
            let mut table = WordTable::new(7).unwrap();
            table.increment(b"bytes").unwrap();
            assert_eq!(table.get_count("bytes"), 1);
        }
    }

    // ==============================================
    // Chains
    // ==============================================

    mod chains {
        use super::*;

        #[test]
        fn single_bucket_chain_is_most_recent_first() {
            let mut table = WordTable::with_hasher(2, HashStrategy::AlwaysOne).unwrap();
            table.increment_all(["first", "second", "third"]).unwrap();
            let keys: Vec<&[u8]> = table.iter().map(|(key, _)| key).collect();
            assert_eq!(keys, vec![&b"third"[..], b"second", b"first"]);
            assert_eq!(table.bucket_len(1), Some(3));
            assert_eq!(table.bucket_len(0), Some(0));
            assert_eq!(table.bucket_len(2), None);
        }

        #[test]
        fn unlink_from_middle_of_chain() {
            let mut table = WordTable::with_hasher(2, HashStrategy::AlwaysOne).unwrap();
            table.increment_all(["a", "b", "c"]).unwrap();
            table.decrement("b").unwrap();
            let keys: Vec<&[u8]> = table.iter().map(|(key, _)| key).collect();
            assert_eq!(keys, vec![&b"c"[..], b"a"]);
            table.check_invariants().unwrap();
        }

        #[test]
        fn unlink_head_and_tail() {
            let mut table = WordTable::with_hasher(2, HashStrategy::AlwaysOne).unwrap();
            table.increment_all(["a", "b", "c"]).unwrap();
            table.decrement("c").unwrap();
            table.decrement("a").unwrap();
            let keys: Vec<&[u8]> = table.iter().map(|(key, _)| key).collect();
            assert_eq!(keys, vec![&b"b"[..]]);
        }

        #[test]
        fn bucket_sizes_sum_to_distinct_count() {
            let mut table = WordTable::new(13).unwrap();
            for i in 0..200 {
                table.increment(format!("w{}", i % 50)).unwrap();
            }
            let sizes = table.bucket_sizes();
            assert_eq!(sizes.len(), 13);
            assert_eq!(sizes.iter().sum::<usize>(), 50);
            assert_eq!(table.max_bucket_len(), *sizes.iter().max().unwrap());
            for (bucket, &size) in sizes.iter().enumerate() {
                assert_eq!(table.bucket_len(bucket), Some(size));
            }
        }
    }

    // ==============================================
    // Growth
    // ==============================================

    mod growth {
        use super::*;

        #[test]
        fn grows_exactly_when_free_list_runs_out() {
            let mut table = WordTable::new(7).unwrap();
            for i in 0..9 {
                table.increment(format!("k{}", i)).unwrap();
            }
            assert_eq!(table.capacity(), 16);
            assert_eq!(table.free_slots(), 0);

            table.increment("k0").unwrap();
            assert_eq!(table.capacity(), 16, "existing key must not grow");

            table.increment("k9").unwrap();
            assert_eq!(table.capacity(), 32);
            assert_eq!(table.free_slots(), 15);
        }

        #[test]
        fn counts_survive_many_growths() {
            let mut table = WordTable::new(3).unwrap();
            for i in 0..5000u64 {
                for _ in 0..(i % 3 + 1) {
                    table.increment(format!("word-{}", i)).unwrap();
                }
            }
            assert!(table.capacity() >= 5003);
            assert!(table.capacity().is_power_of_two());
            for i in 0..5000u64 {
                assert_eq!(table.get_count(format!("word-{}", i)), i % 3 + 1);
            }
            table.check_invariants().unwrap();
        }

        #[test]
        fn capacity_never_shrinks() {
            let mut table = WordTable::new(5).unwrap();
            for i in 0..100 {
                table.increment(format!("{}", i)).unwrap();
            }
            let grown = table.capacity();
            for i in 0..100 {
                table.decrement(format!("{}", i)).unwrap();
            }
            assert!(table.is_empty());
            assert_eq!(table.capacity(), grown);
            table.check_invariants().unwrap();
        }

        #[test]
        fn released_slots_are_reused_before_growing() {
            let mut table = WordTable::new(7).unwrap();
            for i in 0..9 {
                table.increment(format!("k{}", i)).unwrap();
            }
            table.decrement("k3").unwrap();
            table.increment("replacement").unwrap();
            assert_eq!(table.capacity(), 16);
        }
    }

    // ==============================================
    // Clear
    // ==============================================

    mod clear {
        use super::*;

        #[test]
        fn clear_empties_and_keeps_capacity() {
            let mut table = WordTable::new(7).unwrap();
            for i in 0..40 {
                table.increment(format!("c{}", i)).unwrap();
            }
            let capacity = table.capacity();
            table.clear();
            assert!(table.is_empty());
            assert_eq!(table.total_count(), 0);
            assert_eq!(table.capacity(), capacity);
            assert_eq!(table.free_slots(), capacity - 7);
            assert_eq!(table.get_count("c1"), 0);
            table.check_invariants().unwrap();

            table.increment("again").unwrap();
            assert_eq!(table.get_count("again"), 1);
        }
    }

    // ==============================================
    // Metrics
    // ==============================================

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_track_operations() {
            let mut table = WordTable::new(7).unwrap();
            for i in 0..10 {
                table.increment(format!("m{}", i)).unwrap();
            }
            table.increment("m0").unwrap();
            table.decrement("m1").unwrap();
            let _ = table.decrement("absent");
            table.get_count("m0");
            table.get_count("zzz");

            let snap = table.metrics_snapshot();
            assert_eq!(snap.increment_calls, 11);
            assert_eq!(snap.increment_new, 10);
            assert_eq!(snap.increment_existing, 1);
            assert_eq!(snap.decrement_calls, 2);
            assert_eq!(snap.decrement_releases, 1);
            assert_eq!(snap.decrement_absent, 1);
            assert_eq!(snap.lookup_calls, 2);
            assert_eq!(snap.lookup_hits, 1);
            assert_eq!(snap.lookup_misses, 1);
            assert_eq!(snap.growth_events, 1);
            assert_eq!(snap.grown_slots, 16);
            assert_eq!(snap.distinct_count, 9);
            assert_eq!(snap.capacity, 32);
        }

        #[test]
        fn reset_zeroes_counters_but_not_gauges() {
            let mut table = WordTable::new(7).unwrap();
            table.increment("a").unwrap();
            table.get_count("a");
            table.reset_metrics();
            let snap = table.snapshot();
            assert_eq!(snap.increment_calls, 0);
            assert_eq!(snap.lookup_calls, 0);
            assert_eq!(snap.distinct_count, 1);
        }
    }

    // ==============================================
    // Property Tests
    // ==============================================

    mod property_tests {
        use super::*;
        use proptest::prelude::*;
        use rustc_hash::FxHashMap;

        #[derive(Debug, Clone)]
        enum Op {
            Increment(u8),
            Decrement(u8),
            Get(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => (0u8..40).prop_map(Op::Increment),
                2 => (0u8..40).prop_map(Op::Decrement),
                1 => (0u8..40).prop_map(Op::Get),
            ]
        }

        fn word(k: u8) -> String {
            format!("w{}", k)
        }

        fn bucket_strategy() -> impl Strategy<Value = usize> {
            prop::sample::select(vec![2usize, 3, 5, 7, 13, 31])
        }

        proptest! {
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_matches_model_and_invariants_hold(
                buckets in bucket_strategy(),
                ops in prop::collection::vec(op_strategy(), 0..300)
            ) {
                let mut table = WordTable::new(buckets).unwrap();
                let mut model: FxHashMap<String, u64> = FxHashMap::default();

                for op in ops {
                    match op {
                        Op::Increment(k) => {
                            let count = table.increment(word(k)).unwrap();
                            let expected = model.entry(word(k)).or_insert(0);
                            *expected += 1;
                            prop_assert_eq!(count, *expected);
                        },
                        Op::Decrement(k) => {
                            let result = table.decrement(word(k));
                            match model.get_mut(&word(k)) {
                                Some(c) => {
                                    *c -= 1;
                                    prop_assert_eq!(result, Ok(*c));
                                    if *c == 0 {
                                        model.remove(&word(k));
                                    }
                                },
                                None => prop_assert_eq!(result, Err(TableError::AbsentKey)),
                            }
                        },
                        Op::Get(k) => {
                            prop_assert_eq!(
                                table.get_count(word(k)),
                                model.get(&word(k)).copied().unwrap_or(0)
                            );
                        },
                    }
                    prop_assert!(table.check_invariants().is_ok());
                    prop_assert_eq!(table.distinct_count(), model.len());
                    prop_assert_eq!(table.total_count(), model.values().sum::<u64>());
                }
            }

            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_capacity_is_monotonic_power_of_two(
                ops in prop::collection::vec(op_strategy(), 0..300)
            ) {
                let mut table = WordTable::new(3).unwrap();
                let mut last = table.capacity();
                for op in ops {
                    match op {
                        Op::Increment(k) => { table.increment(word(k)).unwrap(); },
                        Op::Decrement(k) => { let _ = table.decrement(word(k)); },
                        Op::Get(k) => { table.get_count(word(k)); },
                    }
                    prop_assert!(table.capacity() >= last);
                    prop_assert!(table.capacity().is_power_of_two());
                    last = table.capacity();
                }
            }
        }
    }
}
