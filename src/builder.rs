//! Builder for [`WordTable`] instances.
//!
//! Collects the bucket count, hash strategy and an optional vocabulary
//! estimate, then validates and allocates in one step.
//!
//! ## Example
//!
//! ```rust
//! use wordtable::builder::TableBuilder;
//! use wordtable::ds::HashStrategy;
//!
//! let mut table = TableBuilder::new(101)
//!     .hasher(HashStrategy::Fx)
//!     .reserve(500)
//!     .build()
//!     .unwrap();
//! table.increment("hello").unwrap();
//! assert_eq!(table.get_count("hello"), 1);
//! assert_eq!(table.capacity(), 1024);
//! ```

use crate::ds::hash::HashStrategy;
use crate::error::TableError;
use crate::table::WordTable;

pub use crate::table::DEFAULT_BUCKET_COUNT;

/// Builder for creating word tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBuilder {
    bucket_count: usize,
    hasher: HashStrategy,
    distinct_hint: usize,
}

impl TableBuilder {
    /// Create a new builder for a table with `bucket_count` buckets.
    pub fn new(bucket_count: usize) -> Self {
        Self {
            bucket_count,
            hasher: HashStrategy::default(),
            distinct_hint: 0,
        }
    }

    /// Hash used to map keys to buckets.
    pub fn hasher(mut self, hasher: HashStrategy) -> Self {
        self.hasher = hasher;
        self
    }

    /// Pre-size the pool for about `distinct` keys so the first growths are
    /// skipped.
    pub fn reserve(mut self, distinct: usize) -> Self {
        self.distinct_hint = distinct;
        self
    }

    /// Build the table.
    ///
    /// # Errors
    ///
    /// - [`TableError::InvalidBucketCount`] if the bucket count is not prime
    /// - [`TableError::OutOfMemory`] if the pool cannot be allocated
    ///
    /// # Example
    ///
    /// ```rust
    /// use wordtable::builder::TableBuilder;
    /// use wordtable::error::TableError;
    ///
    /// assert_eq!(
    ///     TableBuilder::new(100).build().unwrap_err(),
    ///     TableError::InvalidBucketCount(100)
    /// );
    /// ```
    pub fn build(self) -> Result<WordTable, TableError> {
        WordTable::with_capacity_and_hasher(self.bucket_count, self.distinct_hint, self.hasher)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_COUNT)
    }
}
