//! Error types for the wordtable library.
//!
//! ## Key Components
//!
//! - [`TableError`]: Returned by fallible table operations (construction,
//!   `increment`, `decrement`, bounded difference queries).
//! - [`ErrorKind`]: Coarse classification of a [`TableError`]
//!   (invalid argument vs. out of memory).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use wordtable::error::{ErrorKind, TableError};
//! use wordtable::table::WordTable;
//!
//! // Bucket counts must be prime
//! let bad = WordTable::new(4);
//! assert_eq!(bad.unwrap_err().kind(), ErrorKind::InvalidArgument);
//!
//! let mut table = WordTable::new(7).unwrap();
//! let err = table.decrement("missing").unwrap_err();
//! assert_eq!(err, TableError::AbsentKey);
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Classification of a [`TableError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller broke the operation's contract; retrying cannot succeed.
    InvalidArgument,
    /// The allocator could not satisfy a growth request.
    OutOfMemory,
}

// ---------------------------------------------------------------------------
// TableError
// ---------------------------------------------------------------------------

/// Error returned by fallible [`WordTable`](crate::table::WordTable)
/// operations.
///
/// A failed operation never leaves a partial update behind: counters, chains
/// and the free list are exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Bucket count was zero or not prime.
    InvalidBucketCount(usize),
    /// Key does not fit in the fixed-width key buffer.
    KeyTooLong { len: usize },
    /// Key contains a NUL byte, which is reserved for padding.
    InvalidKey,
    /// Decrement of a key that is not stored in the table.
    AbsentKey,
    /// A bounded query produced more results than the caller allowed.
    CapacityExceeded { capacity: usize },
    /// Growing the entry pool to `requested` slots failed.
    OutOfMemory { requested: usize },
}

impl TableError {
    /// Returns the coarse classification of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InvalidBucketCount(n) => {
                write!(f, "bucket count must be a prime number, got {}", n)
            },
            TableError::KeyTooLong { len } => write!(
                f,
                "key of {} bytes exceeds the maximum key length of {}",
                len,
                crate::ds::key::MAX_KEY_LEN
            ),
            TableError::InvalidKey => f.write_str("key must not contain NUL bytes"),
            TableError::AbsentKey => f.write_str("key is not present in the table"),
            TableError::CapacityExceeded { capacity } => {
                write!(f, "result does not fit in output capacity {}", capacity)
            },
            TableError::OutOfMemory { requested } => {
                write!(f, "failed to grow entry pool to {} slots", requested)
            },
        }
    }
}

impl std::error::Error for TableError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal table invariants are violated.
///
/// Produced by [`WordTable::check_invariants`](crate::table::WordTable::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
