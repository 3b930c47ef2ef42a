//! wordtable: a fixed-bucket, separate-chaining word counter with a
//! preallocated entry pool, plus word-multiset comparisons built on it.
//!
//! - [`table::WordTable`]: increment / decrement / lookup of word counts
//! - [`iter`]: resumable cursor and iterator over live entries
//! - [`compare`]: set difference and cosine similarity of two tables
//! - [`tokenize`]: streaming word splitter that fills a table
//! - [`report`]: text output of the `wordcmp` tool
//! - [`ds`]: key buffer, hash strategies, entry pool and sizing helpers

pub mod builder;
pub mod compare;
pub mod ds;
pub mod error;
pub mod iter;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod report;
pub mod table;
pub mod tokenize;
