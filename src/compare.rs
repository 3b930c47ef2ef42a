//! Word-multiset comparisons between two tables.
//!
//! Both queries are built only from iteration and `get_count`, so the tables
//! may use different bucket counts and hash strategies.
//!
//! ```
//! use wordtable::compare::{cosine_similarity, difference};
//! use wordtable::table::WordTable;
//!
//! let mut a = WordTable::new(7).unwrap();
//! a.increment_all(["a", "a", "b"]).unwrap();
//! let mut b = WordTable::new(7).unwrap();
//! b.increment_all(["a", "c"]).unwrap();
//!
//! assert_eq!(difference(&a, &b, 8).unwrap(), vec![&b"b"[..]]);
//! assert!((cosine_similarity(&a, &b) - 0.632).abs() < 1e-3);
//! ```

use crate::error::TableError;
use crate::table::WordTable;

/// Keys of `a` that have a zero count in `b`, in `a`'s iteration order.
///
/// # Errors
///
/// [`TableError::CapacityExceeded`] if more than `capacity` keys qualify.
/// Results are never silently truncated.
pub fn difference<'a>(
    a: &'a WordTable,
    b: &WordTable,
    capacity: usize,
) -> Result<Vec<&'a [u8]>, TableError> {
    let mut out = Vec::new();
    for (key, _) in a {
        if b.get_count(key) != 0 {
            continue;
        }
        if out.len() == capacity {
            return Err(TableError::CapacityExceeded { capacity });
        }
        out.push(key);
    }
    Ok(out)
}

/// Number of keys of `a` that have a zero count in `b`.
pub fn difference_count(a: &WordTable, b: &WordTable) -> usize {
    a.iter().filter(|&(key, _)| b.get_count(key) == 0).count()
}

/// Euclidean norm of the table's count vector.
pub fn norm(table: &WordTable) -> f64 {
    table
        .iter()
        .map(|(_, count)| {
            let c = count as f64;
            c * c
        })
        .sum::<f64>()
        .sqrt()
}

/// Cosine of the angle between the count vectors of `a` and `b`.
///
/// Returns `0.0` if either table is empty.
pub fn cosine_similarity(a: &WordTable, b: &WordTable) -> f64 {
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // keys missing from `a` add nothing to the dot product
    let dot: f64 = a
        .iter()
        .map(|(key, count)| count as f64 * b.get_count(key) as f64)
        .sum();

    dot / (norm_a * norm_b)
}
