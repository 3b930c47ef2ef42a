//! Cursor and iterator over the live entries of a [`WordTable`].
//!
//! Visit order is bucket index ascending, then chain order inside a bucket
//! (most recently inserted first). Both types borrow the table, so it cannot
//! be mutated while either is alive.
//!
//! ```text
//!   bucket:   0        1          2     3              4
//!            (empty)  "of"─►"to"  (empty) "cat"         (empty)
//!
//!   start ──► "of" ──advance──► "to" ──advance──► "cat" ──advance──► false
//! ```
//!
//! [`Cursor`] is the resumable form: it always sits on an occupied entry and
//! keeps no state besides its position. [`Iter`] wraps it as a standard
//! [`Iterator`].

use std::borrow::Cow;
use std::fmt;
use std::iter::FusedIterator;

use crate::ds::pool::EntryId;
use crate::table::WordTable;

/// Position on one occupied entry of a table.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    table: &'a WordTable,
    bucket: usize,
    entry: EntryId,
}

impl<'a> Cursor<'a> {
    /// Positions a cursor on the first occupied entry, or returns `None` for
    /// an empty table.
    ///
    /// # Example
    ///
    /// ```
    /// use wordtable::iter::Cursor;
    /// use wordtable::table::WordTable;
    ///
    /// let mut table = WordTable::new(7).unwrap();
    /// assert!(Cursor::start(&table).is_none());
    ///
    /// table.increment("one").unwrap();
    /// table.increment("two").unwrap();
    /// let mut cursor = Cursor::start(&table).unwrap();
    /// let mut seen = 1;
    /// while cursor.advance() {
    ///     seen += 1;
    /// }
    /// assert_eq!(seen, 2);
    /// ```
    pub fn start(table: &'a WordTable) -> Option<Self> {
        let (bucket, entry) = first_occupied_from(table, 0)?;
        Some(Self {
            table,
            bucket,
            entry,
        })
    }

    /// Returns `true` if another occupied entry follows this one.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.table.pool().entry(self.entry).next().is_some()
            || first_occupied_from(self.table, self.bucket + 1).is_some()
    }

    /// Moves to the next occupied entry. Returns `false` and leaves the cursor
    /// where it was when there is none.
    pub fn advance(&mut self) -> bool {
        if let Some(next) = self.table.pool().entry(self.entry).next() {
            self.entry = next;
            return true;
        }
        match first_occupied_from(self.table, self.bucket + 1) {
            Some((bucket, entry)) => {
                self.bucket = bucket;
                self.entry = entry;
                true
            },
            None => false,
        }
    }

    /// Key bytes at the cursor.
    #[inline]
    pub fn key(&self) -> &'a [u8] {
        self.table.pool().entry(self.entry).key().as_bytes()
    }

    /// Key at the cursor as text, invalid UTF-8 replaced.
    #[inline]
    pub fn key_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.key())
    }

    /// Count at the cursor. Always at least one.
    #[inline]
    pub fn count(&self) -> u64 {
        self.table.pool().entry(self.entry).count()
    }

    /// Bucket the cursor is in.
    #[inline]
    pub fn bucket(&self) -> usize {
        self.bucket
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("bucket", &self.bucket)
            .field("key", &self.key_str())
            .field("count", &self.count())
            .finish()
    }
}

fn first_occupied_from(table: &WordTable, from: usize) -> Option<(usize, EntryId)> {
    let pool = table.pool();
    (from..table.bucket_count())
        .find_map(|bucket| pool.sentinel(bucket).next().map(|head| (bucket, head)))
}

/// Iterator over `(key, count)` pairs, built on [`Cursor`].
pub struct Iter<'a> {
    cursor: Option<Cursor<'a>>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(table: &'a WordTable) -> Self {
        Self {
            cursor: Cursor::start(table),
            remaining: table.distinct_count(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], u64);

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        let item = (cursor.key(), cursor.count());
        if !cursor.advance() {
            self.cursor = None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl FusedIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl WordTable {
    /// Iterates `(key, count)` pairs in bucket order, then chain order.
    ///
    /// ```
    /// use wordtable::table::WordTable;
    ///
    /// let mut table = WordTable::new(5).unwrap();
    /// table.increment_all(["x", "y", "x"]).unwrap();
    /// let mut pairs: Vec<_> = table.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, vec![(&b"x"[..], 2), (&b"y"[..], 1)]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Cursor on the first occupied entry, `None` if the table is empty.
    pub fn cursor(&self) -> Option<Cursor<'_>> {
        Cursor::start(self)
    }
}

impl<'a> IntoIterator for &'a WordTable {
    type Item = (&'a [u8], u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds::hash::HashStrategy;

    fn collect_via_cursor(table: &WordTable) -> Vec<(Vec<u8>, u64)> {
        let mut out = Vec::new();
        let Some(mut cursor) = Cursor::start(table) else {
            return out;
        };
        loop {
            out.push((cursor.key().to_vec(), cursor.count()));
            if !cursor.advance() {
                break;
            }
        }
        out
    }

    // ==============================================
    // Cursor
    // ==============================================

    mod cursor {
        use super::*;

        #[test]
        fn empty_table_has_no_cursor() {
            let table = WordTable::new(7).unwrap();
            assert!(Cursor::start(&table).is_none());
            assert!(table.cursor().is_none());
        }

        #[test]
        fn visits_every_entry_once() {
            let mut table = WordTable::new(11).unwrap();
            for i in 0..60 {
                table.increment(format!("w{}", i)).unwrap();
            }
            let mut keys: Vec<Vec<u8>> =
                collect_via_cursor(&table).into_iter().map(|(k, _)| k).collect();
            assert_eq!(keys.len(), 60);
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), 60);
        }

        #[test]
        fn buckets_are_visited_in_ascending_order() {
            let mut table = WordTable::new(13).unwrap();
            for i in 0..80 {
                table.increment(format!("b{}", i)).unwrap();
            }
            let mut cursor = Cursor::start(&table).unwrap();
            let mut last = cursor.bucket();
            while cursor.advance() {
                assert!(cursor.bucket() >= last);
                last = cursor.bucket();
            }
        }

        #[test]
        fn has_next_agrees_with_advance_and_does_not_move() {
            let mut table = WordTable::new(7).unwrap();
            table.increment_all(["p", "q", "r", "s"]).unwrap();
            let mut cursor = Cursor::start(&table).unwrap();
            loop {
                let before = (cursor.bucket(), cursor.key());
                let expected = cursor.has_next();
                assert_eq!((cursor.bucket(), cursor.key()), before);
                assert_eq!(cursor.advance(), expected);
                if !expected {
                    break;
                }
            }
        }

        #[test]
        fn exhausted_cursor_stays_put() {
            let mut table = WordTable::new(3).unwrap();
            table.increment("only").unwrap();
            let mut cursor = Cursor::start(&table).unwrap();
            assert!(!cursor.has_next());
            assert!(!cursor.advance());
            assert!(!cursor.advance());
            assert_eq!(cursor.key(), b"only");
            assert_eq!(cursor.key_str(), "only");
            assert_eq!(cursor.count(), 1);
        }

        #[test]
        fn skips_buckets_emptied_by_decrement() {
            let mut table = WordTable::with_hasher(7, HashStrategy::Length).unwrap();
            table.increment_all(["a", "bb", "ccc"]).unwrap();
            table.decrement("bb").unwrap();
            let keys: Vec<Vec<u8>> =
                collect_via_cursor(&table).into_iter().map(|(k, _)| k).collect();
            assert_eq!(keys, vec![b"a".to_vec(), b"ccc".to_vec()]);
        }
    }

    // ==============================================
    // Iter
    // ==============================================

    mod iter {
        use super::*;

        #[test]
        fn iter_matches_cursor_walk() {
            let mut table = WordTable::new(5).unwrap();
            for i in 0..30 {
                for _ in 0..=(i % 4) {
                    table.increment(format!("k{}", i)).unwrap();
                }
            }
            let via_iter: Vec<(Vec<u8>, u64)> =
                table.iter().map(|(k, c)| (k.to_vec(), c)).collect();
            assert_eq!(via_iter, collect_via_cursor(&table));
        }

        #[test]
        fn exact_size_and_fused() {
            let mut table = WordTable::new(7).unwrap();
            table.increment_all(["a", "b", "c", "a"]).unwrap();
            let mut iter = table.iter();
            assert_eq!(iter.len(), 3);
            iter.next();
            assert_eq!(iter.len(), 2);
            iter.next();
            iter.next();
            assert_eq!(iter.len(), 0);
            assert!(iter.next().is_none());
            assert!(iter.next().is_none());
        }

        #[test]
        fn counts_sum_to_total() {
            let mut table = WordTable::new(7).unwrap();
            for word in "the cat and the hat and the bat".split(' ') {
                table.increment(word).unwrap();
            }
            let sum: u64 = (&table).into_iter().map(|(_, c)| c).sum();
            assert_eq!(sum, table.total_count());
        }

        #[test]
        fn for_loop_over_reference() {
            let mut table = WordTable::new(7).unwrap();
            table.increment("z").unwrap();
            let mut seen = 0;
            for (key, count) in &table {
                assert_eq!(key, b"z");
                assert_eq!(count, 1);
                seen += 1;
            }
            assert_eq!(seen, 1);
        }
    }
}
