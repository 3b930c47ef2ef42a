//! Text reports printed by the `wordcmp` tool.

use std::io::{self, Write};

use crate::compare::{cosine_similarity, difference, difference_count};
use crate::error::TableError;
use crate::table::WordTable;

const RULER: &str = "========================================";

/// Error from writing a report.
#[derive(Debug)]
pub enum ReportError {
    Io(io::Error),
    Table(TableError),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(err) => write!(f, "write error: {}", err),
            ReportError::Table(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Table(err) => Some(err),
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(err: io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<TableError> for ReportError {
    fn from(err: TableError) -> Self {
        ReportError::Table(err)
    }
}

/// A table together with the name it is reported under.
#[derive(Debug, Clone, Copy)]
pub struct Named<'a> {
    pub name: &'a str,
    pub table: &'a WordTable,
}

/// Writes the cosine similarity and both one-sided differences.
///
/// With `verbose`, the differing words are listed between rulers.
///
/// ```
/// use wordtable::report::{write_comparison, Named};
/// use wordtable::table::WordTable;
///
/// let mut a = WordTable::new(7).unwrap();
/// a.increment_all(["a", "a", "b"]).unwrap();
/// let mut b = WordTable::new(7).unwrap();
/// b.increment_all(["a", "c"]).unwrap();
///
/// let mut out = Vec::new();
/// write_comparison(
///     &mut out,
///     Named { name: "x.txt", table: &a },
///     Named { name: "y.txt", table: &b },
///     false,
/// )
/// .unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("Cosine similarity: 0.632456\n"));
/// assert!(text.contains("Total distinct words in 'x.txt' which are not in 'y.txt': 1\n"));
/// ```
pub fn write_comparison<W: Write>(
    out: &mut W,
    first: Named<'_>,
    second: Named<'_>,
    verbose: bool,
) -> Result<(), ReportError> {
    writeln!(
        out,
        "Cosine similarity: {:.6}",
        cosine_similarity(first.table, second.table)
    )?;

    // every one-sided difference fits in the larger vocabulary
    let capacity = first
        .table
        .distinct_count()
        .max(second.table.distinct_count());

    for (from, other) in [(first, second), (second, first)] {
        if verbose {
            let words = difference(from.table, other.table, capacity)?;
            write_difference_header(out, from, other, words.len())?;
            writeln!(out, "{}", RULER)?;
            for word in words {
                out.write_all(word)?;
                out.write_all(b"\n")?;
            }
            writeln!(out, "{}", RULER)?;
        } else {
            let count = difference_count(from.table, other.table);
            write_difference_header(out, from, other, count)?;
        }
    }
    Ok(())
}

fn write_difference_header<W: Write>(
    out: &mut W,
    from: Named<'_>,
    other: Named<'_>,
    count: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "\nTotal distinct words in '{}' which are not in '{}': {}",
        from.name, other.name, count
    )
}

/// Writes one CSV line: the hash name followed by every bucket's chain
/// length.
pub fn write_histogram<W: Write>(out: &mut W, table: &WordTable) -> io::Result<()> {
    write!(out, "{}", table.hash_strategy())?;
    for len in table.bucket_sizes() {
        write!(out, ",{}", len)?;
    }
    writeln!(out)
}
