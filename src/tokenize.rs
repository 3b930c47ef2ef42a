//! Streaming word splitter and table filler.
//!
//! A word is a maximal run of bytes that are not ASCII whitespace,
//! punctuation, digits or control bytes. Bytes `>= 0x80` count as word
//! bytes, so UTF-8 text splits on ASCII separators and multibyte words stay
//! whole. NUL is a control byte, so every word is a valid table key.
//!
//! ```
//! use wordtable::tokenize::{fill_table, FillOptions};
//! use wordtable::table::WordTable;
//!
//! let mut table = WordTable::new(7).unwrap();
//! let stats = fill_table(&mut table, "It's 2 o'clock!".as_bytes(), FillOptions::default()).unwrap();
//! assert_eq!(stats.words, 4);
//! assert_eq!(table.get_count("It"), 1);
//! assert_eq!(table.get_count("clock"), 1);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::ds::key::MAX_KEY_LEN;
use crate::error::TableError;
use crate::table::WordTable;

/// Returns `true` if `byte` belongs to a word.
#[inline]
pub fn is_word_byte(byte: u8) -> bool {
    !(byte.is_ascii_whitespace()
        || byte.is_ascii_punctuation()
        || byte.is_ascii_digit()
        || byte.is_ascii_control())
}

/// Iterator over the words of a byte stream.
///
/// Reads through a [`BufReader`]; a word that straddles two buffer fills is
/// returned whole. A word longer than [`MAX_KEY_LEN`] is cut to
/// `MAX_KEY_LEN + 1` bytes, enough to tell it apart from a valid key without
/// buffering the rest of the run.
pub struct Tokenizer<R> {
    reader: BufReader<R>,
}

impl<R: Read> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
        }
    }

    fn next_word(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut word = Vec::new();
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if buf.is_empty() {
                return Ok((!word.is_empty()).then_some(word));
            }

            let mut used = 0;
            let mut complete = false;
            for &byte in buf {
                used += 1;
                if is_word_byte(byte) {
                    if word.len() <= MAX_KEY_LEN {
                        word.push(byte);
                    }
                } else if !word.is_empty() {
                    complete = true;
                    break;
                }
            }
            self.reader.consume(used);

            if complete {
                return Ok(Some(word));
            }
        }
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_word().transpose()
    }
}

impl<R> fmt::Debug for Tokenizer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("buffered", &self.reader.buffer().len())
            .finish()
    }
}

/// Options for [`fill_table`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillOptions {
    /// Stop after this many words (counted or skipped).
    pub max_words: Option<usize>,
    /// Fold ASCII letters to lowercase before counting.
    pub lowercase: bool,
}

/// Outcome of a [`fill_table`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Words added to the table.
    pub words: u64,
    /// Words longer than [`MAX_KEY_LEN`] that were left out.
    pub skipped_long: u64,
}

/// Error returned while filling a table from a stream.
#[derive(Debug)]
pub enum FillError {
    Open { path: PathBuf, source: io::Error },
    Io(io::Error),
    Table(TableError),
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::Open { path, source } => {
                write!(f, "cannot open '{}': {}", path.display(), source)
            },
            FillError::Io(err) => write!(f, "read error: {}", err),
            FillError::Table(err) => write!(f, "table error: {}", err),
        }
    }
}

impl std::error::Error for FillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FillError::Open { source, .. } => Some(source),
            FillError::Io(err) => Some(err),
            FillError::Table(err) => Some(err),
        }
    }
}

impl From<io::Error> for FillError {
    fn from(err: io::Error) -> Self {
        FillError::Io(err)
    }
}

impl From<TableError> for FillError {
    fn from(err: TableError) -> Self {
        FillError::Table(err)
    }
}

/// Counts every word of `reader` into `table`.
///
/// Overlong words are skipped and reported in [`FillStats::skipped_long`].
/// On error the words read so far stay counted.
pub fn fill_table<R: Read>(
    table: &mut WordTable,
    reader: R,
    options: FillOptions,
) -> Result<FillStats, FillError> {
    let mut stats = FillStats::default();
    let limit = options.max_words.map(|n| n as u64);

    for word in Tokenizer::new(reader) {
        if limit.is_some_and(|limit| stats.words + stats.skipped_long >= limit) {
            break;
        }
        let mut word = word?;
        if word.len() > MAX_KEY_LEN {
            stats.skipped_long += 1;
            continue;
        }
        if options.lowercase {
            word.make_ascii_lowercase();
        }
        table.increment(&word)?;
        stats.words += 1;
    }

    Ok(stats)
}

/// Opens `path` and counts its words into `table`.
pub fn fill_table_from_path(
    table: &mut WordTable,
    path: impl AsRef<Path>,
    options: FillOptions,
) -> Result<FillStats, FillError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FillError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    fill_table(table, file, options)
}
