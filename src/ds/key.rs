//! Fixed-width, zero-padded key buffer.
//!
//! Every stored key occupies exactly [`MAX_KEY_LEN`] bytes aligned to its own
//! width. Bytes past the real key are zero, so two keys are equal iff their
//! whole buffers are equal. The comparison is a plain `[u8; 64]` equality,
//! which the compiler lowers to a handful of wide vector compares instead of a
//! byte-by-byte scan.
//!
//! ```text
//!   "cat"  →  [ c | a | t | 0 | 0 | ... | 0 ]   64 bytes, align(64)
//!   "cats" →  [ c | a | t | s | 0 | ... | 0 ]
//! ```
//!
//! NUL is the padding byte, so keys containing NUL are rejected: `"a\0"` would
//! otherwise be indistinguishable from `"a"`.

use std::borrow::Cow;
use std::fmt;

use crate::error::TableError;

/// Maximum key length in bytes.
pub const MAX_KEY_LEN: usize = 64;

/// A key stored in a 64-byte, 64-byte-aligned, zero-padded buffer.
#[repr(C, align(64))]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedKey([u8; MAX_KEY_LEN]);

impl FixedKey {
    /// The all-zero key held by free slots and sentinels.
    pub const EMPTY: FixedKey = FixedKey([0; MAX_KEY_LEN]);

    /// Copies `bytes` into a fresh zero-padded buffer.
    ///
    /// # Errors
    ///
    /// - [`TableError::KeyTooLong`] if `bytes` is longer than [`MAX_KEY_LEN`]
    /// - [`TableError::InvalidKey`] if `bytes` contains a NUL byte
    ///
    /// # Example
    ///
    /// ```
    /// use wordtable::ds::FixedKey;
    ///
    /// let key = FixedKey::new(b"word").unwrap();
    /// assert_eq!(key.as_bytes(), b"word");
    /// assert_eq!(key.len(), 4);
    /// assert!(FixedKey::new(&[b'x'; 65]).is_err());
    /// ```
    #[inline]
    pub fn new(bytes: &[u8]) -> Result<Self, TableError> {
        if bytes.len() > MAX_KEY_LEN {
            return Err(TableError::KeyTooLong { len: bytes.len() });
        }
        if bytes.contains(&0) {
            return Err(TableError::InvalidKey);
        }
        let mut buf = [0u8; MAX_KEY_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Returns the whole padded buffer.
    #[inline]
    pub fn as_padded(&self) -> &[u8; MAX_KEY_LEN] {
        &self.0
    }

    /// Returns the key bytes without padding.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..self.len()]
    }

    /// Returns the key as text, replacing invalid UTF-8.
    #[inline]
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Length of the key in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_KEY_LEN)
    }

    /// Returns `true` for the empty key.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Zero-fills the buffer.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = [0; MAX_KEY_LEN];
    }
}

impl Default for FixedKey {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for FixedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedKey").field(&self.to_str_lossy()).finish()
    }
}
