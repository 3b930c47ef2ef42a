//! Key hash strategies.
//!
//! [`HashStrategy::Murmur`] is the production hash: MurmurHash64A over the
//! whole 64-byte padded key buffer. The remaining strategies are deliberately
//! weak reference hashes kept for comparing bucket-size distributions and
//! throughput (see the `histogram` subcommand of `wordcmp` and the `hashing`
//! bench). They are a closed set picked at construction time, not a plugin
//! point.
//!
//! | Strategy    | Input           | Definition                               |
//! |-------------|-----------------|------------------------------------------|
//! | `Murmur`    | padded buffer   | MurmurHash64A, fixed seed                |
//! | `AlwaysOne` | -               | `1`                                      |
//! | `FirstByte` | key bytes       | first byte, `0` for the empty key        |
//! | `Length`    | key bytes       | key length                               |
//! | `SumBytes`  | key bytes       | wrapping sum of bytes                    |
//! | `RorXor`    | key bytes       | `h = ror(h, 1) ^ b`                      |
//! | `RolXor`    | key bytes       | `h = rol(h, 1) ^ b`                      |
//! | `Fx`        | key bytes       | `rustc_hash::FxHasher`                   |

use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;

use rustc_hash::FxHasher;

use crate::ds::key::FixedKey;

const MURMUR_MULT: u64 = 0xC6A4_A793_5BD1_E995;
const MURMUR_SHIFT: u32 = 47;
/// Seed for the production hash.
pub const MURMUR_SEED: u64 = 0x8B72_E9FB_7FAA_60FD;

/// MurmurHash64A of `data` with `seed`.
///
/// ```
/// use wordtable::ds::hash::{murmur64a, MURMUR_SEED};
///
/// assert_eq!(murmur64a(b"word", MURMUR_SEED), murmur64a(b"word", MURMUR_SEED));
/// assert_ne!(murmur64a(b"word", MURMUR_SEED), murmur64a(b"ward", MURMUR_SEED));
/// ```
#[inline]
pub fn murmur64a(data: &[u8], seed: u64) -> u64 {
    let mut hash = seed ^ (data.len() as u64).wrapping_mul(MURMUR_MULT);

    let mut blocks = data.chunks_exact(8);
    for block in &mut blocks {
        let mut k = u64::from_le_bytes([
            block[0], block[1], block[2], block[3], block[4], block[5], block[6], block[7],
        ]);
        k = k.wrapping_mul(MURMUR_MULT);
        k ^= k >> MURMUR_SHIFT;
        k = k.wrapping_mul(MURMUR_MULT);

        hash ^= k;
        hash = hash.wrapping_mul(MURMUR_MULT);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, &byte) in tail.iter().enumerate() {
            hash ^= u64::from(byte) << (8 * i);
        }
        hash = hash.wrapping_mul(MURMUR_MULT);
    }

    hash ^= hash >> MURMUR_SHIFT;
    hash = hash.wrapping_mul(MURMUR_MULT);
    hash ^= hash >> MURMUR_SHIFT;
    hash
}

/// Hash function used to map keys to buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashStrategy {
    /// MurmurHash64A over the padded key buffer.
    #[default]
    Murmur,
    AlwaysOne,
    FirstByte,
    Length,
    SumBytes,
    RorXor,
    RolXor,
    /// `rustc_hash::FxHasher`, an ecosystem baseline.
    Fx,
}

impl HashStrategy {
    /// Every strategy, production hash first.
    pub const ALL: [HashStrategy; 8] = [
        HashStrategy::Murmur,
        HashStrategy::AlwaysOne,
        HashStrategy::FirstByte,
        HashStrategy::Length,
        HashStrategy::SumBytes,
        HashStrategy::RorXor,
        HashStrategy::RolXor,
        HashStrategy::Fx,
    ];

    /// Stable, kebab-case name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            HashStrategy::Murmur => "murmur",
            HashStrategy::AlwaysOne => "always-one",
            HashStrategy::FirstByte => "first-byte",
            HashStrategy::Length => "length",
            HashStrategy::SumBytes => "sum-bytes",
            HashStrategy::RorXor => "ror-xor",
            HashStrategy::RolXor => "rol-xor",
            HashStrategy::Fx => "fx",
        }
    }

    /// Hashes raw key bytes.
    ///
    /// For `Murmur` the table always passes the padded buffer, so the length
    /// term is the constant [`MAX_KEY_LEN`](crate::ds::key::MAX_KEY_LEN).
    #[inline]
    pub fn hash_bytes(self, bytes: &[u8]) -> u64 {
        match self {
            HashStrategy::Murmur => murmur64a(bytes, MURMUR_SEED),
            HashStrategy::AlwaysOne => 1,
            HashStrategy::FirstByte => bytes.first().copied().map_or(0, u64::from),
            HashStrategy::Length => bytes.len() as u64,
            HashStrategy::SumBytes => bytes
                .iter()
                .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b))),
            HashStrategy::RorXor => bytes
                .iter()
                .fold(0u64, |acc, &b| acc.rotate_right(1) ^ u64::from(b)),
            HashStrategy::RolXor => bytes
                .iter()
                .fold(0u64, |acc, &b| acc.rotate_left(1) ^ u64::from(b)),
            HashStrategy::Fx => {
                let mut hasher = FxHasher::default();
                hasher.write(bytes);
                hasher.finish()
            },
        }
    }

    /// Hashes a stored key.
    #[inline]
    pub fn hash_key(self, key: &FixedKey) -> u64 {
        match self {
            HashStrategy::Murmur => murmur64a(key.as_padded(), MURMUR_SEED),
            other => other.hash_bytes(key.as_bytes()),
        }
    }
}

impl fmt::Display for HashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHashStrategy(String);

impl UnknownHashStrategy {
    /// Returns the name that failed to parse.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownHashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hash strategy '{}', expected one of: ", self.0)?;
        for (i, strategy) in HashStrategy::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(strategy.name())?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownHashStrategy {}

impl FromStr for HashStrategy {
    type Err = UnknownHashStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        HashStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == normalized)
            .ok_or_else(|| UnknownHashStrategy(s.to_string()))
    }
}
