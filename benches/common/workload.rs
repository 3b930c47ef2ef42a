//! Word stream generators for table benchmarks.
//!
//! Real text follows Zipf's law, so word ranks are drawn from a Zipf
//! distribution and mapped to distinct synthetic words.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Zipf};

/// Distinct word for a zero-based rank (bijective base-26, `a`, `b`, ..,
/// `z`, `aa`, ..). Low ranks get short words, like real vocabularies.
pub fn word_for_rank(rank: u64) -> String {
    let mut n = rank + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// `len` words drawn from a vocabulary of `vocabulary` ranks with exponent
/// `s` (1.0 for natural-language text).
pub fn zipf_words(vocabulary: u64, len: usize, s: f64, seed: u64) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let zipf = Zipf::new(vocabulary as f64, s).unwrap();
    (0..len)
        .map(|_| {
            let sample: f64 = zipf.sample(&mut rng);
            let rank = (sample as u64).saturating_sub(1).min(vocabulary - 1);
            word_for_rank(rank)
        })
        .collect()
}

/// Every word of the vocabulary exactly once.
pub fn vocabulary(size: u64) -> Vec<String> {
    (0..size).map(word_for_rank).collect()
}
