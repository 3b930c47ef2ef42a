//! Bucket-count and capacity arithmetic.

/// Returns `true` if `n` is prime (trial division).
///
/// ```
/// use wordtable::ds::sizing::is_prime;
///
/// assert!(is_prime(7019));
/// assert!(!is_prime(4));
/// assert!(!is_prime(1));
/// ```
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut div = 3;
    while div <= n / div {
        if n % div == 0 {
            return false;
        }
        div += 2;
    }
    true
}

/// Smallest prime `>= n`, or `None` if it does not fit in `usize`.
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}

/// Smallest power of two `>= n` (`1` for `0`), or `None` on overflow.
#[inline]
pub fn round_to_pow2(n: usize) -> Option<usize> {
    n.checked_next_power_of_two()
}

/// Initial pool size for `bucket_count` buckets and an expected number of
/// distinct keys: the next power of two of `max(2 * buckets, buckets + hint)`.
pub fn initial_capacity(bucket_count: usize, distinct_hint: usize) -> Option<usize> {
    let floor = bucket_count.checked_mul(2)?;
    let wanted = bucket_count.checked_add(distinct_hint)?;
    round_to_pow2(floor.max(wanted))
}
