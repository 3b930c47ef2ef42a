pub mod hash;
pub mod key;
pub mod pool;
pub mod sizing;

pub use hash::{HashStrategy, MURMUR_SEED, UnknownHashStrategy, murmur64a};
pub use key::{FixedKey, MAX_KEY_LEN};
pub use pool::{Entry, EntryId, EntryPool};
pub use sizing::{initial_capacity, is_prime, next_prime, round_to_pow2};
