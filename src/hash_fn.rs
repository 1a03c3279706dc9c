/// Multiplier used by [`GoldenRatio`], `floor(2^32 / φ)`.
pub const GOLDEN_RATIO: u32 = 2_654_435_761;

/// A pure mapping from a key to a 32-bit hash.
///
/// The table reduces the hash modulo its current bucket count on every
/// lookup, so implementations never need to know the capacity and cannot
/// address a bucket out of range. The same key must always produce the same
/// hash for the lifetime of a table.
///
/// Any `Fn(i32) -> u32` closure is a hash function:
///
/// ```rust
/// # use chain_hash::HashTable;
/// #
/// let mut table = HashTable::with_capacity_and_hash_fn(4, |key: i32| key.rem_euclid(4) as u32)
///     .unwrap();
/// table.insert(1, 10);
/// table.insert(5, 50);
/// assert_eq!(table.bucket(1).unwrap().collect::<Vec<_>>(), [(5, 50), (1, 10)]);
/// ```
pub trait HashFunction {
    /// Hashes `key`.
    fn hash(&self, key: i32) -> u32;
}

impl<F> HashFunction for F
where
    F: Fn(i32) -> u32,
{
    #[inline(always)]
    fn hash(&self, key: i32) -> u32 {
        self(key)
    }
}

/// Golden-ratio multiplicative hashing.
///
/// The key's bit pattern is reinterpreted as `u32` (so `-1` hashes as
/// `0xFFFF_FFFF`) and multiplied by [`GOLDEN_RATIO`] with wrapping.
///
/// ```rust
/// # use chain_hash::hash_fn::GoldenRatio;
/// # use chain_hash::hash_fn::HashFunction;
/// #
/// assert_eq!(GoldenRatio.hash(1), 2_654_435_761);
/// assert_eq!(GoldenRatio.hash(-1), 1_640_531_535);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoldenRatio;

impl HashFunction for GoldenRatio {
    #[inline(always)]
    fn hash(&self, key: i32) -> u32 {
        (key as u32).wrapping_mul(GOLDEN_RATIO)
    }
}

#[cfg(feature = "foldhash")]
mod fold {
    use core::hash::BuildHasher;

    use foldhash::fast::FixedState;

    use super::HashFunction;

    /// Seeded hashing backed by `foldhash`.
    ///
    /// Spreads clustered keys better than [`GoldenRatio`](super::GoldenRatio)
    /// when the bucket count shares factors with the key stride.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct FoldHash {
        seed: u64,
    }

    impl FoldHash {
        /// Creates a hash function with a fixed seed.
        pub const fn with_seed(seed: u64) -> Self {
            Self { seed }
        }

        /// Returns the seed.
        pub const fn seed(&self) -> u64 {
            self.seed
        }
    }

    impl HashFunction for FoldHash {
        #[inline]
        fn hash(&self, key: i32) -> u32 {
            let hash = FixedState::with_seed(self.seed).hash_one(key);
            (hash ^ (hash >> 32)) as u32
        }
    }
}

#[cfg(feature = "foldhash")]
pub use fold::FoldHash;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_ratio_wraps() {
        assert_eq!(GoldenRatio.hash(0), 0);
        assert_eq!(GoldenRatio.hash(1), GOLDEN_RATIO);
        assert_eq!(GoldenRatio.hash(2), GOLDEN_RATIO.wrapping_mul(2));
        assert_eq!(GoldenRatio.hash(5) % 16, 5u32.wrapping_mul(GOLDEN_RATIO) % 16);
    }

    #[test]
    fn golden_ratio_negative_keys_use_bit_pattern() {
        assert_eq!(GoldenRatio.hash(-1), 0xFFFF_FFFFu32.wrapping_mul(GOLDEN_RATIO));
        assert_eq!(GoldenRatio.hash(-1), 1_640_531_535);
        assert_eq!(
            GoldenRatio.hash(i32::MIN),
            0x8000_0000u32.wrapping_mul(GOLDEN_RATIO)
        );
    }

    #[test]
    fn closures_are_hash_functions() {
        let modulo = |key: i32| key.rem_euclid(4) as u32;
        assert_eq!(modulo.hash(9), 1);
        assert_eq!(modulo.hash(-3), 1);

        fn takes_hash_fn(h: impl HashFunction) -> u32 {
            h.hash(7)
        }
        assert_eq!(takes_hash_fn(|k: i32| k as u32 * 2), 14);
    }

    #[cfg(feature = "foldhash")]
    #[test]
    fn foldhash_is_deterministic_per_seed() {
        let a = FoldHash::with_seed(17);
        let b = FoldHash::with_seed(17);
        for key in -100..100 {
            assert_eq!(a.hash(key), b.hash(key));
        }
        assert_eq!(a.seed(), 17);

        let other = FoldHash::with_seed(18);
        assert!((0..64).any(|key| a.hash(key) != other.hash(key)));
    }
}
