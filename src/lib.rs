#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Error type shared by every fallible table operation.
pub mod error;

/// Pluggable hash functions.
///
/// This module provides the `HashFunction` trait along with the default
/// golden-ratio multiplicative hash.
pub mod hash_fn;

/// The chained hash table and its iterators.
pub mod hash_table;

pub use error::TableError;
pub use hash_fn::GoldenRatio;
pub use hash_fn::HashFunction;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        pub use hash_fn::FoldHash;
    }
}

cfg_if::cfg_if! {
    if #[cfg(any(test, feature = "stats"))] {
        pub use hash_table::ChainHistogram;
        pub use hash_table::ChainStats;
    }
}
