//! # Table fingerprints
//!
//! Hashes over serialized canonical tables, used to bucket candidate
//! duplicates before any expensive comparison.
//!
//! ## Contract
//!
//! - Input is the string produced by a [`canonical::TableSerializer`]; this
//!   crate never canonicalizes or serializes on its own.
//! - Every function is pure: same text, same algorithm, same bits.
//!
//! ## Algorithms
//!
//! 1.  **FNV-1 64** ([`fnv1_64`]): exact-identity hash. Any difference in the
//!     serialized text almost surely changes the hash.
//! 2.  **SimHash 64/128** ([`simhash`]): locality-sensitive hash over
//!     character shingles. The Hamming distance between two SimHashes
//!     ([`hamming_distance`]) approximates how dissimilar the inputs are.
//!
//! All hashes are widened to `u128` so every algorithm shares one bucket key type.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::{canonicalize, RawTable, Serialization};
//! use perceptual::{fingerprint_table, HashAlgorithm};
//!
//! let table = canonicalize(&RawTable::from_rows(1, [["x", "y"]]));
//! let print = fingerprint_table(
//!     &table,
//!     Serialization::Simple.serializer(),
//!     HashAlgorithm::Fnv1_64.hasher(),
//! );
//! assert_eq!(print.table_id, 1);
//! ```

mod error;
mod fingerprint;
mod fnv;
mod shingles;
mod simhash;

pub use crate::error::PerceptualError;
pub use crate::fingerprint::{
    fingerprint_table, fingerprint_tables, Fnv1Hasher, HashAlgorithm, SimHasher, TableFingerprint,
    TableHasher,
};
pub use crate::fnv::{fnv1_64, FNV1_64_INIT, FNV_64_PRIME};
pub use crate::shingles::{weighted_shingles, WeightedShingle, SHINGLE_WIDTH};
pub use crate::simhash::{hamming_distance, simhash, SimHashBits};
