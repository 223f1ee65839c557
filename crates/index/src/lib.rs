//! # Table Index
//!
//! Candidate selection for table deduplication. Nothing here decides whether
//! two tables are duplicates; the indexes only bound which pairs (or rows) the
//! matchers in `matcher` have to look at.
//!
//! ## Indexes
//!
//! - [`ExactIndex`]: table ids bucketed by the `u128` hash of their canonical
//!   serialization. Buckets iterate in order of first appearance.
//! - [`ColumnIndex`]: table ids bucketed by column count, used by the
//!   super-key hash-join path where no table-level hash exists.
//! - [`FuzzyIndex`]: corpus-ordered SimHashes with a Hamming-distance filter.
//! - [`SuperKeyIndex`]: row-level join index, super-key → row ids.
//!
//! ## Example Usage
//!
//! ```
//! use index::ExactIndex;
//! use perceptual::TableFingerprint;
//!
//! let index = ExactIndex::from_fingerprints(&[
//!     TableFingerprint { table_id: 1, hash: 9 },
//!     TableFingerprint { table_id: 2, hash: 9 },
//! ]);
//! assert_eq!(index.pairs().collect::<Vec<_>>(), vec![(1, 2)]);
//! ```

mod bucket;
mod fuzzy;
mod superkey;

pub use crate::bucket::{Bucket, BucketIndex, ColumnIndex, ExactIndex};
pub use crate::fuzzy::FuzzyIndex;
pub use crate::superkey::SuperKeyIndex;
