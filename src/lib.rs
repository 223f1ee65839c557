//! Exact and near-duplicate detection for relational tables.
//!
//! A table is a bag of rows; a row is a bag of attribute values. Two tables
//! are duplicates when some row and column relabelling makes their content
//! coincide. This crate finds every group of such tables in a corpus with one
//! of three engines:
//!
//! - [`ExactDeduplicator`]: canonicalize, fingerprint (FNV-1 or SimHash),
//!   bucket by fingerprint, and confirm candidates with the row-correspondence
//!   matcher.
//! - [`HashJoinDeduplicator`]: bucket by column count and join rows on
//!   externally supplied super-keys before matching.
//! - [`FuzzyDeduplicator`]: SimHash-128 Hamming filter followed by a mean
//!   cell-similarity score compared against a threshold.
//!
//! Every run returns a [`DedupReport`] carrying the duplicate groups and the
//! true/false-positive diagnostics of the candidate-generation stage.
//!
//! ```
//! use tabdedup::{ExactConfig, RawTable, deduplicate_exact};
//!
//! let tables = [
//!     RawTable::from_rows(1, [["x", "y"], ["u", "v"]]),
//!     RawTable::from_rows(2, [["v", "u"], ["y", "x"]]),
//!     RawTable::from_rows(3, [["x", "q"], ["u", "v"]]),
//! ];
//! let report = deduplicate_exact(&tables, &ExactConfig::default()).unwrap();
//! assert!(report.are_duplicates(1, 2));
//! assert!(report.group_of(3).is_none());
//! ```

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod metrics;
pub mod stats;

pub use canonical::{
    CanonicalTable, KeyedTable, RawTable, RowId, Serialization, SuperKey, TableId, Token,
    canonicalize,
};
pub use matcher::SimilarityFunction;
pub use perceptual::HashAlgorithm;

pub use crate::config::{
    ConfigLoadError, DedupConfig, EngineKind, ExactConfig, FuzzyConfig, HashJoinConfig,
    MAX_BIT_TOLERANCE,
};
pub use crate::corpus::{Corpus, CorpusError, CorpusTable};
pub use crate::engine::{
    Deduplicator, ExactDeduplicator, FuzzyDeduplicator, HashJoinDeduplicator,
};
pub use crate::error::DedupError;
pub use crate::grouping::{GroupingStrategy, group_pairs};
pub use crate::metrics::{DedupMetrics, DedupStage};
pub use crate::stats::{DedupReport, DedupStats, DuplicateGroup};

/// Run the exact engine once over `tables`.
pub fn deduplicate_exact(
    tables: &[RawTable],
    config: &ExactConfig,
) -> Result<DedupReport, DedupError> {
    ExactDeduplicator::new(config.clone()).deduplicate(tables)
}

/// Run the super-key hash-join engine once over `tables`.
pub fn deduplicate_hash_join(
    tables: &[KeyedTable],
    config: &HashJoinConfig,
) -> Result<DedupReport, DedupError> {
    HashJoinDeduplicator::new(config.clone()).deduplicate(tables)
}

/// Run the fuzzy engine once over `tables`.
pub fn deduplicate_fuzzy(
    tables: &[RawTable],
    config: &FuzzyConfig,
) -> Result<DedupReport, DedupError> {
    FuzzyDeduplicator::new(config.clone()).deduplicate(tables)
}
