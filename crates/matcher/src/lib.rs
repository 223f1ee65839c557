//! # Table Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` decides, for one pair of candidate tables, whether they are
//! duplicates. Candidate selection lives in `index`; grouping and run
//! bookkeeping live in the `tabdedup` engines.
//!
//! ## Core Types
//!
//! - [`RunContext`]: per-run caches of row profiles ([`AttributeMapping`],
//!   [`AttributeValueCount`]), keyed by `(table id, row id)`.
//! - [`ColumnCorrespondence`]: the column mapping inferred while rows match,
//!   updated transactionally through [`PendingCorrespondence`].
//! - [`compare_tables`]: row-correspondence matcher over raw tables.
//! - [`compare_keyed_tables`]: the same matcher with rows joined on super-keys.
//! - [`similarity_score`]: mean cell similarity of two canonical tables under a
//!   [`CellSimilarity`] chosen through [`SimilarityFunction`].
//!
//! ## Example Usage
//!
//! ```
//! use canonical::RawTable;
//! use matcher::{compare_tables, RunContext};
//!
//! let mut ctx = RunContext::new();
//! let a = RawTable::from_rows(1, [["x", "y"], ["y", "x"]]);
//! let b = RawTable::from_rows(2, [["y", "x"], ["x", "y"]]);
//! let c = RawTable::from_rows(3, [["x", "y"], ["x", "z"]]);
//! assert!(compare_tables(&mut ctx, &a, &b));
//! assert!(!compare_tables(&mut ctx, &a, &c));
//! ```

mod context;
mod correspondence;
mod error;
mod hash_join;
mod row_match;
mod similarity;

pub use crate::context::{AttributeMapping, AttributeValueCount, RunContext};
pub use crate::correspondence::{ColumnCorrespondence, CorrespondenceDelta, PendingCorrespondence};
pub use crate::error::MatchError;
pub use crate::hash_join::compare_keyed_tables;
pub use crate::row_match::{compare_tables, correspond, AllRows, CandidateRows};
pub use crate::similarity::{
    jaccard_index, levenshtein_similarity, similarity_score, validate_threshold, CellSimilarity,
    JaccardSimilarity, LevenshteinSimilarity, SimilarityFunction,
};
