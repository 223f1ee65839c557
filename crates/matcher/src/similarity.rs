//! Cell similarity functions and the table similarity score.

use std::fmt;
use std::str::FromStr;

use canonical::CanonicalTable;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Similarity of two cell strings, in `[0, 1]`.
pub trait CellSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Jaccard index over the character sets of both cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardSimilarity;

impl CellSimilarity for JaccardSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaccard_index(a, b)
    }
}

/// Edit distance normalized by the longer cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinSimilarity;

impl CellSimilarity for LevenshteinSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        levenshtein_similarity(a, b)
    }
}

/// Which cell similarity the fuzzy engine scores with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityFunction {
    Jaccard,
    #[default]
    Levenshtein,
}

impl SimilarityFunction {
    pub fn scorer(self) -> &'static dyn CellSimilarity {
        match self {
            SimilarityFunction::Jaccard => &JaccardSimilarity,
            SimilarityFunction::Levenshtein => &LevenshteinSimilarity,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityFunction::Jaccard => "jaccard",
            SimilarityFunction::Levenshtein => "levenshtein",
        }
    }
}

impl fmt::Display for SimilarityFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityFunction {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jaccard" => Ok(SimilarityFunction::Jaccard),
            "levenshtein" => Ok(SimilarityFunction::Levenshtein),
            other => Err(MatchError::UnknownSimilarity(other.to_string())),
        }
    }
}

/// `|A ∩ B| / |A ∪ B|` over distinct characters; 0 when both are empty.
pub fn jaccard_index(a: &str, b: &str) -> f64 {
    let left: FxHashSet<char> = a.chars().collect();
    let right: FxHashSet<char> = b.chars().collect();
    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

/// `1 - distance / max(len)` in characters; 1 when both are empty.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(a, b) as f64 / max_len as f64
}

/// Check a similarity threshold lies in `[0, 1]`.
pub fn validate_threshold(threshold: f64) -> Result<f64, MatchError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(MatchError::InvalidThreshold(threshold))
    }
}

/// Mean cell similarity of two canonical tables, aligned position by position.
///
/// Tables of different shape (row count or first-row width) and empty tables
/// score 0. A cell of `a` with no counterpart in `b` scores 0.
pub fn similarity_score(a: &CanonicalTable, b: &CanonicalTable, cells: &dyn CellSimilarity) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.column_count() != b.column_count() || a.row_count() != b.row_count() {
        return 0.0;
    }

    let mut total = 0.0;
    let mut compared = 0usize;
    for (row_idx, row) in a.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            total += b
                .cell(row_idx, col_idx)
                .map_or(0.0, |other| cells.similarity(cell, other));
            compared += 1;
        }
    }
    if compared == 0 {
        return 0.0;
    }
    total / compared as f64
}
