use canonical::{CanonicalError, TableId};
use matcher::MatchError;
use perceptual::PerceptualError;
use thiserror::Error;

/// Errors surfaced by a deduplication run.
///
/// Every variant is raised before any pair is compared; a run either fails
/// up front or returns a complete report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DedupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("table id {0} appears more than once in the corpus")]
    DuplicateTableId(TableId),
    #[error(transparent)]
    Canonical(#[from] CanonicalError),
    #[error(transparent)]
    Perceptual(#[from] PerceptualError),
    #[error(transparent)]
    Match(#[from] MatchError),
}
