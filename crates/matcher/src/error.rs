use thiserror::Error;

/// Errors raised while configuring a pairwise comparison.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("similarity threshold {0} is not between 0 and 1 (inclusive)")]
    InvalidThreshold(f64),
    #[error("unknown similarity function {0:?}")]
    UnknownSimilarity(String),
}
