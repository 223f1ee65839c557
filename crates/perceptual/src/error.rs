use thiserror::Error;

/// Errors raised while selecting a fingerprint algorithm.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("unknown hash algorithm {0:?}")]
    UnknownAlgorithm(String),
    #[error("unsupported simhash width {0}")]
    UnsupportedWidth(u32),
}
