//! Engine configuration and YAML loading.
//!
//! Each engine takes its own config struct; [`DedupConfig`] bundles all three
//! plus the engine to run, and is what the CLI reads from disk.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Table deduplication configuration
//! version: "1.0"
//! engine: exact
//!
//! exact:
//!   serialization: full
//!   hash: simhash-64
//!   grouping: union-find
//!   use_parallel: false
//!
//! hash_join:
//!   duplicate_rows_allowed: true
//!   grouping: union-find
//!
//! fuzzy:
//!   serialization: full
//!   bit_tolerance: 3
//!   similarity: levenshtein
//!   threshold: 0.9
//!   grouping: union-find
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use canonical::Serialization;
use matcher::{SimilarityFunction, validate_threshold};
use perceptual::HashAlgorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DedupError;
use crate::grouping::GroupingStrategy;

/// Widest SimHash the fuzzy engine computes.
pub const MAX_BIT_TOLERANCE: u32 = 128;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Which engine a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    #[default]
    Exact,
    HashJoin,
    Fuzzy,
}

impl EngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Exact => "exact",
            EngineKind::HashJoin => "hash-join",
            EngineKind::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(EngineKind::Exact),
            "hash-join" => Ok(EngineKind::HashJoin),
            "fuzzy" => Ok(EngineKind::Fuzzy),
            other => Err(format!("unknown engine {other:?}")),
        }
    }
}

/// Exact-duplicate engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Projection hashed to bucket tables.
    pub serialization: Serialization,
    /// Bucket hash.
    pub hash: HashAlgorithm,
    pub grouping: GroupingStrategy,
    /// Hash tables and compare buckets on the rayon pool.
    pub use_parallel: bool,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            serialization: Serialization::Full,
            hash: HashAlgorithm::SimHash64,
            grouping: GroupingStrategy::UnionFind,
            use_parallel: false,
        }
    }
}

impl ExactConfig {
    pub fn with_serialization(mut self, serialization: Serialization) -> Self {
        self.serialization = serialization;
        self
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingStrategy) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }
}

/// Super-key hash-join engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashJoinConfig {
    /// When `false`, tables with different row counts never match.
    pub duplicate_rows_allowed: bool,
    pub grouping: GroupingStrategy,
}

impl Default for HashJoinConfig {
    fn default() -> Self {
        Self {
            duplicate_rows_allowed: true,
            grouping: GroupingStrategy::UnionFind,
        }
    }
}

impl HashJoinConfig {
    pub fn with_duplicate_rows_allowed(mut self, allowed: bool) -> Self {
        self.duplicate_rows_allowed = allowed;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingStrategy) -> Self {
        self.grouping = grouping;
        self
    }
}

/// Fuzzy engine settings. Tables are always fingerprinted with SimHash-128.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    pub serialization: Serialization,
    /// Maximum Hamming distance between SimHashes of a candidate pair.
    pub bit_tolerance: u32,
    pub similarity: SimilarityFunction,
    /// Minimum mean cell similarity, in `[0, 1]`.
    pub threshold: f64,
    pub grouping: GroupingStrategy,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            serialization: Serialization::Full,
            bit_tolerance: 3,
            similarity: SimilarityFunction::Levenshtein,
            threshold: 0.9,
            grouping: GroupingStrategy::UnionFind,
        }
    }
}

impl FuzzyConfig {
    pub fn with_serialization(mut self, serialization: Serialization) -> Self {
        self.serialization = serialization;
        self
    }

    pub fn with_bit_tolerance(mut self, bit_tolerance: u32) -> Self {
        self.bit_tolerance = bit_tolerance;
        self
    }

    pub fn with_similarity(mut self, similarity: SimilarityFunction) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingStrategy) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        validate_threshold(self.threshold)
            .map_err(|err| DedupError::InvalidConfig(err.to_string()))?;
        if self.bit_tolerance > MAX_BIT_TOLERANCE {
            return Err(DedupError::InvalidConfig(format!(
                "bit tolerance {} exceeds the {MAX_BIT_TOLERANCE}-bit fingerprint",
                self.bit_tolerance
            )));
        }
        Ok(())
    }
}

/// Top-level configuration: which engine to run and how each is tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub engine: EngineKind,

    #[serde(default)]
    pub exact: ExactConfig,

    #[serde(default)]
    pub hash_join: HashJoinConfig,

    #[serde(default)]
    pub fuzzy: FuzzyConfig,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            engine: EngineKind::default(),
            exact: ExactConfig::default(),
            hash_join: HashJoinConfig::default(),
            fuzzy: FuzzyConfig::default(),
        }
    }
}

impl DedupConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: DedupConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        let validation = |err: DedupError| ConfigLoadError::Validation(err.to_string());
        // Exact and hash-join options are closed enums and flags; only the
        // fuzzy numeric ranges can be out of bounds.
        self.fuzzy.validate().map_err(validation)
    }
}
