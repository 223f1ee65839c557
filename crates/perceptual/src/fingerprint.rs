//! Table fingerprints and hash strategy selection.

use std::fmt;
use std::str::FromStr;

use canonical::{CanonicalTable, TableId, TableSerializer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PerceptualError;
use crate::fnv::fnv1_64;
use crate::simhash::{simhash, SimHashBits};

/// Hashes a serialized table. 64-bit algorithms widen into the low half.
pub trait TableHasher: Send + Sync {
    fn hash(&self, text: &str) -> u128;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1Hasher;

impl TableHasher for Fnv1Hasher {
    fn hash(&self, text: &str) -> u128 {
        u128::from(fnv1_64(text.as_bytes()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimHasher {
    pub bits: SimHashBits,
}

impl TableHasher for SimHasher {
    fn hash(&self, text: &str) -> u128 {
        simhash(text, self.bits)
    }
}

/// Hash algorithm used to bucket tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "fnv1-64")]
    Fnv1_64,
    #[default]
    #[serde(rename = "simhash-64")]
    SimHash64,
    #[serde(rename = "simhash-128")]
    SimHash128,
}

impl HashAlgorithm {
    /// Resolve the hasher implementing this algorithm.
    pub fn hasher(self) -> &'static dyn TableHasher {
        match self {
            HashAlgorithm::Fnv1_64 => &Fnv1Hasher,
            HashAlgorithm::SimHash64 => &SimHasher {
                bits: SimHashBits::Bits64,
            },
            HashAlgorithm::SimHash128 => &SimHasher {
                bits: SimHashBits::Bits128,
            },
        }
    }

    /// True for the locality-sensitive variants.
    pub fn is_similarity_hash(self) -> bool {
        !matches!(self, HashAlgorithm::Fnv1_64)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Fnv1_64 => "fnv1-64",
            HashAlgorithm::SimHash64 => "simhash-64",
            HashAlgorithm::SimHash128 => "simhash-128",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = PerceptualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fnv1-64" => Ok(HashAlgorithm::Fnv1_64),
            "simhash-64" => Ok(HashAlgorithm::SimHash64),
            "simhash-128" => Ok(HashAlgorithm::SimHash128),
            other => Err(PerceptualError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Hash of one table's serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableFingerprint {
    pub table_id: TableId,
    pub hash: u128,
}

/// Serialize and hash a single canonical table.
pub fn fingerprint_table(
    table: &CanonicalTable,
    serializer: &dyn TableSerializer,
    hasher: &dyn TableHasher,
) -> TableFingerprint {
    let text = serializer.serialize(table);
    TableFingerprint {
        table_id: table.id,
        hash: hasher.hash(&text),
    }
}

/// Fingerprint a corpus, keeping input order (parallel if `use_parallel = true`).
pub fn fingerprint_tables(
    tables: &[CanonicalTable],
    serializer: &dyn TableSerializer,
    hasher: &dyn TableHasher,
    use_parallel: bool,
) -> Vec<TableFingerprint> {
    if use_parallel {
        tables
            .par_iter()
            .map(|table| fingerprint_table(table, serializer, hasher))
            .collect()
    } else {
        tables
            .iter()
            .map(|table| fingerprint_table(table, serializer, hasher))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canonical::{canonicalize, RawTable, Serialization};

    fn corpus() -> Vec<CanonicalTable> {
        vec![
            canonicalize(&RawTable::from_rows(1, [["x", "y"], ["y", "x"]])),
            canonicalize(&RawTable::from_rows(2, [["y", "x"], ["x", "y"]])),
            canonicalize(&RawTable::from_rows(3, [["x", "y"], ["x", "z"]])),
        ]
    }

    #[test]
    fn permuted_tables_share_fnv_fingerprint() {
        let tables = corpus();
        let serializer = Serialization::Simple.serializer();
        let prints = fingerprint_tables(&tables, serializer, HashAlgorithm::Fnv1_64.hasher(), false);
        assert_eq!(prints[0].hash, prints[1].hash);
        assert_ne!(prints[0].hash, prints[2].hash);
        assert_eq!(
            prints.iter().map(|p| p.table_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn fnv_fingerprint_is_fnv_of_serialization() {
        let tables = corpus();
        let serializer = Serialization::Simple.serializer();
        let print = fingerprint_table(&tables[0], serializer, &Fnv1Hasher);
        assert_eq!(print.hash, u128::from(fnv1_64(b"x\ty\n")));
    }

    #[test]
    fn parallel_matches_sequential() {
        let tables = corpus();
        let serializer = Serialization::Full.serializer();
        for algorithm in [
            HashAlgorithm::Fnv1_64,
            HashAlgorithm::SimHash64,
            HashAlgorithm::SimHash128,
        ] {
            let hasher = algorithm.hasher();
            assert_eq!(
                fingerprint_tables(&tables, serializer, hasher, false),
                fingerprint_tables(&tables, serializer, hasher, true)
            );
        }
    }

    #[test]
    fn algorithm_names_round_trip() {
        for algorithm in [
            HashAlgorithm::Fnv1_64,
            HashAlgorithm::SimHash64,
            HashAlgorithm::SimHash128,
        ] {
            assert_eq!(algorithm.as_str().parse::<HashAlgorithm>(), Ok(algorithm));
            let json = serde_json::to_string(&algorithm).expect("serialize");
            assert_eq!(json, format!("\"{algorithm}\""));
        }
        assert!(!HashAlgorithm::Fnv1_64.is_similarity_hash());
        assert!(HashAlgorithm::SimHash128.is_similarity_hash());
        assert_eq!(
            "md5".parse::<HashAlgorithm>(),
            Err(PerceptualError::UnknownAlgorithm("md5".into()))
        );
    }
}
