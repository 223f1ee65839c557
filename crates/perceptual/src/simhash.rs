//! SimHash over serialized tables.
//!
//! Every weighted shingle votes on each output bit: `+weight` when the
//! shingle's hash has the bit set, `-weight` otherwise. A bit of the result is
//! set iff its vote is positive. Similar inputs share most shingles and end up
//! a small Hamming distance apart.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PerceptualError;
use crate::shingles::{weighted_shingles, SHINGLE_WIDTH};

/// Output width of a SimHash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimHashBits {
    #[serde(rename = "64")]
    Bits64,
    #[serde(rename = "128")]
    Bits128,
}

impl SimHashBits {
    pub fn width(self) -> u32 {
        match self {
            SimHashBits::Bits64 => 64,
            SimHashBits::Bits128 => 128,
        }
    }
}

impl TryFrom<u32> for SimHashBits {
    type Error = PerceptualError;

    fn try_from(width: u32) -> Result<Self, Self::Error> {
        match width {
            64 => Ok(SimHashBits::Bits64),
            128 => Ok(SimHashBits::Bits128),
            other => Err(PerceptualError::UnsupportedWidth(other)),
        }
    }
}

impl fmt::Display for SimHashBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.width())
    }
}

/// Compute a SimHash of `text`. The 64-bit variant uses the low 64 bits of
/// every shingle hash and always fits in the low half of the result.
pub fn simhash(text: &str, bits: SimHashBits) -> u128 {
    let width = bits.width() as usize;
    let mut votes = [0i64; 128];
    for shingle in weighted_shingles(text, SHINGLE_WIDTH) {
        let weight = i64::from(shingle.weight);
        for (bit, vote) in votes.iter_mut().enumerate().take(width) {
            if (shingle.hash >> bit) & 1 == 1 {
                *vote += weight;
            } else {
                *vote -= weight;
            }
        }
    }

    votes
        .iter()
        .take(width)
        .enumerate()
        .filter(|(_, vote)| **vote > 0)
        .fold(0u128, |acc, (bit, _)| acc | (1u128 << bit))
}

/// Number of differing bits between two fingerprints.
#[inline]
pub fn hamming_distance(a: u128, b: u128) -> u32 {
    (a ^ b).count_ones()
}
