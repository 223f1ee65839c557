//! Character shingling for SimHash.
//!
//! Text is lowercased and reduced to alphanumeric and `_` characters, then cut
//! into overlapping windows of [`SHINGLE_WIDTH`] characters. Each distinct
//! shingle is hashed to 128 bits and weighted by how often it occurs. Text
//! shorter than the window yields a single shingle; empty text yields none.

use xxhash_rust::xxh3::xxh3_128;

/// Shingle width in characters.
pub const SHINGLE_WIDTH: usize = 4;

/// A hashed shingle and its multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedShingle {
    pub hash: u128,
    pub weight: u32,
}

/// Compute weighted shingles, sorted by hash.
pub fn weighted_shingles(text: &str, width: usize) -> Vec<WeightedShingle> {
    let chars: Vec<char> = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let width = width.max(1);
    let windows = chars.len().saturating_sub(width) + 1;
    let mut buf = String::with_capacity(width * 4);
    let mut hashes: Vec<u128> = Vec::with_capacity(windows);
    for start in 0..windows {
        let end = (start + width).min(chars.len());
        buf.clear();
        buf.extend(&chars[start..end]);
        hashes.push(xxh3_128(buf.as_bytes()));
    }
    hashes.sort_unstable();

    // Equal hashes are adjacent; fold each run into one weighted shingle.
    let mut out: Vec<WeightedShingle> = Vec::with_capacity(hashes.len());
    for hash in hashes {
        match out.last_mut() {
            Some(last) if last.hash == hash => last.weight += 1,
            _ => out.push(WeightedShingle { hash, weight: 1 }),
        }
    }
    out
}
