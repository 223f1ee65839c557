//! Insertion-ordered buckets of table ids.

use std::hash::Hash;

use canonical::TableId;
use hashbrown::HashMap;
use perceptual::TableFingerprint;
use serde::{Deserialize, Serialize};

/// Table ids sharing one bucket key, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket<K> {
    pub key: K,
    pub members: Vec<TableId>,
}

impl<K> Bucket<K> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Unordered pairs `(low, high)` with `low < high`.
    ///
    /// Pairs come out in nested-loop order over the members, outer member
    /// first, so the sequence is stable for a given insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (TableId, TableId)> + '_ {
        self.members.iter().flat_map(move |&low| {
            self.members
                .iter()
                .filter(move |&&high| low < high)
                .map(move |&high| (low, high))
        })
    }

    /// Number of pairs [`Bucket::pairs`] yields.
    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }
}

/// Buckets keyed by `K`, iterated in order of first appearance of each key.
#[derive(Debug, Clone)]
pub struct BucketIndex<K> {
    positions: HashMap<K, usize>,
    buckets: Vec<Bucket<K>>,
}

impl<K> Default for BucketIndex<K> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            buckets: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> BucketIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `table_id` to the bucket for `key`, opening the bucket if needed.
    pub fn insert(&mut self, key: K, table_id: TableId) {
        let position = *self.positions.entry(key).or_insert_with(|| {
            self.buckets.push(Bucket {
                key,
                members: Vec::new(),
            });
            self.buckets.len() - 1
        });
        self.buckets[position].members.push(table_id);
    }

    pub fn bucket(&self, key: K) -> Option<&Bucket<K>> {
        self.positions.get(&key).map(|&position| &self.buckets[position])
    }

    pub fn buckets(&self) -> &[Bucket<K>] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every candidate pair, bucket by bucket.
    pub fn pairs(&self) -> impl Iterator<Item = (TableId, TableId)> + '_ {
        self.buckets.iter().flat_map(Bucket::pairs)
    }

    /// Buckets holding at least two tables; the only ones that yield pairs.
    pub fn candidate_buckets(&self) -> impl Iterator<Item = &Bucket<K>> + '_ {
        self.buckets.iter().filter(|bucket| bucket.len() > 1)
    }
}

impl<K: Copy + Eq + Hash> FromIterator<(K, TableId)> for BucketIndex<K> {
    fn from_iter<I: IntoIterator<Item = (K, TableId)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (key, table_id) in iter {
            index.insert(key, table_id);
        }
        index
    }
}

/// Tables bucketed by the hash of their canonical serialization.
pub type ExactIndex = BucketIndex<u128>;

/// Tables bucketed by column count.
pub type ColumnIndex = BucketIndex<usize>;

impl ExactIndex {
    /// Bucket fingerprints by hash value.
    pub fn from_fingerprints(fingerprints: &[TableFingerprint]) -> Self {
        fingerprints
            .iter()
            .map(|print| (print.hash, print.table_id))
            .collect()
    }
}

impl ColumnIndex {
    /// Bucket tables by the width of their first row. Empty tables share bucket `0`.
    pub fn from_tables<'a, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = &'a canonical::RawTable>,
    {
        tables
            .into_iter()
            .map(|table| (table.column_count(), table.id))
            .collect()
    }
}
