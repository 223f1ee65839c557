//! SimHash fingerprints kept in corpus order, filtered by Hamming distance.

use canonical::TableId;
use perceptual::{hamming_distance, TableFingerprint};

/// Corpus-ordered SimHash fingerprints.
///
/// SimHashes do not bucket exactly, so every unordered pair is a candidate
/// and the Hamming filter is the only pruning step.
#[derive(Debug, Clone, Default)]
pub struct FuzzyIndex {
    entries: Vec<TableFingerprint>,
}

impl FuzzyIndex {
    pub fn new(entries: Vec<TableFingerprint>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs `(low, high)` with `low < high` whose fingerprints differ in at
    /// most `bit_tolerance` bits, in nested-loop corpus order.
    pub fn candidates(&self, bit_tolerance: u32) -> impl Iterator<Item = (TableId, TableId)> + '_ {
        self.entries.iter().flat_map(move |low| {
            self.entries
                .iter()
                .filter(move |high| low.table_id < high.table_id)
                .filter(move |high| hamming_distance(low.hash, high.hash) <= bit_tolerance)
                .map(move |high| (low.table_id, high.table_id))
        })
    }
}

impl FromIterator<TableFingerprint> for FuzzyIndex {
    fn from_iter<I: IntoIterator<Item = TableFingerprint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FuzzyIndex {
        [
            TableFingerprint { table_id: 3, hash: 0b0000 },
            TableFingerprint { table_id: 1, hash: 0b0001 },
            TableFingerprint { table_id: 2, hash: 0b0111 },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn zero_tolerance_keeps_identical_hashes_only() {
        let index = index();
        assert_eq!(index.candidates(0).count(), 0);
        assert_eq!(index.candidates(1).collect::<Vec<_>>(), vec![(1, 3)]);
    }

    #[test]
    fn raising_tolerance_only_adds_pairs() {
        let index = index();
        let mut previous = 0;
        for tolerance in 0..=128 {
            let count = index.candidates(tolerance).count();
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(
            index.candidates(3).collect::<Vec<_>>(),
            vec![(1, 3), (1, 2), (2, 3)]
        );
    }

    #[test]
    fn entries_keep_corpus_order() {
        let index = index();
        let ids: Vec<TableId> = index.entries.iter().map(|entry| entry.table_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(index.entries[2].hash, 0b0111);
        assert_eq!(index.len(), 3);
    }
}
