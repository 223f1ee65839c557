//! Run diagnostics and the report every engine returns.

use std::collections::BTreeSet;

use canonical::TableId;
use serde::{Deserialize, Serialize};

/// A set of mutually duplicate table ids.
pub type DuplicateGroup = BTreeSet<TableId>;

/// Pair counters for one run.
///
/// A true positive is a candidate pair the matcher accepted; a false positive
/// is a candidate pair it rejected after bucketing put the two tables together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    pub true_positives: u64,
    pub false_positives: u64,
    pub compared_pairs: u64,
}

impl DedupStats {
    pub(crate) fn record(&mut self, accepted: bool) {
        self.compared_pairs += 1;
        if accepted {
            self.true_positives += 1;
        } else {
            self.false_positives += 1;
        }
    }

    /// `tp / (tp + fp)` rounded to three decimals; 0 without true positives.
    pub fn precision(&self) -> f64 {
        if self.true_positives == 0 {
            return 0.0;
        }
        let ratio =
            self.true_positives as f64 / (self.true_positives + self.false_positives) as f64;
        (ratio * 1000.0).round() / 1000.0
    }
}

/// Result of one deduplication run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupReport {
    /// Disjoint duplicate groups, ordered by smallest member.
    pub groups: Vec<DuplicateGroup>,
    pub stats: DedupStats,
    /// Accepted `(low, high)` pairs in comparison order.
    pub accepted_pairs: Vec<(TableId, TableId)>,
    /// Bucketed pairs the matcher rejected, in comparison order.
    pub rejected_pairs: Vec<(TableId, TableId)>,
}

impl DedupReport {
    /// Whether `a` and `b` ended up in the same group.
    pub fn are_duplicates(&self, a: TableId, b: TableId) -> bool {
        self.groups
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
    }

    pub fn group_of(&self, table_id: TableId) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|group| group.contains(&table_id))
    }
}

/// Accepted and rejected pairs of one comparison batch.
#[derive(Debug, Default)]
pub(crate) struct PairOutcomes {
    pub(crate) accepted: Vec<(TableId, TableId)>,
    pub(crate) rejected: Vec<(TableId, TableId)>,
}

impl PairOutcomes {
    pub(crate) fn push(&mut self, pair: (TableId, TableId), accepted: bool) {
        if accepted {
            self.accepted.push(pair);
        } else {
            self.rejected.push(pair);
        }
    }

    pub(crate) fn extend(&mut self, other: PairOutcomes) {
        self.accepted.extend(other.accepted);
        self.rejected.extend(other.rejected);
    }

    pub(crate) fn stats(&self) -> DedupStats {
        let mut stats = DedupStats::default();
        for _ in &self.accepted {
            stats.record(true);
        }
        for _ in &self.rejected {
            stats.record(false);
        }
        stats
    }
}
