//! Row-correspondence matching between two tables.
//!
//! The table with fewer rows (S) is walked row by row. Each S-row is tried
//! against every candidate row of the other table (B); a B-row matches when
//! its values can be consumed from the S-row's value counts while staying
//! consistent with the column correspondence built from earlier matches.
//! Matching never stops at the first hit, so both sides accumulate coverage.
//!
//! The search is greedy and order-dependent: an early accepted row can
//! commit a correspondence that rules out a later, better one.

use canonical::{RawRow, RawTable, RowId};
use fxhash::{FxHashMap, FxHashSet};

use crate::context::{AttributeMapping, AttributeValueCount, RunContext};
use crate::correspondence::{ColumnCorrespondence, PendingCorrespondence};

/// Supplies the B-rows an S-row is compared against.
pub trait CandidateRows {
    /// Candidate B-row ids for `small_row`. `None` rejects the table pair.
    fn candidates(&self, small_row: RowId) -> Option<&[RowId]>;
}

/// Every row of the bigger table is a candidate.
#[derive(Debug, Clone)]
pub struct AllRows {
    rows: Vec<RowId>,
}

impl AllRows {
    pub fn of(table: &RawTable) -> Self {
        Self {
            rows: table.row_ids().collect(),
        }
    }
}

impl CandidateRows for AllRows {
    fn candidates(&self, _small_row: RowId) -> Option<&[RowId]> {
        Some(&self.rows)
    }
}

/// Order a pair as `(smaller, bigger)` by `rows`; ties keep `t1` as the smaller.
pub(crate) fn split_by_rows<'a, T>(
    t1: &'a T,
    t2: &'a T,
    rows: impl Fn(&T) -> usize,
) -> (&'a T, &'a T) {
    if rows(t1) > rows(t2) {
        (t2, t1)
    } else {
        (t1, t2)
    }
}

/// Decide whether two raw tables are duplicates up to row order, column
/// order and row repetition.
///
/// Empty tables and tables whose first rows differ in width never match.
///
/// ```
/// use canonical::RawTable;
/// use matcher::{compare_tables, RunContext};
///
/// let a = RawTable::from_rows(1, [["x", "y"], ["z", "w"]]);
/// let b = RawTable::from_rows(2, [["w", "z"], ["y", "x"], ["y", "x"]]);
/// assert!(compare_tables(&mut RunContext::new(), &a, &b));
/// ```
pub fn compare_tables(ctx: &mut RunContext, t1: &RawTable, t2: &RawTable) -> bool {
    if t1.is_empty() || t2.is_empty() {
        return false;
    }
    if t1.column_count() != t2.column_count() {
        return false;
    }
    let (small, big) = split_by_rows(t1, t2, RawTable::row_count);
    correspond(ctx, small, big, &AllRows::of(big))
}

/// Core row-correspondence search over a prepared `(small, big)` pair.
pub fn correspond(
    ctx: &mut RunContext,
    small: &RawTable,
    big: &RawTable,
    candidates: &dyn CandidateRows,
) -> bool {
    let min_rows = small.row_count().min(big.row_count());
    if min_rows == 0 {
        return false;
    }

    let mut correspondence = ColumnCorrespondence::new();
    let mut matched_rows = 0usize;
    let mut small_covered: FxHashSet<RowId> = FxHashSet::default();
    let mut big_covered: FxHashSet<RowId> = FxHashSet::default();
    let mut consumed: FxHashMap<&str, u32> = FxHashMap::default();

    for (small_id, small_row) in small.rows() {
        let Some(big_ids) = candidates.candidates(small_id) else {
            return false;
        };
        let small_mapping = ctx.attribute_mapping(small.id, small_id, small_row);
        let small_counts = ctx.value_count(small.id, small_id, small_row);

        for &big_id in big_ids {
            let Some(big_row) = big.row(big_id) else {
                continue;
            };
            if big_row.is_empty() {
                continue;
            }
            let big_mapping = ctx.attribute_mapping(big.id, big_id, big_row);

            consumed.clear();
            let mut pending = correspondence.begin();
            let fits = row_fits(
                big_row,
                &big_mapping,
                &small_mapping,
                &small_counts,
                &mut consumed,
                &mut pending,
            );
            if fits {
                let delta = pending.into_delta();
                correspondence.commit(delta);
                matched_rows += 1;
                small_covered.insert(small_id);
                big_covered.insert(big_id);
            }
        }
    }

    matched_rows >= min_rows
        && small_covered.len() == small.row_count()
        && big_covered.len() == big.row_count()
}

/// Walk `big_row` in stored order, consuming values of the S-row.
fn row_fits<'r>(
    big_row: &'r RawRow,
    big_mapping: &AttributeMapping,
    small_mapping: &AttributeMapping,
    small_counts: &AttributeValueCount,
    consumed: &mut FxHashMap<&'r str, u32>,
    pending: &mut PendingCorrespondence<'_>,
) -> bool {
    for value in big_row.values() {
        let used = consumed.entry(value.as_str()).or_insert(0);
        if *used >= small_counts.count(value) {
            return false;
        }
        *used += 1;

        // Repeated B values all constrain the column of their last occurrence.
        let (Some(big_column), Some(small_columns)) =
            (big_mapping.last_position(value), small_mapping.positions(value))
        else {
            return false;
        };
        if !pending.constrain(big_column, small_columns) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(t1: &RawTable, t2: &RawTable) -> bool {
        compare_tables(&mut RunContext::new(), t1, t2)
    }

    #[test]
    fn permuted_rows_and_columns_match() {
        let a = RawTable::from_rows(1, [["1", "alice", "berlin"], ["2", "bob", "paris"]]);
        let b = RawTable::from_rows(2, [["paris", "2", "bob"], ["berlin", "1", "alice"]]);
        assert!(compare(&a, &b));
        assert!(compare(&b, &a));
    }

    #[test]
    fn repeated_rows_are_tolerated() {
        let a = RawTable::from_rows(1, [["x", "y"], ["u", "v"]]);
        let b = RawTable::from_rows(2, [["y", "x"], ["v", "u"], ["y", "x"], ["v", "u"]]);
        assert!(compare(&a, &b));
    }

    #[test]
    fn uncovered_big_row_rejects() {
        let a = RawTable::from_rows(1, [["x", "y"], ["u", "v"]]);
        let b = RawTable::from_rows(2, [["x", "y"], ["u", "v"], ["p", "q"]]);
        assert!(!compare(&a, &b));
    }

    #[test]
    fn differing_cell_rejects() {
        let a = RawTable::from_rows(1, [["x", "y"], ["y", "x"]]);
        let c = RawTable::from_rows(3, [["x", "y"], ["x", "z"]]);
        assert!(!compare(&a, &c));
    }

    #[test]
    fn inconsistent_column_mapping_rejects() {
        // Same row multisets, but the second row swaps which column holds which value.
        let a = RawTable::from_rows(1, [["a", "b"], ["c", "d"]]);
        let b = RawTable::from_rows(2, [["a", "b"], ["d", "c"]]);
        assert!(!compare(&a, &b));
    }

    #[test]
    fn greedy_commit_can_miss_a_valid_relabelling() {
        use canonical::canonicalize;

        // `b` is `a` with columns 0 and 1 swapped, rows reordered and one row
        // repeated. The first fitting row pins a column mapping that a later
        // row cannot satisfy, so the pair is rejected.
        let a = RawTable::from_rows(
            1,
            [["0", "0", "1"], ["1", "0", "0"], ["0", "1", "1"], ["0", "0", "0"]],
        );
        let b = RawTable::from_rows(
            2,
            [
                ["0", "0", "0"],
                ["1", "0", "1"],
                ["0", "1", "0"],
                ["0", "0", "0"],
                ["0", "0", "1"],
            ],
        );
        assert_eq!(canonicalize(&a).rows(), canonicalize(&b).rows());
        assert!(!compare(&a, &b));
        assert!(!compare(&b, &a));
    }

    #[test]
    fn repeated_values_within_a_row() {
        let a = RawTable::from_rows(1, [["a", "a", "b"]]);
        let b = RawTable::from_rows(2, [["b", "a", "a"]]);
        let c = RawTable::from_rows(3, [["b", "b", "a"]]);
        assert!(compare(&a, &b));
        assert!(!compare(&a, &c));
    }

    #[test]
    fn empty_and_mismatched_width_tables_never_match() {
        let empty = RawTable::new(1);
        let wide = RawTable::from_rows(2, [["a", "b", "c"]]);
        let narrow = RawTable::from_rows(3, [["a", "b"]]);
        assert!(!compare(&empty, &empty.clone()));
        assert!(!compare(&empty, &narrow));
        assert!(!compare(&wide, &narrow));
    }

    #[test]
    fn context_caches_rows_of_both_tables() {
        let mut ctx = RunContext::new();
        let a = RawTable::from_rows(1, [["x", "y"], ["u", "v"]]);
        let b = RawTable::from_rows(2, [["y", "x"], ["v", "u"]]);
        assert!(compare_tables(&mut ctx, &a, &b));
        assert_eq!(ctx.cached_rows(), 4);
        // Reusing the warm context gives the same verdict.
        assert!(compare_tables(&mut ctx, &a, &b));
    }

    #[test]
    fn ties_keep_first_table_as_smaller() {
        let a = RawTable::from_rows(1, [["a"]]);
        let b = RawTable::from_rows(2, [["b"]]);
        let (small, big) = split_by_rows(&a, &b, RawTable::row_count);
        assert_eq!((small.id, big.id), (1, 2));
    }
}
