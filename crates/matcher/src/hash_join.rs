//! Super-key hash-join matching.
//!
//! Same acceptance rule as [`compare_tables`](crate::compare_tables), but an
//! S-row is only tried against B-rows carrying the same super-key. An S-row
//! whose key no B-row carries rejects the pair outright.

use canonical::{KeyedTable, RowId};
use index::SuperKeyIndex;

use crate::context::RunContext;
use crate::row_match::{correspond, split_by_rows, CandidateRows};

/// Candidate rows joined on super-key equality.
struct SuperKeyJoin<'a> {
    small: &'a KeyedTable,
    big_index: SuperKeyIndex,
}

impl CandidateRows for SuperKeyJoin<'_> {
    fn candidates(&self, small_row: RowId) -> Option<&[RowId]> {
        let key = self.small.super_key(small_row)?;
        self.big_index.rows(key)
    }
}

/// Decide whether two keyed tables are duplicates.
///
/// With `duplicate_rows_allowed = false`, tables with different row counts
/// are rejected before any row is compared. Widths are not checked here;
/// callers bucket by column count first.
pub fn compare_keyed_tables(
    ctx: &mut RunContext,
    t1: &KeyedTable,
    t2: &KeyedTable,
    duplicate_rows_allowed: bool,
) -> bool {
    if !duplicate_rows_allowed && t1.row_count() != t2.row_count() {
        return false;
    }
    if t1.row_count() == 0 || t2.row_count() == 0 {
        return false;
    }
    let (small, big) = split_by_rows(t1, t2, KeyedTable::row_count);
    let join = SuperKeyJoin {
        small,
        big_index: SuperKeyIndex::build(big),
    };
    correspond(ctx, small.table(), big.table(), &join)
}
