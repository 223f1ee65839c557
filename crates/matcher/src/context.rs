//! Per-run row caches shared by every table-pair comparison of one run.

use std::sync::Arc;

use canonical::{RawRow, RowId, TableId, Token};
use fxhash::FxHashMap;

/// Value → every position it occupies in one row, positions ascending.
///
/// Positions are ordinals in the row's stored column order, not column ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMapping {
    positions: FxHashMap<Token, Vec<usize>>,
}

impl AttributeMapping {
    pub fn from_row(row: &RawRow) -> Self {
        let mut positions: FxHashMap<Token, Vec<usize>> = FxHashMap::default();
        for (position, value) in row.values().enumerate() {
            positions.entry(value.clone()).or_default().push(position);
        }
        Self { positions }
    }

    pub fn positions(&self, value: &str) -> Option<&[usize]> {
        self.positions.get(value).map(Vec::as_slice)
    }

    /// Position of the last occurrence of `value`.
    pub fn last_position(&self, value: &str) -> Option<usize> {
        self.positions.get(value).and_then(|p| p.last().copied())
    }
}

/// Value → number of occurrences in one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeValueCount {
    counts: FxHashMap<Token, u32>,
}

impl AttributeValueCount {
    pub fn from_row(row: &RawRow) -> Self {
        let mut counts: FxHashMap<Token, u32> = FxHashMap::default();
        for value in row.values() {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Occurrences of `value`, 0 when absent.
    pub fn count(&self, value: &str) -> u32 {
        self.counts.get(value).copied().unwrap_or(0)
    }
}

/// State owned by one deduplication run.
///
/// Row profiles are computed on first use and reused by every later
/// comparison touching the same `(table, row)`. A context must not outlive
/// its run: table ids are only unique within one corpus.
#[derive(Debug, Default)]
pub struct RunContext {
    mappings: FxHashMap<(TableId, RowId), Arc<AttributeMapping>>,
    counts: FxHashMap<(TableId, RowId), Arc<AttributeValueCount>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute_mapping(
        &mut self,
        table_id: TableId,
        row_id: RowId,
        row: &RawRow,
    ) -> Arc<AttributeMapping> {
        Arc::clone(
            self.mappings
                .entry((table_id, row_id))
                .or_insert_with(|| Arc::new(AttributeMapping::from_row(row))),
        )
    }

    pub fn value_count(
        &mut self,
        table_id: TableId,
        row_id: RowId,
        row: &RawRow,
    ) -> Arc<AttributeValueCount> {
        Arc::clone(
            self.counts
                .entry((table_id, row_id))
                .or_insert_with(|| Arc::new(AttributeValueCount::from_row(row))),
        )
    }

    /// Drop every cached profile.
    pub fn clear(&mut self) {
        self.mappings.clear();
        self.counts.clear();
    }

    /// Number of rows with a cached attribute mapping.
    pub fn cached_rows(&self) -> usize {
        self.mappings.len()
    }
}
