//! Table types shared by every deduplication stage.
//!
//! A [`RawTable`] is the shape tables arrive in from the retrieval
//! collaborator: row id → column id → [`Token`]. Ids only locate a cell; they
//! carry no meaning of their own. A [`CanonicalTable`] is the
//! order-independent form produced by [`canonicalize`](crate::canonicalize).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque cell value. Equality is exact string equality.
pub type Token = String;

/// Identifier of a table inside a corpus.
pub type TableId = u64;

/// Identifier of a row inside one table.
pub type RowId = u32;

/// Identifier of a column inside one row.
pub type ColumnId = u32;

/// One row of a raw table, keyed by column id.
pub type RawRow = BTreeMap<ColumnId, Token>;

/// A table as supplied by the retrieval collaborator.
///
/// Rows and cells iterate in id order, which gives the stable (but otherwise
/// arbitrary) order the matcher walks them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub id: TableId,
    #[serde(default)]
    rows: BTreeMap<RowId, RawRow>,
}

impl RawTable {
    /// Create an empty table.
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            rows: BTreeMap::new(),
        }
    }

    /// Build a table from positional rows, assigning dense row and column ids.
    ///
    /// ```
    /// use canonical::RawTable;
    ///
    /// let table = RawTable::from_rows(7, [["x", "y"], ["y", "x"]]);
    /// assert_eq!(table.row_count(), 2);
    /// assert_eq!(table.column_count(), 2);
    /// ```
    pub fn from_rows<R, C>(id: TableId, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<Token>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(row_id, cells)| {
                let row: RawRow = cells
                    .into_iter()
                    .enumerate()
                    .map(|(col_id, value)| (col_id as ColumnId, value.into()))
                    .collect();
                (row_id as RowId, row)
            })
            .collect();
        Self { id, rows }
    }

    /// Insert or overwrite a single cell.
    pub fn insert_cell(&mut self, row_id: RowId, column_id: ColumnId, value: impl Into<Token>) {
        self.rows
            .entry(row_id)
            .or_default()
            .insert(column_id, value.into());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of cells in the first row, or 0 for an empty table.
    pub fn column_count(&self) -> usize {
        self.rows.values().next().map_or(0, |row| row.len())
    }

    pub fn row(&self, row_id: RowId) -> Option<&RawRow> {
        self.rows.get(&row_id)
    }

    pub fn contains_row(&self, row_id: RowId) -> bool {
        self.rows.contains_key(&row_id)
    }

    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.keys().copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (RowId, &RawRow)> + '_ {
        self.rows.iter().map(|(id, row)| (*id, row))
    }
}

impl From<&CanonicalTable> for RawTable {
    fn from(table: &CanonicalTable) -> Self {
        RawTable::from_rows(table.id, table.rows().iter().map(|row| row.iter().cloned()))
    }
}

/// Order-independent form of a [`RawTable`].
///
/// Each row holds its values in lexicographic order, rows are sorted and
/// consecutive duplicates removed. Positions `0..R` and `0..C` are the only
/// indices that survive; original row and column ids are gone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub id: TableId,
    rows: Vec<Vec<Token>>,
}

impl CanonicalTable {
    pub(crate) fn from_sorted_rows(id: TableId, rows: Vec<Vec<Token>>) -> Self {
        Self { id, rows }
    }

    pub fn rows(&self) -> &[Vec<Token>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of cells in the first row, or 0 for an empty table.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Widest row. Canonical rows may be ragged when the raw rows were.
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_assigns_dense_ids() {
        let table = RawTable::from_rows(3, [vec!["a", "b", "c"], vec!["d", "e", "f"]]);
        assert_eq!(table.id, 3);
        assert_eq!(table.row_ids().collect::<Vec<_>>(), vec![0, 1]);
        let row = table.row(1).expect("row 1");
        assert_eq!(row.get(&2).map(String::as_str), Some("f"));
    }

    #[test]
    fn column_count_uses_first_row() {
        let mut table = RawTable::new(1);
        assert_eq!(table.column_count(), 0);
        table.insert_cell(5, 0, "x");
        table.insert_cell(5, 1, "y");
        table.insert_cell(9, 0, "z");
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn raw_table_json_shape() {
        let table = RawTable::from_rows(1, [["a", "b"]]);
        let json = serde_json::to_string(&table).expect("serialize");
        assert_eq!(json, r#"{"id":1,"rows":{"0":{"0":"a","1":"b"}}}"#);
        let back: RawTable = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, table);
    }
}
