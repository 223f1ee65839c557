//! Row-level hash-join index over super-keys.

use canonical::{KeyedTable, RowId, SuperKey};
use hashbrown::HashMap;

/// Super-key → row ids of one table holding that key, in row-id order.
#[derive(Debug, Clone, Default)]
pub struct SuperKeyIndex {
    rows: HashMap<SuperKey, Vec<RowId>>,
}

impl SuperKeyIndex {
    pub fn build(table: &KeyedTable) -> Self {
        let mut rows: HashMap<SuperKey, Vec<RowId>> = HashMap::new();
        for (row_id, key) in table.super_keys() {
            rows.entry(key).or_default().push(row_id);
        }
        Self { rows }
    }

    /// Rows sharing `key`, or `None` when no row carries it.
    pub fn rows(&self, key: SuperKey) -> Option<&[RowId]> {
        self.rows.get(&key).map(Vec::as_slice)
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.rows.len()
    }
}
