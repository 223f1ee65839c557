//! Per-row super-keys supplied alongside tables for the hash-join engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;
use crate::table::{RawTable, RowId, TableId};

/// Widest bit pattern a [`SuperKey`] can hold.
pub const SUPER_KEY_BITS: u32 = 128;

/// Externally computed row signature, read as a fixed-width bit pattern.
///
/// Rows of two tables are only ever compared by the hash-join matcher when
/// their super-keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuperKey(pub u128);

impl SuperKey {
    /// Parse a binary string such as `"0101"` (an optional `0b` prefix is accepted).
    ///
    /// Leading zeros are allowed; at most [`SUPER_KEY_BITS`] significant bits.
    ///
    /// ```
    /// use canonical::SuperKey;
    ///
    /// assert_eq!(SuperKey::from_binary_str("0101").unwrap(), SuperKey(5));
    /// assert!(SuperKey::from_binary_str("0121").is_err());
    /// ```
    pub fn from_binary_str(input: &str) -> Result<Self, CanonicalError> {
        let malformed = |reason| CanonicalError::MalformedSuperKey {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0b")
            .or_else(|| trimmed.strip_prefix("0B"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(malformed("empty bit pattern"));
        }

        let mut value: u128 = 0;
        let mut significant = 0u32;
        for ch in digits.chars() {
            let bit = match ch {
                '0' => 0,
                '1' => 1,
                _ => return Err(malformed("expected only '0' and '1'")),
            };
            if significant > 0 || bit == 1 {
                significant += 1;
            }
            if significant > SUPER_KEY_BITS {
                return Err(malformed("bit pattern wider than 128 bits"));
            }
            value = (value << 1) | bit;
        }
        Ok(SuperKey(value))
    }
}

impl FromStr for SuperKey {
    type Err = CanonicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SuperKey::from_binary_str(s)
    }
}

impl fmt::Display for SuperKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:b}", self.0)
    }
}

/// A raw table paired with one super-key per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedTable {
    table: RawTable,
    super_keys: BTreeMap<RowId, SuperKey>,
}

impl KeyedTable {
    /// Pair a table with its row super-keys.
    ///
    /// Every row needs exactly one key, and every key must name an existing row.
    pub fn new(
        table: RawTable,
        super_keys: BTreeMap<RowId, SuperKey>,
    ) -> Result<Self, CanonicalError> {
        if let Some(row_id) = table.row_ids().find(|id| !super_keys.contains_key(id)) {
            return Err(CanonicalError::MissingSuperKey {
                table_id: table.id,
                row_id,
            });
        }
        if let Some(row_id) = super_keys.keys().find(|id| !table.contains_row(**id)) {
            return Err(CanonicalError::UnknownSuperKeyRow {
                table_id: table.id,
                row_id: *row_id,
            });
        }
        Ok(Self { table, super_keys })
    }

    /// Pair a table with keys given in row-id order as binary strings.
    pub fn from_binary_keys<S: AsRef<str>>(
        table: RawTable,
        keys: &[S],
    ) -> Result<Self, CanonicalError> {
        let row_ids: Vec<RowId> = table.row_ids().collect();
        let mut super_keys = BTreeMap::new();
        for (position, key) in keys.iter().enumerate() {
            let Some(&row_id) = row_ids.get(position) else {
                return Err(CanonicalError::UnknownSuperKeyRow {
                    table_id: table.id,
                    row_id: position as RowId,
                });
            };
            super_keys.insert(row_id, SuperKey::from_binary_str(key.as_ref())?);
        }
        Self::new(table, super_keys)
    }

    pub fn id(&self) -> TableId {
        self.table.id
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }

    pub fn super_key(&self, row_id: RowId) -> Option<SuperKey> {
        self.super_keys.get(&row_id).copied()
    }

    pub fn super_keys(&self) -> impl Iterator<Item = (RowId, SuperKey)> + '_ {
        self.super_keys.iter().map(|(row, key)| (*row, *key))
    }

    /// Rows as counted by the hash-join engine: one per super-key.
    pub fn row_count(&self) -> usize {
        self.super_keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_patterns() {
        assert_eq!(SuperKey::from_binary_str("0").unwrap(), SuperKey(0));
        assert_eq!(SuperKey::from_binary_str("0b110").unwrap(), SuperKey(6));
        assert_eq!(SuperKey::from_binary_str(" 1001 ").unwrap(), SuperKey(9));
    }

    #[test]
    fn leading_zeros_do_not_count_towards_width() {
        let pattern = format!("{}1", "0".repeat(300));
        assert_eq!(SuperKey::from_binary_str(&pattern).unwrap(), SuperKey(1));

        let full = "1".repeat(128);
        assert_eq!(SuperKey::from_binary_str(&full).unwrap(), SuperKey(u128::MAX));
    }

    #[test]
    fn rejects_malformed_patterns() {
        let too_wide = "1".repeat(129);
        for input in ["", "0b", "10a1", "12", too_wide.as_str()] {
            let err = SuperKey::from_binary_str(input).unwrap_err();
            assert!(
                matches!(err, CanonicalError::MalformedSuperKey { .. }),
                "{input:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let key = SuperKey(0b1011_0001);
        assert_eq!(key.to_string(), "10110001");
        assert_eq!(key.to_string().parse::<SuperKey>().unwrap(), key);
    }

    #[test]
    fn keyed_table_requires_key_per_row() {
        let table = RawTable::from_rows(4, [["a"], ["b"]]);
        let err = KeyedTable::from_binary_keys(table.clone(), &["1"]).unwrap_err();
        assert_eq!(
            err,
            CanonicalError::MissingSuperKey {
                table_id: 4,
                row_id: 1
            }
        );

        let err = KeyedTable::from_binary_keys(table.clone(), &["1", "0", "1"]).unwrap_err();
        assert!(matches!(err, CanonicalError::UnknownSuperKeyRow { .. }));

        let keyed = KeyedTable::from_binary_keys(table, &["1", "10"]).expect("valid keys");
        assert_eq!(keyed.row_count(), 2);
        assert_eq!(keyed.super_key(1), Some(SuperKey(2)));
    }
}
