//! String projections of a [`CanonicalTable`], used only as hash input.
//!
//! Three projections exist, picked once per run through [`Serialization`]:
//!
//! - `simple`: tab-separated cells, newline-terminated rows.
//! - `indent`: cells right-aligned to the widest cell of their column.
//! - `full`: like `indent`, plus a header of column indices and a row-index
//!   label in front of every row.
//!
//! All projections are deterministic for a given table and map an empty table
//! to the empty string. Widths count `char`s, not bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::table::CanonicalTable;

/// Renders a canonical table to a hash-input string.
pub trait TableSerializer: Send + Sync {
    fn serialize(&self, table: &CanonicalTable) -> String;
}

/// Which projection a run hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Serialization {
    Simple,
    Indent,
    #[default]
    Full,
}

impl Serialization {
    /// Resolve the serializer implementing this projection.
    pub fn serializer(self) -> &'static dyn TableSerializer {
        match self {
            Serialization::Simple => &SimpleSerializer,
            Serialization::Indent => &IndentSerializer,
            Serialization::Full => &FullSerializer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Serialization::Simple => "simple",
            Serialization::Indent => "indent",
            Serialization::Full => "full",
        }
    }
}

impl fmt::Display for Serialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Serialization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Serialization::Simple),
            "indent" => Ok(Serialization::Indent),
            "full" => Ok(Serialization::Full),
            other => Err(format!("unknown serialization {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSerializer;

impl TableSerializer for SimpleSerializer {
    fn serialize(&self, table: &CanonicalTable) -> String {
        let mut out = String::new();
        for row in table.rows() {
            for (idx, cell) in row.iter().enumerate() {
                if idx > 0 {
                    out.push('\t');
                }
                out.push_str(cell);
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndentSerializer;

impl TableSerializer for IndentSerializer {
    fn serialize(&self, table: &CanonicalTable) -> String {
        if table.max_row_len() == 0 {
            return String::new();
        }
        let widths = column_widths(table);
        let mut out = String::new();
        for row in table.rows() {
            for (idx, cell) in row.iter().enumerate() {
                if idx > 0 {
                    out.push_str("  ");
                }
                pad_left(&mut out, cell, widths[idx]);
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FullSerializer;

impl TableSerializer for FullSerializer {
    fn serialize(&self, table: &CanonicalTable) -> String {
        if table.max_row_len() == 0 {
            return String::new();
        }
        let mut widths = column_widths(table);
        for (idx, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(digits(idx));
        }
        let label_width = digits(table.row_count().saturating_sub(1));

        let mut out = String::new();
        out.push_str(&" ".repeat(label_width));
        for (idx, width) in widths.iter().enumerate() {
            out.push_str("  ");
            pad_left(&mut out, &idx.to_string(), *width);
        }
        out.push('\n');

        for (row_idx, row) in table.rows().iter().enumerate() {
            pad_right(&mut out, &row_idx.to_string(), label_width);
            for (idx, cell) in row.iter().enumerate() {
                out.push_str("  ");
                pad_left(&mut out, cell, widths[idx]);
            }
            out.push('\n');
        }
        out
    }
}

/// Widest cell per column position, over rows of any length.
fn column_widths(table: &CanonicalTable) -> Vec<usize> {
    let mut widths = vec![0usize; table.max_row_len()];
    for row in table.rows() {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    widths
}

fn digits(n: usize) -> usize {
    n.to_string().len()
}

fn pad_left(out: &mut String, text: &str, width: usize) {
    let len = text.chars().count();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out.push_str(text);
}

fn pad_right(out: &mut String, text: &str, width: usize) {
    let len = text.chars().count();
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{canonicalize, RawTable};

    fn sample() -> CanonicalTable {
        canonicalize(&RawTable::from_rows(1, [["bb", "a"], ["c", "dddd"]]))
    }

    #[test]
    fn simple_projection() {
        let text = Serialization::Simple.serializer().serialize(&sample());
        assert_eq!(text, "a\tbb\nc\tdddd\n");
    }

    #[test]
    fn indent_projection_aligns_columns() {
        let text = Serialization::Indent.serializer().serialize(&sample());
        assert_eq!(text, "a    bb\nc  dddd\n");
    }

    #[test]
    fn full_projection_labels_rows_and_columns() {
        let text = Serialization::Full.serializer().serialize(&sample());
        assert_eq!(text, "   0     1\n0  a    bb\n1  c  dddd\n");
    }

    #[test]
    fn empty_table_serializes_to_empty_string() {
        let empty = canonicalize(&RawTable::new(9));
        for projection in [
            Serialization::Simple,
            Serialization::Indent,
            Serialization::Full,
        ] {
            assert_eq!(projection.serializer().serialize(&empty), "");
        }
    }

    #[test]
    fn empty_first_row_still_renders_later_rows() {
        let table = canonicalize(&RawTable::from_rows(3, [vec![], vec!["a"]]));
        assert_eq!(table.column_count(), 0);
        assert_eq!(Serialization::Simple.serializer().serialize(&table), "\na\n");
        assert_eq!(Serialization::Indent.serializer().serialize(&table), "\na\n");
        assert_eq!(
            Serialization::Full.serializer().serialize(&table),
            "   0\n0\n1  a\n"
        );
    }

    #[test]
    fn widths_count_chars_not_bytes() {
        let table = canonicalize(&RawTable::from_rows(2, [["é"], ["ab"]]));
        let text = Serialization::Indent.serializer().serialize(&table);
        assert_eq!(text, "ab\n é\n");
    }

    #[test]
    fn names_round_trip() {
        for projection in [
            Serialization::Simple,
            Serialization::Indent,
            Serialization::Full,
        ] {
            assert_eq!(projection.as_str().parse::<Serialization>(), Ok(projection));
            let json = serde_json::to_string(&projection).expect("serialize");
            assert_eq!(json, format!("\"{}\"", projection.as_str()));
        }
        assert!("indet".parse::<Serialization>().is_err());
    }
}
