use crate::table::{CanonicalTable, RawTable, Token};

/// Main entry point. Turns a raw table into its order-independent form.
///
/// Row order, column order and exact row duplication are all erased, so two
/// tables holding the same multiset of value-multisets canonicalize to equal
/// [`CanonicalTable`]s.
///
/// ```
/// use canonical::{canonicalize, RawTable};
///
/// let a = RawTable::from_rows(1, [["x", "y"], ["y", "x"]]);
/// let b = RawTable::from_rows(2, [["y", "x"], ["x", "y"]]);
/// assert_eq!(canonicalize(&a).rows(), canonicalize(&b).rows());
/// ```
pub fn canonicalize(table: &RawTable) -> CanonicalTable {
    // Attribute order is dropped by sorting each row's values.
    let mut rows: Vec<Vec<Token>> = table
        .rows()
        .map(|(_, row)| {
            let mut values: Vec<Token> = row.values().cloned().collect();
            values.sort_unstable();
            values
        })
        .collect();

    // A table with zero or one row is already in row order.
    if rows.len() > 1 {
        rows.sort_unstable();
        // Equal rows are adjacent after the sort.
        rows.dedup();
    }

    CanonicalTable::from_sorted_rows(table.id, rows)
}

/// Canonicalize a whole corpus, keeping input order.
pub fn canonicalize_all(tables: &[RawTable]) -> Vec<CanonicalTable> {
    tables.iter().map(canonicalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(table: &CanonicalTable) -> Vec<Vec<&str>> {
        table
            .rows()
            .iter()
            .map(|row| row.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn sorts_values_and_rows() {
        let raw = RawTable::from_rows(1, [["b", "a"], ["a", "c"], ["a", "a"]]);
        let canon = canonicalize(&raw);
        assert_eq!(
            rows_of(&canon),
            vec![vec!["a", "a"], vec!["a", "b"], vec!["a", "c"]]
        );
        assert_eq!(canon.id, 1);
    }

    #[test]
    fn removes_duplicate_rows_after_sort() {
        let raw = RawTable::from_rows(2, [["x", "y"], ["z", "z"], ["y", "x"], ["x", "y"]]);
        let canon = canonicalize(&raw);
        assert_eq!(rows_of(&canon), vec![vec!["x", "y"], vec!["z", "z"]]);
    }

    #[test]
    fn single_row_and_empty_tables() {
        let single = canonicalize(&RawTable::from_rows(3, [["q", "p", "p"]]));
        assert_eq!(rows_of(&single), vec![vec!["p", "p", "q"]]);

        let empty = canonicalize(&RawTable::new(4));
        assert!(empty.is_empty());
        assert_eq!(empty.column_count(), 0);
    }

    #[test]
    fn idempotent_on_canonical_input() {
        let raw = RawTable::from_rows(5, [["3", "1"], ["2", "2"], ["1", "3"]]);
        let once = canonicalize(&raw);
        let twice = canonicalize(&RawTable::from(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn invariant_under_row_and_column_permutation() {
        let mut permuted = RawTable::new(6);
        // Same content as `original`, rows and columns relabelled.
        permuted.insert_cell(40, 7, "c");
        permuted.insert_cell(40, 2, "d");
        permuted.insert_cell(10, 7, "b");
        permuted.insert_cell(10, 2, "a");
        let original = RawTable::from_rows(6, [["a", "b"], ["c", "d"]]);
        assert_eq!(canonicalize(&original), canonicalize(&permuted));
    }

    #[test]
    fn lexicographic_order_is_bytewise() {
        let canon = canonicalize(&RawTable::from_rows(7, [["b", "B", "a", "10", "9"]]));
        assert_eq!(rows_of(&canon), vec![vec!["10", "9", "B", "a", "b"]]);
    }
}
