//! Column correspondence between the two tables of one comparison.
//!
//! Maps a column position of the bigger table to the positions of the
//! smaller table it may still correspond to. Each matched row narrows the
//! candidates; a candidate row is tested against a [`PendingCorrespondence`]
//! overlay and only merged into the committed state once it matches.

use fxhash::FxHashMap;

/// Committed big-column → small-column candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCorrespondence {
    columns: FxHashMap<usize, Vec<usize>>,
}

impl ColumnCorrespondence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small-table positions `big_column` may still map to.
    pub fn candidates(&self, big_column: usize) -> Option<&[usize]> {
        self.columns.get(&big_column).map(Vec::as_slice)
    }

    /// Start testing a candidate row against the committed state.
    pub fn begin(&self) -> PendingCorrespondence<'_> {
        PendingCorrespondence {
            base: self,
            overlay: FxHashMap::default(),
        }
    }

    /// Merge a successful candidate's constraints.
    pub fn commit(&mut self, delta: CorrespondenceDelta) {
        self.columns.extend(delta.columns);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Uncommitted constraints layered over a [`ColumnCorrespondence`].
#[derive(Debug)]
pub struct PendingCorrespondence<'a> {
    base: &'a ColumnCorrespondence,
    overlay: FxHashMap<usize, Vec<usize>>,
}

impl PendingCorrespondence<'_> {
    /// Require `big_column` to map into `small_columns`.
    ///
    /// The first constraint on a column installs `small_columns`; later ones
    /// intersect with it. Returns `false` once the candidates run empty.
    pub fn constrain(&mut self, big_column: usize, small_columns: &[usize]) -> bool {
        let current = self
            .overlay
            .get(&big_column)
            .map(Vec::as_slice)
            .or_else(|| self.base.candidates(big_column));
        let next: Vec<usize> = match current {
            None => small_columns.to_vec(),
            Some(existing) => existing
                .iter()
                .copied()
                .filter(|column| small_columns.contains(column))
                .collect(),
        };
        let satisfiable = !next.is_empty();
        self.overlay.insert(big_column, next);
        satisfiable
    }

    /// Finish the candidate; the delta is merged via [`ColumnCorrespondence::commit`].
    pub fn into_delta(self) -> CorrespondenceDelta {
        CorrespondenceDelta {
            columns: self.overlay,
        }
    }
}

/// Constraints produced by one accepted row.
#[derive(Debug, Default)]
pub struct CorrespondenceDelta {
    columns: FxHashMap<usize, Vec<usize>>,
}
