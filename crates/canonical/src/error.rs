use thiserror::Error;

use crate::table::{RowId, TableId};

/// Errors raised while building tables or parsing row super-keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("malformed super-key {input:?}: {reason}")]
    MalformedSuperKey { input: String, reason: &'static str },
    #[error("table {table_id} row {row_id} has no super-key")]
    MissingSuperKey { table_id: TableId, row_id: RowId },
    #[error("table {table_id} has a super-key for unknown row {row_id}")]
    UnknownSuperKeyRow { table_id: TableId, row_id: RowId },
}
