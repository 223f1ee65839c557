//! Canonical table layer.
//!
//! This crate owns the table data model and turns raw tables into a
//! deterministic, order-independent form. Every downstream stage (hashing,
//! indexing, matching) builds on it.
//!
//! ## What we do
//!
//! - Model tables as row id → column id → [`Token`] ([`RawTable`])
//! - Sort each row's values, sort rows, drop duplicate rows ([`canonicalize`])
//! - Render canonical tables to hash-input strings ([`Serialization`])
//! - Parse per-row super-keys for the hash-join engine ([`SuperKey`], [`KeyedTable`])
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no global state. Two raw tables holding the same
//! rows (as multisets of values, ignoring row order, column order and row
//! repetition) canonicalize to equal [`CanonicalTable`]s.

mod error;
mod pipeline;
mod serialize;
mod superkey;
mod table;

pub use crate::error::CanonicalError;
pub use crate::pipeline::{canonicalize, canonicalize_all};
pub use crate::serialize::{
    FullSerializer, IndentSerializer, Serialization, SimpleSerializer, TableSerializer,
};
pub use crate::superkey::{KeyedTable, SuperKey, SUPER_KEY_BITS};
pub use crate::table::{CanonicalTable, ColumnId, RawRow, RawTable, RowId, TableId, Token};
