//! JSON corpus files consumed by the `tabdedup` binary.
//!
//! ```json
//! {"tables": [{"id": 1, "rows": [["a", "b"]], "super_keys": ["0101"]}]}
//! ```
//!
//! `super_keys` is only required by the hash-join engine. Cells that are not
//! JSON strings are stored in their JSON text form (`1`, `true`, `null`).

use std::fs;
use std::path::Path;

use canonical::{CanonicalError, KeyedTable, RawTable, TableId, Token};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse corpus JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Canonical(#[from] CanonicalError),
    #[error("table {0} has no super_keys")]
    MissingSuperKeys(TableId),
}

/// One table as written in a corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusTable {
    pub id: TableId,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_keys: Option<Vec<String>>,
}

impl CorpusTable {
    pub fn raw_table(&self) -> RawTable {
        RawTable::from_rows(
            self.id,
            self.rows.iter().map(|row| row.iter().map(cell_token)),
        )
    }

    pub fn keyed_table(&self) -> Result<KeyedTable, CorpusError> {
        let keys = self
            .super_keys
            .as_deref()
            .ok_or(CorpusError::MissingSuperKeys(self.id))?;
        Ok(KeyedTable::from_binary_keys(self.raw_table(), keys)?)
    }
}

/// A whole corpus, tables in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub tables: Vec<CorpusTable>,
}

impl Corpus {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn raw_tables(&self) -> Vec<RawTable> {
        self.tables.iter().map(CorpusTable::raw_table).collect()
    }

    /// Tables with their row super-keys; every table must carry them.
    pub fn keyed_tables(&self) -> Result<Vec<KeyedTable>, CorpusError> {
        self.tables.iter().map(CorpusTable::keyed_table).collect()
    }
}

fn cell_token(value: &Value) -> Token {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use canonical::SuperKey;
    use tempfile::NamedTempFile;

    use super::*;

    const SAMPLE: &str = r#"{
        "tables": [
            {"id": 1, "rows": [["a", "b"], ["c", "d"]], "super_keys": ["01", "10"]},
            {"id": 7, "rows": [[1, true, null, 2.5]]}
        ]
    }"#;

    #[test]
    fn parses_tables_and_coerces_cells() {
        let corpus = Corpus::from_json_str(SAMPLE).unwrap();
        assert_eq!(corpus.len(), 2);

        let raw = corpus.raw_tables();
        assert_eq!(raw[0].row_count(), 2);
        let cells: Vec<&str> = raw[1]
            .row(0)
            .unwrap()
            .values()
            .map(String::as_str)
            .collect();
        assert_eq!(cells, vec!["1", "true", "null", "2.5"]);
    }

    #[test]
    fn keyed_tables_require_super_keys() {
        let corpus = Corpus::from_json_str(SAMPLE).unwrap();
        let err = corpus.keyed_tables().unwrap_err();
        assert!(matches!(err, CorpusError::MissingSuperKeys(7)));

        let keyed = corpus.tables[0].keyed_table().unwrap();
        assert_eq!(keyed.super_key(1), Some(SuperKey(2)));
    }

    #[test]
    fn malformed_super_keys_surface_as_canonical_errors() {
        let corpus =
            Corpus::from_json_str(r#"{"tables":[{"id":3,"rows":[["x"]],"super_keys":["2"]}]}"#)
                .unwrap();
        let err = corpus.keyed_tables().unwrap_err();
        assert!(matches!(
            err,
            CorpusError::Canonical(CanonicalError::MalformedSuperKey { .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let corpus = Corpus::from_file(file.path()).unwrap();
        assert_eq!(corpus.tables[1].id, 7);

        let err = Corpus::from_file(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, CorpusError::Io(_)));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            Corpus::from_json_str("{\"tables\": 3}"),
            Err(CorpusError::Json(_))
        ));
    }
}
