use std::collections::BTreeSet;

use tabdedup::{
    Corpus, CorpusError, DedupError, HashJoinConfig, HashJoinDeduplicator, KeyedTable, RawTable,
    deduplicate_hash_join,
};

const CORPUS: &str = r#"{
    "tables": [
        {"id": 1, "rows": [["x", "y"], ["u", "v"]],             "super_keys": ["01", "10"]},
        {"id": 2, "rows": [["v", "u"], ["y", "x"]],             "super_keys": ["10", "01"]},
        {"id": 3, "rows": [["y", "x"], ["v", "u"], ["y", "x"]], "super_keys": ["01", "10", "01"]},
        {"id": 4, "rows": [["x", "q"], ["u", "v"]],             "super_keys": ["01", "10"]},
        {"id": 5, "rows": [["x", "y", "z"]],                    "super_keys": ["11"]}
    ]
}"#;

fn keyed_corpus() -> Vec<KeyedTable> {
    Corpus::from_json_str(CORPUS)
        .expect("corpus parses")
        .keyed_tables()
        .expect("every table is keyed")
}

#[test]
fn joins_rows_with_equal_super_keys() {
    let report = deduplicate_hash_join(&keyed_corpus(), &HashJoinConfig::default()).unwrap();

    assert_eq!(report.groups, vec![BTreeSet::from([1, 2, 3])]);
    assert_eq!(report.stats.true_positives, 3);
    assert_eq!(report.stats.false_positives, 3);
    assert_eq!(report.stats.precision(), 0.5);
}

#[test]
fn wider_tables_are_never_paired() {
    let report = deduplicate_hash_join(&keyed_corpus(), &HashJoinConfig::default()).unwrap();
    let touches_five = report
        .accepted_pairs
        .iter()
        .chain(&report.rejected_pairs)
        .any(|&(a, b)| a == 5 || b == 5);
    assert!(!touches_five);
}

#[test]
fn forbidding_duplicate_rows_requires_equal_row_counts() {
    let config = HashJoinConfig::default().with_duplicate_rows_allowed(false);
    let report = deduplicate_hash_join(&keyed_corpus(), &config).unwrap();

    assert_eq!(report.groups, vec![BTreeSet::from([1, 2])]);
    assert!(report.rejected_pairs.contains(&(1, 3)));
    assert!(report.rejected_pairs.contains(&(2, 3)));
}

#[test]
fn mismatched_keys_reject_otherwise_equal_tables() {
    let a = KeyedTable::from_binary_keys(RawTable::from_rows(1, [["x", "y"]]), &["1"]).unwrap();
    let b = KeyedTable::from_binary_keys(RawTable::from_rows(2, [["y", "x"]]), &["0"]).unwrap();
    let report = HashJoinDeduplicator::default().deduplicate(&[a, b]).unwrap();
    assert!(report.groups.is_empty());
    assert_eq!(report.rejected_pairs, vec![(1, 2)]);
}

#[test]
fn missing_super_keys_fail_before_the_run() {
    let corpus = Corpus::from_json_str(r#"{"tables":[{"id":9,"rows":[["a"]]}]}"#).unwrap();
    assert!(matches!(
        corpus.keyed_tables(),
        Err(CorpusError::MissingSuperKeys(9))
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let table = KeyedTable::from_binary_keys(RawTable::from_rows(4, [["a"]]), &["1"]).unwrap();
    let err = deduplicate_hash_join(&[table.clone(), table], &HashJoinConfig::default())
        .unwrap_err();
    assert_eq!(err, DedupError::DuplicateTableId(4));
}
