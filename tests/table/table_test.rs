//! Integration tests for RowTable validation and dataset hashing.

use lineage::table::{DatasetStatus, RowTable, TableError, REQUIRED_COLUMNS};

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

const HEADER: &[&str] = &[
    "childTableName",
    "childTableType",
    "relationship",
    "parentTableName",
    "parentTableType",
];

#[test]
fn test_header_matching_ignores_case_and_whitespace() {
    let table = RowTable::from_grid(grid(&[
        &["Child Table Name", "CHILDTABLETYPE", " relationship ", "parent tablename", "ParentTableType"],
        &["a", "T1", "uses", "b", "T2"],
    ]))
    .unwrap();

    let mapping = table.validate().unwrap();
    assert_eq!(mapping.child_name, 0);
    assert_eq!(mapping.parent_type, 4);
}

#[test]
fn test_columns_may_appear_in_any_order_with_extras() {
    let table = RowTable::from_grid(grid(&[
        &["owner", "parentTableName", "relationship", "childTableName", "parentTableType", "childTableType"],
        &["ops", "b", "uses", "a", "T2", "T1"],
    ]))
    .unwrap();

    let records = table.lineage_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].child_name, "a");
    assert_eq!(records[0].parent_name, "b");
    assert_eq!(records[0].parent_type, "T2");
}

#[test]
fn test_missing_relationship_column() {
    let table = RowTable::from_grid(grid(&[
        &["childTableName", "childTableType", "parentTableName", "parentTableType"],
        &["a", "T1", "b", "T2"],
    ]))
    .unwrap();

    match table.validate() {
        Err(TableError::MissingColumns { missing, .. }) => {
            assert_eq!(missing, vec!["relationship"]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_every_missing_column_is_reported() {
    let table = RowTable::from_grid(grid(&[&["something", "else"]])).unwrap();

    let err = table.validate().unwrap_err();
    let TableError::MissingColumns { missing, found } = &err else {
        panic!("expected MissingColumns, got {:?}", err);
    };
    assert_eq!(missing.len(), REQUIRED_COLUMNS.len());
    assert_eq!(found, &vec!["something".to_string(), "else".to_string()]);
    insta::assert_snapshot!(err.to_string(), @"Missing required columns: childTableName, childTableType, relationship, parentTableName, parentTableType (found: something, else)");
}

#[test]
fn test_empty_grid_is_rejected() {
    assert_eq!(RowTable::from_grid(Vec::new()), Err(TableError::EmptyGrid));
}

#[test]
fn test_header_only_is_valid_and_empty() {
    let table = RowTable::from_grid(grid(&[HEADER])).unwrap();
    assert!(table.validate().is_ok());
    assert_eq!(table.status(), DatasetStatus::Empty);
    assert!(table.lineage_records().unwrap().is_empty());
}

#[test]
fn test_populated_status_counts_rows() {
    let table = RowTable::from_grid(grid(&[
        HEADER,
        &["a", "T1", "uses", "b", "T2"],
        &["b", "T2", "reads", "c", "T1"],
    ]))
    .unwrap();
    assert_eq!(table.status(), DatasetStatus::Populated { rows: 2 });
}

#[test]
fn test_cells_are_trimmed_in_records() {
    let table = RowTable::from_grid(grid(&[HEADER, &[" a ", "T1", " uses", "b\t", "T2"]])).unwrap();
    let records = table.lineage_records().unwrap();
    assert_eq!(records[0].child_name, "a");
    assert_eq!(records[0].relationship, "uses");
    assert_eq!(records[0].parent_name, "b");
}

#[test]
fn test_hash_is_stable_for_identical_grids() {
    let rows: &[&[&str]] = &[HEADER, &["a", "T1", "uses", "b", "T2"]];
    let first = RowTable::from_grid(grid(rows)).unwrap();
    let second = RowTable::from_grid(grid(rows)).unwrap();
    assert_eq!(first.dataset_hash(), second.dataset_hash());
}

#[test]
fn test_hash_changes_with_any_cell() {
    let original = RowTable::from_grid(grid(&[HEADER, &["a", "T1", "uses", "b", "T2"]])).unwrap();
    let edited = RowTable::from_grid(grid(&[HEADER, &["a", "T1", "reads", "b", "T2"]])).unwrap();
    assert_ne!(original.dataset_hash(), edited.dataset_hash());
}

#[test]
fn test_hash_changes_with_row_order() {
    let forward = RowTable::from_grid(grid(&[
        HEADER,
        &["a", "T1", "uses", "b", "T2"],
        &["b", "T2", "reads", "c", "T1"],
    ]))
    .unwrap();
    let reversed = RowTable::from_grid(grid(&[
        HEADER,
        &["b", "T2", "reads", "c", "T1"],
        &["a", "T1", "uses", "b", "T2"],
    ]))
    .unwrap();
    assert_ne!(forward.dataset_hash(), reversed.dataset_hash());
}

#[test]
fn test_hash_does_not_confuse_cell_boundaries() {
    let joined = RowTable::from_grid(grid(&[&["ab", "c"]])).unwrap();
    let split = RowTable::from_grid(grid(&[&["a", "bc"]])).unwrap();
    assert_ne!(joined.dataset_hash(), split.dataset_hash());
}

#[test]
fn test_hash_sees_cells_past_the_header() {
    let first = RowTable::from_grid(grid(&[&["h"], &["1", "2"]])).unwrap();
    let second = RowTable::from_grid(grid(&[&["h"], &["1", "3"]])).unwrap();

    assert_eq!(first.rows(), second.rows());
    assert_ne!(first.dataset_hash(), second.dataset_hash());
}
