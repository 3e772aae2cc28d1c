//! Integration tests for multi-file merge.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use iqt_ingest::{ExclusionReason, IngestError, merge_files};

fn write_csv(dir: &Path, name: &str, header: &str, rows: usize) -> PathBuf {
    let mut content = format!("{header}\n");
    for idx in 0..rows {
        let cells: Vec<String> = header
            .split(',')
            .map(|column| format!("{name}-{column}-{idx}"))
            .collect();
        content.push_str(&cells.join(","));
        content.push('\n');
    }
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write csv");
    path
}

#[test]
fn merges_matching_files_and_excludes_mismatch() {
    let dir = TempDir::new().unwrap();
    let f1 = write_csv(dir.path(), "f1.csv", "a,b", 3);
    let f2 = write_csv(dir.path(), "f2.csv", "a,b", 2);
    let f3 = write_csv(dir.path(), "f3.csv", "a,c", 5);

    let outcome = merge_files(&[f1.clone(), f2.clone(), f3.clone()]).expect("merge");

    assert_eq!(outcome.columns, vec!["a", "b"]);
    assert_eq!(outcome.records.len(), 5);
    assert_eq!(outcome.merged.len(), 2);
    assert_eq!(outcome.merged[0].path, f1);
    assert_eq!(outcome.merged[1].path, f2);
    assert_eq!(outcome.excluded.len(), 1);
    assert_eq!(outcome.excluded[0].path, f3);
    assert!(matches!(
        outcome.excluded[0].reason,
        ExclusionReason::ColumnMismatch { .. }
    ));
}

#[test]
fn preserves_file_then_row_order() {
    let dir = TempDir::new().unwrap();
    let f1 = write_csv(dir.path(), "f1.csv", "a,b", 2);
    let f2 = write_csv(dir.path(), "f2.csv", "a,b", 2);

    let outcome = merge_files(&[f1, f2]).expect("merge");
    let values: Vec<&str> = outcome
        .records
        .iter()
        .map(|record| record.get("a").unwrap())
        .collect();
    assert_eq!(
        values,
        vec!["f1.csv-a-0", "f1.csv-a-1", "f2.csv-a-0", "f2.csv-a-1"]
    );
}

#[test]
fn first_file_fixes_columns_even_when_empty() {
    let dir = TempDir::new().unwrap();
    let f1 = write_csv(dir.path(), "f1.csv", "a,b", 0);
    let f2 = write_csv(dir.path(), "f2.csv", "a,b", 4);

    let outcome = merge_files(&[f1, f2]).expect("merge");
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.merged[0].rows, 0);
}

#[test]
fn no_matching_files_is_an_empty_merge() {
    let dir = TempDir::new().unwrap();
    let f1 = write_csv(dir.path(), "f1.csv", "a,b", 0);
    let f2 = write_csv(dir.path(), "f2.csv", "a,c", 5);

    let err = merge_files(&[f1, f2]).expect_err("empty merge");
    match err {
        IngestError::EmptyMerge { reasons } => {
            assert_eq!(reasons.len(), 2);
            assert!(reasons[0].contains("f2.csv"));
            assert!(reasons[0].contains("column mismatch"));
            assert!(reasons[1].contains("no data rows"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_equality_is_exact() {
    let dir = TempDir::new().unwrap();
    let f1 = write_csv(dir.path(), "f1.csv", "a,b", 1);
    let f2 = write_csv(dir.path(), "f2.csv", "b,a", 1);
    let f3 = write_csv(dir.path(), "f3.csv", "A,b", 1);

    let outcome = merge_files(&[f1, f2, f3]).expect("merge");
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.excluded.len(), 2);
}
