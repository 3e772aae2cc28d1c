//! Integration tests for header validation.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use iqt_ingest::{DEFAULT_HEADER_BYTE_BUDGET, PendingFileSet, validate_files};
use iqt_model::{ValidationStatus, ValidationSummary};

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write file");
    path
}

#[test]
fn identical_headers_are_valid() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_file(dir.path(), "one.csv", "a,b,c\n1,2,3\n"),
        write_file(dir.path(), "two.csv", "a,b,c\n4,5,6\n"),
        write_file(dir.path(), "three.csv", "a,b,c\n"),
    ];

    let results = validate_files(&files, DEFAULT_HEADER_BYTE_BUDGET);

    assert_eq!(results[0].status, ValidationStatus::Reference);
    assert_eq!(results[1].status, ValidationStatus::Valid);
    assert_eq!(results[2].status, ValidationStatus::Valid);
    assert_eq!(results[0].headers, vec!["a", "b", "c"]);
}

#[test]
fn shorter_header_is_invalid() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_file(dir.path(), "one.csv", "a,b,c\n1,2,3\n"),
        write_file(dir.path(), "two.csv", "a,b\n1,2\n"),
    ];

    let results = validate_files(&files, DEFAULT_HEADER_BYTE_BUDGET);

    assert!(matches!(
        results[1].status,
        ValidationStatus::Invalid { .. }
    ));
    let summary = ValidationSummary::from_results(&results);
    assert_eq!(summary.invalid, 1);
    assert!(summary.can_process());
}

#[test]
fn unreadable_file_is_error() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_file(dir.path(), "one.csv", "a,b\n1,2\n"),
        write_file(dir.path(), "blank.csv", ""),
        dir.path().join("missing.csv"),
    ];

    let results = validate_files(&files, DEFAULT_HEADER_BYTE_BUDGET);

    assert!(matches!(results[1].status, ValidationStatus::Error { .. }));
    assert!(matches!(results[2].status, ValidationStatus::Error { .. }));
    assert!(results[1].headers.is_empty());
    assert_eq!(results[2].size, None);
}

#[test]
fn reads_no_further_than_the_budget() {
    let dir = TempDir::new().unwrap();
    let wide: Vec<String> = (0..4000).map(|idx| format!("column_{idx}")).collect();
    let header = wide.join(",");
    let files = vec![write_file(
        dir.path(),
        "wide.csv",
        &format!("{header}\n1\n"),
    )];

    let results = validate_files(&files, 64);

    let read: usize = results[0].headers.iter().map(|h| h.len() + 1).sum();
    assert!(read <= 65);
    assert!(results[0].headers.len() < wide.len());
}

#[test]
fn pending_set_validates_in_queue_order() {
    let dir = TempDir::new().unwrap();
    let reference = write_file(dir.path(), "one.csv", "a,b\n1,2\n");
    let other = write_file(dir.path(), "two.csv", "a,c\n1,2\n");

    let mut pending = PendingFileSet::new();
    pending.extend(&[reference, other]).unwrap();
    let results = pending.validate(DEFAULT_HEADER_BYTE_BUDGET);
    assert_eq!(results[0].status, ValidationStatus::Reference);
    assert!(!results[1].status.is_mergeable());

    pending.remove(0);
    let results = pending.validate(DEFAULT_HEADER_BYTE_BUDGET);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, ValidationStatus::Reference);
}
