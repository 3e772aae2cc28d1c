//! Multi-file merge.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use iqt_model::RawRecord;

use crate::csv_file::read_csv_table;
use crate::error::{IngestError, Result};
use crate::validate::header_mismatch;

/// Why a file contributed no rows to a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Full header differs from the merged columns.
    ColumnMismatch { detail: String },
    /// The file could not be read or parsed.
    ReadFailed { message: String },
    /// The first file failed, so there is nothing to compare against.
    MissingReference,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnMismatch { detail } => write!(f, "column mismatch ({detail})"),
            Self::ReadFailed { message } => write!(f, "read failed ({message})"),
            Self::MissingReference => write!(f, "reference file could not be read"),
        }
    }
}

/// A file left out of the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedFile {
    pub path: PathBuf,
    pub reason: ExclusionReason,
}

impl fmt::Display for ExcludedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// A file whose rows were merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Result of merging a batch of files, before enrichment.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Header of the first file.
    pub columns: Vec<String>,
    /// Rows in file order, then row order within each file.
    pub records: Vec<RawRecord>,
    pub merged: Vec<MergedFile>,
    pub excluded: Vec<ExcludedFile>,
}

/// Progress notification emitted before each file is parsed.
#[derive(Debug, Clone, Copy)]
pub struct MergeProgress<'a> {
    /// Zero-based position of the file in the batch.
    pub index: usize,
    pub total: usize,
    pub path: &'a Path,
}

/// Merges files in order. See [`merge_files_with_progress`].
pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<MergeOutcome> {
    merge_files_with_progress(paths, |_| {})
}

/// Parses every file in order and concatenates the rows of those whose header
/// equals the first file's header.
///
/// Files are all-in or all-out. A file that fails to parse or whose header
/// differs is recorded in [`MergeOutcome::excluded`] and the batch continues.
/// Fails with [`IngestError::EmptyMerge`] when no file contributed a row.
pub fn merge_files_with_progress<P, F>(paths: &[P], mut on_file: F) -> Result<MergeOutcome>
where
    P: AsRef<Path>,
    F: FnMut(MergeProgress<'_>),
{
    if paths.is_empty() {
        return Err(IngestError::NoFiles);
    }

    let start = Instant::now();
    let total = paths.len();
    let mut outcome = MergeOutcome::default();
    let mut reference: Option<Vec<String>> = None;

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        on_file(MergeProgress { index, total, path });

        if index > 0 && reference.is_none() {
            exclude(&mut outcome, path, ExclusionReason::MissingReference);
            continue;
        }

        let table = match read_csv_table(path) {
            Ok(table) => table,
            Err(error) => {
                exclude(
                    &mut outcome,
                    path,
                    ExclusionReason::ReadFailed {
                        message: error.to_string(),
                    },
                );
                continue;
            }
        };

        if let Some(columns) = &reference {
            if let Some(detail) = header_mismatch(columns, &table.columns) {
                exclude(&mut outcome, path, ExclusionReason::ColumnMismatch { detail });
                continue;
            }
        } else {
            outcome.columns = table.columns.clone();
            reference = Some(table.columns.clone());
        }

        tracing::debug!(path = %path.display(), rows = table.records.len(), "merged file");
        outcome.merged.push(MergedFile {
            path: path.to_path_buf(),
            rows: table.records.len(),
        });
        outcome.records.extend(table.records);
    }

    if outcome.records.is_empty() {
        let mut reasons: Vec<String> = outcome.excluded.iter().map(ToString::to_string).collect();
        for file in &outcome.merged {
            reasons.push(format!("{}: no data rows", file.path.display()));
        }
        return Err(IngestError::EmptyMerge { reasons });
    }

    tracing::info!(
        files = total,
        merged = outcome.merged.len(),
        excluded = outcome.excluded.len(),
        rows = outcome.records.len(),
        duration_ms = start.elapsed().as_millis(),
        "merge complete"
    );
    Ok(outcome)
}

fn exclude(outcome: &mut MergeOutcome, path: &Path, reason: ExclusionReason) {
    tracing::warn!(path = %path.display(), %reason, "file excluded from merge");
    outcome.excluded.push(ExcludedFile {
        path: path.to_path_buf(),
        reason,
    });
}
