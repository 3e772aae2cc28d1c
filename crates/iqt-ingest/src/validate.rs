//! Header-only validation of files before merge.

use std::path::Path;

use iqt_model::{FileValidation, ValidationStatus};

use crate::csv_file::read_csv_header;

/// Describes how `headers` differs from `reference`, or `None` when equal.
///
/// Comparison is positional and exact: order, case and whitespace all matter.
pub fn header_mismatch(reference: &[String], headers: &[String]) -> Option<String> {
    if reference.len() != headers.len() {
        return Some(format!(
            "{} columns, expected {}",
            headers.len(),
            reference.len()
        ));
    }
    reference
        .iter()
        .zip(headers)
        .enumerate()
        .find(|(_, (expected, actual))| expected != actual)
        .map(|(idx, (expected, actual))| {
            format!(
                "column {} is '{}', expected '{}'",
                idx + 1,
                actual,
                expected
            )
        })
}

/// Validates each file's header against the first file's header.
///
/// Only a bounded prefix of each file is read. The first file is tagged
/// `Reference` when its header can be read. A file whose header cannot be read
/// is tagged `Error`; later files are tagged `Invalid` when they differ from the
/// reference, or when no reference header is available.
pub fn validate_files<P: AsRef<Path>>(paths: &[P], byte_budget: usize) -> Vec<FileValidation> {
    let mut results = Vec::with_capacity(paths.len());
    let mut reference: Option<Vec<String>> = None;

    for (idx, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let size = std::fs::metadata(path).ok().map(|meta| meta.len());

        let (headers, status) = match read_csv_header(path, byte_budget) {
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "header read failed");
                (
                    Vec::new(),
                    ValidationStatus::Error {
                        message: error.to_string(),
                    },
                )
            }
            Ok(headers) if idx == 0 => {
                reference = Some(headers.clone());
                (headers, ValidationStatus::Reference)
            }
            Ok(headers) => {
                let status = match &reference {
                    None => ValidationStatus::Invalid {
                        reason: "reference header unavailable".to_string(),
                    },
                    Some(reference) => match header_mismatch(reference, &headers) {
                        Some(reason) => ValidationStatus::Invalid { reason },
                        None => ValidationStatus::Valid,
                    },
                };
                (headers, status)
            }
        };

        tracing::debug!(
            path = %path.display(),
            status = status.label(),
            "validated header"
        );
        results.push(FileValidation {
            path: path.to_path_buf(),
            size,
            headers,
            status,
        });
    }

    results
}
