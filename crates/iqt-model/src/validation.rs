//! Header validation outcomes for files awaiting merge.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Outcome of comparing one file's header against the reference header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationStatus {
    /// First file of the batch; its header is the reference.
    Reference,
    /// Header matches the reference exactly.
    Valid,
    /// Header differs from the reference.
    Invalid { reason: String },
    /// Header could not be read.
    Error { message: String },
}

impl ValidationStatus {
    /// Reference and valid files will be merged.
    pub fn is_mergeable(&self) -> bool {
        matches!(self, Self::Reference | Self::Valid)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Valid => "valid",
            Self::Invalid { .. } => "invalid",
            Self::Error { .. } => "error",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "Reference file"),
            Self::Valid => write!(f, "Columns match"),
            Self::Invalid { reason } => write!(f, "Column mismatch: {reason}"),
            Self::Error { message } => write!(f, "Error reading file: {message}"),
        }
    }
}

/// Validation result for one pending file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileValidation {
    pub path: PathBuf,
    /// File size in bytes, when known.
    pub size: Option<u64>,
    /// Header as read from the bounded prefix; empty on error.
    pub headers: Vec<String>,
    #[serde(flatten)]
    pub status: ValidationStatus,
}

/// Aggregate counts over a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub reference: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: usize,
}

impl ValidationSummary {
    pub fn from_results(results: &[FileValidation]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.status {
                ValidationStatus::Reference => summary.reference += 1,
                ValidationStatus::Valid => summary.valid += 1,
                ValidationStatus::Invalid { .. } => summary.invalid += 1,
                ValidationStatus::Error { .. } => summary.errors += 1,
            }
        }
        summary
    }

    /// Files that will contribute to a merge.
    pub fn mergeable(&self) -> usize {
        self.reference + self.valid
    }

    /// Files that will be skipped.
    pub fn skipped(&self) -> usize {
        self.invalid + self.errors
    }

    /// A single file is always processed; otherwise one mergeable file is required.
    pub fn can_process(&self) -> bool {
        self.total == 1 || (self.total > 1 && self.mergeable() > 0)
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "No files selected")
        } else if self.total == 1 {
            write!(f, "Ready to process 1 file")
        } else if self.skipped() == 0 {
            write!(
                f,
                "All {} files have matching columns and can be merged",
                self.total
            )
        } else {
            write!(
                f,
                "{} file(s) have different columns and will be skipped. Only {} file(s) will be merged.",
                self.skipped(),
                self.mergeable()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation(status: ValidationStatus) -> FileValidation {
        FileValidation {
            path: PathBuf::from("file.csv"),
            size: None,
            headers: Vec::new(),
            status,
        }
    }

    #[test]
    fn summary_counts_each_status() {
        let results = vec![
            validation(ValidationStatus::Reference),
            validation(ValidationStatus::Valid),
            validation(ValidationStatus::Invalid {
                reason: "2 columns, expected 3".to_string(),
            }),
            validation(ValidationStatus::Error {
                message: "unreadable".to_string(),
            }),
        ];
        let summary = ValidationSummary::from_results(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.mergeable(), 2);
        assert_eq!(summary.skipped(), 2);
        assert!(summary.can_process());
        assert_eq!(
            summary.to_string(),
            "2 file(s) have different columns and will be skipped. Only 2 file(s) will be merged."
        );
    }

    #[test]
    fn single_file_can_always_be_processed() {
        let results = vec![validation(ValidationStatus::Error {
            message: "unreadable".to_string(),
        })];
        let summary = ValidationSummary::from_results(&results);
        assert!(summary.can_process());
        assert_eq!(summary.to_string(), "Ready to process 1 file");
    }

    #[test]
    fn nothing_mergeable_blocks_processing() {
        let results = vec![
            validation(ValidationStatus::Error {
                message: "unreadable".to_string(),
            }),
            validation(ValidationStatus::Invalid {
                reason: "no reference header".to_string(),
            }),
        ];
        assert!(!ValidationSummary::from_results(&results).can_process());
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_string(&validation(ValidationStatus::Valid)).unwrap();
        assert!(json.contains("\"status\":\"valid\""));
    }
}
