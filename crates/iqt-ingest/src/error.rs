//! Error types for interaction export ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, validating or merging CSV exports.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input does not carry a `.csv` extension.
    #[error("not a CSV file: {path}")]
    NotCsv { path: PathBuf },

    // === CSV Parsing Errors ===
    /// The bounded header prefix could not be read or held no parseable row.
    #[error("could not read header of {path}: {reason}")]
    HeaderRead { path: PathBuf, reason: String },

    /// Failed to parse the CSV body.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Merge Errors ===
    /// No input files were given.
    #[error("no files to process")]
    NoFiles,

    /// Every file was skipped or empty, so the merge produced no rows.
    #[error("no valid data found in files: {}", reasons.join("; "))]
    EmptyMerge { reasons: Vec<String> },
}

impl IngestError {
    /// Maps an I/O failure on `path` to the matching variant.
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
