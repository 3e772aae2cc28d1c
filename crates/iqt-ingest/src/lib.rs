//! Interaction export ingestion.
//!
//! This crate turns a batch of CSV exports into one ordered set of raw
//! records ready for enrichment.
//!
//! # Features
//!
//! - **Header Validation**: Read only a bounded prefix of each file and compare
//!   its header against the first file's header
//! - **Pending Files**: Queue, de-duplicate and remove files before processing
//! - **Merge**: Parse files fully, in order, keeping only those whose header
//!   matches exactly
//!
//! # Example
//!
//! ```ignore
//! use iqt_ingest::{DEFAULT_HEADER_BYTE_BUDGET, merge_files, validate_files};
//!
//! let files = ["exports/january.csv", "exports/february.csv"];
//! let report = validate_files(&files, DEFAULT_HEADER_BYTE_BUDGET);
//! let merged = merge_files(&files)?;
//! println!("{} rows from {} files", merged.records.len(), merged.merged.len());
//! ```

mod csv_file;
mod discovery;
mod error;
mod merge;
mod pending;
mod validate;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv_file::{
    CsvTable, DEFAULT_HEADER_BYTE_BUDGET, decode_text, dedupe_headers, parse_csv_text, parse_header_line,
    read_csv_header, read_csv_table,
};

// === File Discovery ===
pub use discovery::{expand_inputs, is_csv_file, list_csv_files};

// === Validation ===
pub use pending::{PendingFile, PendingFileSet};
pub use validate::{header_mismatch, validate_files};

// === Merge ===
pub use merge::{
    ExcludedFile, ExclusionReason, MergeOutcome, MergeProgress, MergedFile, merge_files,
    merge_files_with_progress,
};
