//! Error types for query execution.

use std::path::PathBuf;
use thiserror::Error;

/// Failures inside the relational engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error reported by SQLite, including syntax and unknown-column errors.
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A data column uses a name the pipeline reserves.
    #[error("column '{column}' collides with an internal column name")]
    ReservedColumn { column: String },

    /// Attribute mapping could not be serialized for the engine table.
    #[error("failed to serialize attributes: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced to the user when running or exporting a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Query text was blank.
    #[error("please enter a query")]
    EmptyQuery,

    /// Nothing has been loaded, or the dataset was reset.
    #[error("no dataset loaded")]
    NoDataset,

    /// The engine rejected or failed on the query. The message is the engine's.
    #[error("{message}")]
    Execution { message: String },

    /// The dataset could not be loaded into the engine.
    #[error("failed to prepare query engine: {0}")]
    EngineLoad(#[source] EngineError),

    /// Export was requested for an empty result.
    #[error("no results to export")]
    NothingToExport,

    /// Export file could not be written.
    #[error("failed to write export {path}: {source}")]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
