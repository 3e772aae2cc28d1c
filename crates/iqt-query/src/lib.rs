//! SQL querying over a merged interaction dataset.
//!
//! Queries are written against a single table (`interactions` by default)
//! whose columns are the CSV headers. Participant attributes are reached
//! with `ATTR('key')`, which is rewritten to a row-aware call before the
//! query reaches the engine.
//!
//! Results can be paged, inspected row by row, formatted and exported.

mod detail;
mod engine;
mod error;
mod executor;
mod export;
mod format;
mod lexer;
mod result;
mod rewrite;

// Engine and execution
pub use engine::{DEFAULT_TABLE_NAME, SqlEngine, SqliteEngine};
pub use error::{EngineError, QueryError, Result};
pub use executor::{QueryExecutor, QueryOutcome};
pub use rewrite::{ATTR_FUNCTION, rewrite_query};

// Results
pub use detail::RowDetail;
pub use result::{CellValue, DEFAULT_PAGE_SIZE, Page, Pagination, QueryResult, total_pages};

// Output
pub use export::{default_export_file_name, export_csv, write_csv};
pub use format::format_query;
