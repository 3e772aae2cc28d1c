//! CSV export of query results.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{QueryError, Result};
use crate::result::QueryResult;

/// `query_results_YYYY-MM-DD.csv`
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("query_results_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the visible columns of `result` as CSV. Returns the row count.
pub fn write_csv<W: Write>(result: &QueryResult, writer: W) -> Result<usize> {
    let visible = result.visible_column_indexes();
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(visible.iter().map(|&idx| result.columns()[idx].as_str()))?;
    for row in result.rows() {
        csv_writer.write_record(
            visible
                .iter()
                .map(|&idx| row.get(idx).map(ToString::to_string).unwrap_or_default()),
        )?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(result.len())
}

/// Exports `result` to `path`. Empty results are refused.
pub fn export_csv(result: &QueryResult, path: &Path) -> Result<usize> {
    if result.is_empty() {
        return Err(QueryError::NothingToExport);
    }
    let file = File::create(path).map_err(|source| QueryError::ExportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = write_csv(result, file)?;
    tracing::info!(path = %path.display(), rows, "exported query results");
    Ok(rows)
}
