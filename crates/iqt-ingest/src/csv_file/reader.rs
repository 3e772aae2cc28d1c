//! Full CSV body parsing.

use std::path::Path;

use csv::ReaderBuilder;

use iqt_model::RawRecord;

use crate::error::{IngestError, Result};

use super::encoding::decode_text;
use super::header::dedupe_headers;

/// A parsed CSV file: its header and one record per non-empty line.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads and parses a whole CSV file.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
    let (text, had_errors) = decode_text(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            "file contains malformed UTF-8; invalid bytes were replaced"
        );
    }

    let table = parse_csv_text(&text).map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if table.columns.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.records.len(),
        "parsed CSV"
    );
    Ok(table)
}

/// Parses CSV text with a header row.
///
/// Blank lines are skipped. Repeated header names are made unique with a
/// numeric suffix, compared case-insensitively. Rows shorter than the header are padded with
/// empty cells and longer rows are cut to the header width.
pub fn parse_csv_text(text: &str) -> std::result::Result<CsvTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = dedupe_headers(reader.headers()?.iter().map(str::to_string).collect());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<&str> = record.iter().collect();
        records.push(RawRecord::from_cells(&columns, &cells));
    }

    Ok(CsvTable { columns, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_parse_csv_text_basic() {
        let table = parse_csv_text("a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1].get("a"), Some("3"));
        assert_eq!(table.records[1].get("b"), Some("4"));
    }

    #[test]
    fn test_parse_csv_text_keeps_every_duplicate_cell() {
        let table = parse_csv_text("Queue,Queue,queue\na,b,c\n").unwrap();
        assert_eq!(table.columns, vec!["Queue", "Queue_1", "queue_2"]);
        assert_eq!(table.records[0].get("Queue"), Some("a"));
        assert_eq!(table.records[0].get("Queue_1"), Some("b"));
        assert_eq!(table.records[0].get("queue_2"), Some("c"));
    }

    #[test]
    fn test_parse_csv_text_skips_blank_lines() {
        let table = parse_csv_text("a,b\n1,2\n\n3,4\n\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_csv_text_ragged_rows() {
        let table = parse_csv_text("a,b,c\n1\n1,2,3,4\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get("c"), Some(""));
        assert_eq!(table.records[1].len(), 3);
    }

    #[test]
    fn test_parse_csv_text_quoted_multiline_cell() {
        let table = parse_csv_text("a,b\n\"line one\nline two\",x\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].get("a"), Some("line one\nline two"));
    }

    #[test]
    fn test_read_csv_table() {
        let file = create_temp_csv("A,B,C\n1,2,3\n4,5,6\n");
        let table = read_csv_table(file.path()).unwrap();
        assert_eq!(table.columns, vec!["A", "B", "C"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_read_csv_table_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_table(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_table_header_only() {
        let file = create_temp_csv("A,B\n");
        let table = read_csv_table(file.path()).unwrap();
        assert_eq!(table.columns, vec!["A", "B"]);
        assert!(table.is_empty());
    }
}
