//! Bounded CSV header reads.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

use super::encoding::decode_text;

/// Bytes read from the start of a file when only its header is needed.
pub const DEFAULT_HEADER_BYTE_BUDGET: usize = 10 * 1024;

/// Reads the header row of a CSV file without reading past `byte_budget` bytes.
///
/// The prefix is decoded, cut at the first line break and parsed as a single
/// CSV row. A header longer than the budget comes back truncated.
pub fn read_csv_header(path: &Path, byte_budget: usize) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;

    let mut prefix = Vec::with_capacity(byte_budget.min(DEFAULT_HEADER_BYTE_BUDGET));
    file.take(byte_budget as u64)
        .read_to_end(&mut prefix)
        .map_err(|e| IngestError::HeaderRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    // A multi-byte character cut at the budget boundary is expected here.
    let (text, _) = decode_text(&prefix);

    let columns = parse_header_line(&text).ok_or_else(|| IngestError::HeaderRead {
        path: path.to_path_buf(),
        reason: "no header row found".to_string(),
    })?;

    tracing::debug!(
        path = %path.display(),
        bytes = prefix.len(),
        columns = columns.len(),
        "read header"
    );
    Ok(columns)
}

/// Parses the first line of `text` as one CSV row.
///
/// Returns `None` when the first line is blank or cannot be parsed.
pub fn parse_header_line(text: &str) -> Option<Vec<String>> {
    let first_line = text.split('\n').next().unwrap_or("").trim_end_matches('\r');
    if first_line.trim().is_empty() {
        return None;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(first_line.as_bytes());
    let record = reader.records().next()?.ok()?;
    Some(dedupe_headers(record.iter().map(str::to_string).collect()))
}

/// Renames repeated column names so every name is unique ignoring case.
///
/// The second `Queue` (or `queue`) becomes `Queue_1`, the third `Queue_2`,
/// skipping any suffix already taken by another column.
pub fn dedupe_headers(columns: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(columns.len());
    let mut unique = Vec::with_capacity(columns.len());
    for name in columns {
        let mut candidate = name.clone();
        let mut suffix = 0usize;
        while !seen.insert(candidate.to_lowercase()) {
            suffix += 1;
            candidate = format!("{name}_{suffix}");
        }
        if candidate != name {
            tracing::debug!(column = %name, renamed = %candidate, "renamed duplicate column");
        }
        unique.push(candidate);
    }
    unique
}
