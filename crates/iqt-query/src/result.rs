//! Query results and paging.

use std::fmt;

use serde::{Serialize, Serializer};

use iqt_model::{ROW_INDEX_COLUMN, is_internal_column};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// A single value returned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Blob(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Real(value) => serializer.serialize_f64(*value),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Blob(bytes) => serializer.serialize_str(&hex::encode(bytes)),
        }
    }
}

impl From<rusqlite::types::Value> for CellValue {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value;
        match value {
            Value::Null => Self::Null,
            Value::Integer(v) => Self::Integer(v),
            Value::Real(v) => Self::Real(v),
            Value::Text(v) => Self::Text(v),
            Value::Blob(v) => Self::Blob(v),
        }
    }
}

/// Ordered rows with named columns, as produced by one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Positions of the columns shown to users (internal columns hidden).
    pub fn visible_column_indexes(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !is_internal_column(name))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn visible_columns(&self) -> Vec<&str> {
        self.visible_column_indexes()
            .into_iter()
            .map(|idx| self.columns[idx].as_str())
            .collect()
    }

    /// Case-insensitive column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Dataset row index carried by a result row, if the query selected it.
    pub fn source_row_index(&self, row: usize) -> Option<usize> {
        let column = self.column_index(ROW_INDEX_COLUMN)?;
        let value = self.rows.get(row)?.get(column)?.as_integer()?;
        usize::try_from(value).ok()
    }

    /// Returns one page of rows. Out-of-range page numbers are clamped.
    pub fn page(&self, number: usize, page_size: usize) -> Page<'_> {
        let page_size = page_size.max(1);
        let total_pages = total_pages(self.rows.len(), page_size);
        let number = number.clamp(1, total_pages);
        let start = ((number - 1) * page_size).min(self.rows.len());
        let end = (start + page_size).min(self.rows.len());
        Page {
            number,
            total_pages,
            start,
            rows: &self.rows[start..end],
        }
    }
}

/// Number of pages needed for `len` rows; at least one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// A window over a [`QueryResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    pub total_pages: usize,
    /// Position of the first row on this page within the whole result.
    pub start: usize,
    pub rows: &'a [Vec<CellValue>],
}

impl Page<'_> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }
}

/// Current page position for interactive browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Moves to `page`, clamped to `1..=total_pages(len)`.
    pub fn go_to(&mut self, page: usize, len: usize) -> usize {
        self.page = page.clamp(1, total_pages(len, self.page_size));
        self.page
    }

    pub fn next(&mut self, len: usize) -> usize {
        self.go_to(self.page.saturating_add(1), len)
    }

    pub fn prev(&mut self, len: usize) -> usize {
        self.go_to(self.page.saturating_sub(1), len)
    }
}
