//! Row types produced by parsing and enrichment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute key to attribute value, ordered by key.
pub type AttributeMap = BTreeMap<String, String>;

/// One CSV row: column name to raw cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    values: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record by pairing `columns` with `cells` positionally.
    ///
    /// Missing trailing cells become empty strings; surplus cells are dropped.
    /// When a header repeats a name, the right-most cell wins.
    pub fn from_cells<S: AsRef<str>>(columns: &[String], cells: &[S]) -> Self {
        let mut values = BTreeMap::new();
        for (idx, column) in columns.iter().enumerate() {
            let value = cells.get(idx).map(AsRef::as_ref).unwrap_or("");
            values.insert(column.clone(), value.to_string());
        }
        Self { values }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Returns the cell for `column`, if the record has that column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A merged row plus its stable index and parsed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// Zero-based position in merge order; unique within a dataset.
    pub row_index: usize,
    pub values: RawRecord,
    /// Derived from the attribute source column only.
    pub attributes: AttributeMap,
}

impl EnrichedRecord {
    /// Returns the attribute value for `key`, or `""` when absent.
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes.get(key).map(String::as_str).unwrap_or("")
    }

    /// Returns the cell for `column`, or `""` when absent.
    pub fn value(&self, column: &str) -> &str {
        self.values.get(column).unwrap_or("")
    }
}
