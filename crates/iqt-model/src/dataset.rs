//! The merged, enriched dataset.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::columns::is_internal_column;
use crate::record::EnrichedRecord;

/// A fully built dataset. Instances are immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<EnrichedRecord>,
    attribute_keys: BTreeSet<String>,
    attribute_column: Option<String>,
    sources: Vec<PathBuf>,
}

/// Counts shown after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub records: usize,
    pub columns: usize,
    pub attributes: usize,
}

impl Dataset {
    /// Assembles a dataset from enrichment output.
    ///
    /// `records` must already carry row indexes `0..records.len()` in order.
    pub fn new(
        columns: Vec<String>,
        records: Vec<EnrichedRecord>,
        attribute_keys: BTreeSet<String>,
    ) -> Self {
        debug_assert!(
            records
                .iter()
                .enumerate()
                .all(|(idx, record)| record.row_index == idx),
            "row indexes must be contiguous and in merge order"
        );
        Self {
            columns,
            records,
            attribute_keys,
            attribute_column: None,
            sources: Vec::new(),
        }
    }

    /// Records which column the attributes were parsed from.
    #[must_use]
    pub fn with_attribute_column(mut self, column: Option<String>) -> Self {
        self.attribute_column = column;
        self
    }

    /// Records the files that contributed rows, in merge order.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.sources = sources;
        self
    }

    /// The header fixed by the first file, including any internal-looking names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Header columns suitable for listings and export.
    pub fn visible_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|column| !is_internal_column(column))
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn record(&self, row_index: usize) -> Option<&EnrichedRecord> {
        self.records.get(row_index)
    }

    /// Looks up an attribute by row index, defaulting to `""`.
    pub fn attribute(&self, row_index: usize, key: &str) -> &str {
        self.record(row_index)
            .map(|record| record.attribute(key))
            .unwrap_or("")
    }

    pub fn attribute_keys(&self) -> &BTreeSet<String> {
        &self.attribute_keys
    }

    pub fn attribute_column(&self) -> Option<&str> {
        self.attribute_column.as_deref()
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            records: self.records.len(),
            columns: self.columns.len(),
            attributes: self.attribute_keys.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AttributeMap, RawRecord};

    fn record(row_index: usize, attrs: &[(&str, &str)]) -> EnrichedRecord {
        EnrichedRecord {
            row_index,
            values: RawRecord::new(),
            attributes: attrs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<AttributeMap>(),
        }
    }

    #[test]
    fn attribute_lookup_by_row_index() {
        let dataset = Dataset::new(
            vec!["a".to_string()],
            vec![record(0, &[("x", "1")]), record(1, &[("x", "2")])],
            BTreeSet::from(["x".to_string()]),
        );
        assert_eq!(dataset.attribute(0, "x"), "1");
        assert_eq!(dataset.attribute(1, "x"), "2");
        assert_eq!(dataset.attribute(1, "y"), "");
        assert_eq!(dataset.attribute(7, "x"), "");
    }

    #[test]
    fn visible_columns_hide_internal_names() {
        let dataset = Dataset::new(
            vec!["a".to_string(), "_rowIndex".to_string(), "b".to_string()],
            Vec::new(),
            BTreeSet::new(),
        );
        let visible: Vec<&str> = dataset.visible_columns().collect();
        assert_eq!(visible, vec!["a", "b"]);
    }

    #[test]
    fn stats_count_everything() {
        let dataset = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![record(0, &[("x", "1"), ("y", "2")])],
            BTreeSet::from(["x".to_string(), "y".to_string()]),
        );
        let stats = dataset.stats();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.columns, 2);
        assert_eq!(stats.attributes, 2);
    }
}
