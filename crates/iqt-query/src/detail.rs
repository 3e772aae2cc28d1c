//! Single-row detail view.

use serde::Serialize;

use iqt_model::{ATTRIBUTES_COLUMN, AttributeMap, Dataset, is_internal_column};

use crate::result::QueryResult;

/// Raw attribute columns are already shown parsed, so they are left out of
/// the structured half.
const ATTRIBUTES_NAME: &str = "participant attributes";

/// A result row split into its data columns and its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDetail {
    pub structured: Vec<(String, String)>,
    /// Sorted by key.
    pub attributes: Vec<(String, String)>,
}

impl RowDetail {
    /// Builds the detail of result row `row`.
    ///
    /// Attributes come from the dataset when the row carries its row index,
    /// otherwise from a selected attribute map column. A row with neither has
    /// no attributes.
    pub fn from_result(result: &QueryResult, row: usize, dataset: &Dataset) -> Option<Self> {
        let cells = result.row(row)?;

        let structured = result
            .columns()
            .iter()
            .zip(cells)
            .filter(|(name, _)| {
                !is_internal_column(name) && !name.to_lowercase().contains(ATTRIBUTES_NAME)
            })
            .map(|(name, cell)| (name.clone(), cell.to_string()))
            .collect();

        let attributes: AttributeMap = match result.source_row_index(row) {
            Some(index) => dataset
                .record(index)
                .map(|record| record.attributes.clone())
                .unwrap_or_default(),
            None => result
                .column_index(ATTRIBUTES_COLUMN)
                .and_then(|column| cells.get(column))
                .and_then(|cell| cell.as_text())
                .and_then(|json| serde_json::from_str(json).ok())
                .unwrap_or_default(),
        };

        Some(Self {
            structured,
            attributes: attributes.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::CellValue;
    use iqt_model::{EnrichedRecord, RawRecord};
    use std::collections::BTreeSet;

    fn dataset() -> Dataset {
        let columns = vec!["Queue".to_string()];
        let records = vec![EnrichedRecord {
            row_index: 0,
            values: RawRecord::from_cells(&columns, &["Support"]),
            attributes: [
                ("zeta".to_string(), "1".to_string()),
                ("alpha".to_string(), "2".to_string()),
            ]
            .into(),
        }];
        Dataset::new(columns, records, BTreeSet::new())
    }

    #[test]
    fn splits_structured_and_attributes() {
        let result = QueryResult::new(
            vec![
                "Queue".into(),
                "Participant Attributes".into(),
                "_rowIndex".into(),
            ],
            vec![vec![
                CellValue::Text("Support".into()),
                CellValue::Text("raw".into()),
                CellValue::Integer(0),
            ]],
        );
        let detail = RowDetail::from_result(&result, 0, &dataset()).unwrap();
        assert_eq!(
            detail.structured,
            vec![("Queue".to_string(), "Support".to_string())]
        );
        assert_eq!(
            detail.attributes,
            vec![
                ("alpha".to_string(), "2".to_string()),
                ("zeta".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn attributes_from_json_column() {
        let result = QueryResult::new(
            vec!["_attributes".into()],
            vec![vec![CellValue::Text(r#"{"k":"v"}"#.into())]],
        );
        let detail = RowDetail::from_result(&result, 0, &dataset()).unwrap();
        assert!(detail.structured.is_empty());
        assert_eq!(detail.attributes, vec![("k".to_string(), "v".to_string())]);
    }

    #[test]
    fn row_without_attribute_source() {
        let result = QueryResult::new(
            vec!["n".into()],
            vec![vec![CellValue::Integer(3)]],
        );
        let detail = RowDetail::from_result(&result, 0, &dataset()).unwrap();
        assert!(detail.attributes.is_empty());
        assert!(RowDetail::from_result(&result, 1, &dataset()).is_none());
    }
}
