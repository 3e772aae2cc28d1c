//! Row enrichment: row indexes and parsed attributes.

use std::collections::BTreeSet;
use std::time::Instant;

use iqt_model::{Dataset, EnrichedRecord, RawRecord};

use crate::attributes::parse_attributes;

const ATTRIBUTES_NAME: &str = "participant attributes";
const FORMATTED_SUFFIX: &str = "formatted";

/// Output of [`enrich_records`].
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    /// Every key seen in any record's attributes.
    pub attribute_keys: BTreeSet<String>,
    /// Column the attributes were parsed from.
    pub attribute_column: Option<String>,
}

/// Picks the column holding participant attributes.
///
/// A "formatted" attributes column is preferred over the raw one. Matching is
/// case-insensitive and returns the first qualifying column in header order.
pub fn select_attribute_column(columns: &[String]) -> Option<&str> {
    let formatted = format!("{ATTRIBUTES_NAME} {FORMATTED_SUFFIX}");
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

    let position = lowered
        .iter()
        .position(|name| name.contains(&formatted))
        .or_else(|| {
            lowered.iter().position(|name| {
                name == ATTRIBUTES_NAME
                    || (name.contains(ATTRIBUTES_NAME) && !name.contains(FORMATTED_SUFFIX))
            })
        })?;
    Some(columns[position].as_str())
}

/// Assigns row indexes in input order and parses each row's attributes.
pub fn enrich_records(columns: &[String], records: Vec<RawRecord>) -> Enrichment {
    let start = Instant::now();
    let attribute_column = select_attribute_column(columns).map(str::to_string);
    if attribute_column.is_none() {
        tracing::warn!("no participant attributes column found; attributes will be empty");
    }

    let mut attribute_keys = BTreeSet::new();
    let enriched: Vec<EnrichedRecord> = records
        .into_iter()
        .enumerate()
        .map(|(row_index, values)| {
            let source = attribute_column
                .as_deref()
                .and_then(|column| values.get(column))
                .unwrap_or("");
            let attributes = parse_attributes(source);
            attribute_keys.extend(attributes.keys().cloned());
            EnrichedRecord {
                row_index,
                values,
                attributes,
            }
        })
        .collect();

    tracing::info!(
        rows = enriched.len(),
        attributes = attribute_keys.len(),
        column = attribute_column.as_deref().unwrap_or("-"),
        duration_ms = start.elapsed().as_millis(),
        "enrichment complete"
    );
    Enrichment {
        records: enriched,
        attribute_keys,
        attribute_column,
    }
}

/// Enriches merged rows and assembles the dataset.
pub fn build_dataset(columns: Vec<String>, records: Vec<RawRecord>) -> Dataset {
    let Enrichment {
        records,
        attribute_keys,
        attribute_column,
    } = enrich_records(&columns, records);
    Dataset::new(columns, records, attribute_keys).with_attribute_column(attribute_column)
}
