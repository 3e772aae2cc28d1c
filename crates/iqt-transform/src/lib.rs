//! Participant attribute extraction.
//!
//! Parses the semicolon-delimited attribute column of every merged row and
//! attaches the result, together with a stable row index, to the record.

mod attributes;
mod enrich;

pub use attributes::parse_attributes;
pub use enrich::{Enrichment, build_dataset, enrich_records, select_attribute_column};
