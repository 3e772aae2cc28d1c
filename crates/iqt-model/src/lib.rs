//! Core data model for the interaction query tool.
//!
//! A load turns one or more CSV exports into a single [`Dataset`]: an ordered
//! header, the merged rows as [`EnrichedRecord`]s and the set of attribute keys
//! seen across all rows. The active dataset is shared through a
//! [`DatasetHandle`], which swaps whole snapshots and never mutates one in place.

mod columns;
mod dataset;
mod handle;
mod record;
mod validation;

pub use columns::{ATTRIBUTES_COLUMN, INTERNAL_COLUMNS, ROW_INDEX_COLUMN, is_internal_column};
pub use dataset::{Dataset, DatasetStats};
pub use handle::DatasetHandle;
pub use record::{AttributeMap, EnrichedRecord, RawRecord};
pub use validation::{FileValidation, ValidationStatus, ValidationSummary};
