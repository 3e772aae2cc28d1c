//! Shared access to the active dataset.

use std::sync::{Arc, PoisonError, RwLock};

use crate::dataset::Dataset;

/// Holds the single active [`Dataset`] and hands out immutable snapshots.
///
/// Readers keep the `Arc` they were given for as long as they need it; a load
/// or reset swaps in a new `Arc` and never touches a snapshot already handed out.
#[derive(Debug, Clone, Default)]
pub struct DatasetHandle {
    inner: Arc<RwLock<Arc<Dataset>>>,
}

impl DatasetHandle {
    /// Creates a handle holding an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<Dataset> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the active dataset and returns the new snapshot.
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let next = Arc::new(dataset);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }

    /// Clears the active dataset.
    pub fn reset(&self) {
        self.replace(Dataset::default());
    }

    pub fn is_loaded(&self) -> bool {
        !self.snapshot().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::record::{EnrichedRecord, RawRecord};

    fn one_row_dataset() -> Dataset {
        Dataset::new(
            vec!["a".to_string()],
            vec![EnrichedRecord {
                row_index: 0,
                values: RawRecord::new(),
                attributes: Default::default(),
            }],
            BTreeSet::new(),
        )
    }

    #[test]
    fn starts_empty() {
        let handle = DatasetHandle::new();
        assert!(!handle.is_loaded());
        assert!(handle.snapshot().is_empty());
    }

    #[test]
    fn snapshot_survives_replacement() {
        let handle = DatasetHandle::new();
        handle.replace(one_row_dataset());
        let before = handle.snapshot();

        handle.reset();

        assert_eq!(before.len(), 1);
        assert!(handle.snapshot().is_empty());
        assert!(!Arc::ptr_eq(&before, &handle.snapshot()));
    }

    #[test]
    fn clones_share_the_active_dataset() {
        let handle = DatasetHandle::new();
        let other = handle.clone();
        handle.replace(one_row_dataset());
        assert!(other.is_loaded());
    }
}
