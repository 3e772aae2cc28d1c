//! Files selected for the next load.

use std::path::{Path, PathBuf};

use iqt_model::FileValidation;

use crate::discovery::is_csv_file;
use crate::error::{IngestError, Result};
use crate::validate::validate_files;

/// A file queued for merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub size: u64,
}

impl PendingFile {
    fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }
}

/// Ordered queue of files awaiting validation and merge.
///
/// The first file in the queue provides the reference header.
#[derive(Debug, Clone, Default)]
pub struct PendingFileSet {
    files: Vec<PendingFile>,
}

impl PendingFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a file.
    ///
    /// Returns `Ok(false)` when a file with the same name and size is already
    /// queued.
    pub fn add(&mut self, path: &Path) -> Result<bool> {
        if !is_csv_file(path) {
            return Err(IngestError::NotCsv {
                path: path.to_path_buf(),
            });
        }
        let size = std::fs::metadata(path)
            .map_err(|e| IngestError::from_io(path, e))?
            .len();
        let candidate = PendingFile {
            path: path.to_path_buf(),
            size,
        };

        let duplicate = self
            .files
            .iter()
            .any(|file| file.file_name() == candidate.file_name() && file.size == size);
        if duplicate {
            tracing::debug!(path = %path.display(), "file already queued");
            return Ok(false);
        }

        self.files.push(candidate);
        Ok(true)
    }

    /// Queues several files, returning how many were new.
    pub fn extend<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize> {
        let mut added = 0;
        for path in paths {
            if self.add(path.as_ref())? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Removes the file at `index`. Removing the first file changes the reference.
    pub fn remove(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|file| file.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Validates every queued file's header against the first one.
    pub fn validate(&self, byte_budget: usize) -> Vec<FileValidation> {
        validate_files(&self.paths(), byte_budget)
    }
}
