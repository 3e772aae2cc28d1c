//! Input file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Returns true when `path` has a `.csv` extension (case-insensitive).
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if path.is_file() && is_csv_file(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Expands command-line inputs into an ordered list of CSV files.
///
/// Directories contribute their CSV files in name order at their position in
/// the input list. Files without a `.csv` extension are skipped with a warning.
pub fn expand_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if path.is_dir() {
            files.extend(list_csv_files(path)?);
        } else if !path.exists() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        } else if is_csv_file(path) {
            files.push(path.to_path_buf());
        } else {
            tracing::warn!(path = %path.display(), "skipping non-CSV file");
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in &["b_export.csv", "a_export.CSV", "notes.txt"] {
            std::fs::write(dir.path().join(name), "header\ndata").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_csv_files_sorted() {
        let dir = create_test_dir();
        let files = list_csv_files(dir.path()).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_export.CSV", "b_export.csv"]);
    }

    #[test]
    fn test_list_csv_files_missing_dir() {
        let result = list_csv_files(Path::new("/nonexistent/dir"));
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_expand_inputs_keeps_order() {
        let dir = create_test_dir();
        let single = dir.path().join("b_export.csv");
        let files = expand_inputs(&[single.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0], single);
    }

    #[test]
    fn test_expand_inputs_skips_non_csv() {
        let dir = create_test_dir();
        let files = expand_inputs(&[dir.path().join("notes.txt")]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_expand_inputs_missing_file() {
        let result = expand_inputs(&[PathBuf::from("/nonexistent/file.csv")]);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
