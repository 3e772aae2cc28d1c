//! User settings, stored as TOML.
//!
//! Settings live in the platform configuration folder (on Linux,
//! `~/.config/interactionquery/settings.toml`). A `--config PATH` flag
//! replaces the platform location.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use iqt_ingest::DEFAULT_HEADER_BYTE_BUDGET;
use iqt_query::{DEFAULT_PAGE_SIZE, DEFAULT_TABLE_NAME};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "interaction-query";
const APP_NAME: &str = "Interaction Query";
const CONFIG_FILENAME: &str = "settings.toml";

/// Cells longer than this are shown truncated.
pub const DEFAULT_MAX_CELL_WIDTH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ingest: IngestSettings,
    pub query: QuerySettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Bytes read from the start of each file to find its header.
    pub header_byte_budget: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            header_byte_budget: DEFAULT_HEADER_BYTE_BUDGET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub table_name: String,
    pub page_size: usize,
    /// Query run when none is given. Derived from the table name when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_query: Option<String>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            default_query: None,
        }
    }
}

impl QuerySettings {
    pub fn default_query(&self) -> String {
        self.default_query
            .clone()
            .unwrap_or_else(|| format!("SELECT * FROM {} LIMIT {}", self.table_name, self.page_size))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub max_cell_width: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_cell_width: DEFAULT_MAX_CELL_WIDTH,
        }
    }
}

/// Get the path to the platform settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from `explicit` or the platform settings file.
///
/// Returns default settings if the file doesn't exist, cannot be parsed, or
/// the platform-specific directory cannot be determined.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_path() {
            Some(path) => path,
            None => {
                tracing::warn!("could not determine settings path, using defaults");
                return Settings::default();
            }
        },
    };
    load_settings_from(&path)
}

fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to parse settings, using defaults");
                Settings::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Settings::default()
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to read settings, using defaults");
            Settings::default()
        }
    }
}
