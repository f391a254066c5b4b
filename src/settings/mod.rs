pub mod io;

pub use io::{LoadOutcome, SettingsError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::{StoreConfig, DEFAULT_DB_FILE};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Directory holding the database; `None` means the Documents folder default.
    pub data_dir: Option<PathBuf>,
    pub db_file: String,
    /// Where `export` writes when given a bare file name.
    pub export_dir: Option<PathBuf>,
    /// tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_file: DEFAULT_DB_FILE.to_string(),
            export_dir: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppSettings {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            data_dir: self.data_dir.clone().unwrap_or_else(StoreConfig::default_dir),
            file_name: self.db_file.clone(),
        }
    }

    /// Resolve an export destination against `export_dir` when it is relative.
    pub fn export_path(&self, destination: &std::path::Path) -> PathBuf {
        match &self.export_dir {
            Some(dir) if destination.is_relative() => dir.join(destination),
            _ => destination.to_path_buf(),
        }
    }
}
