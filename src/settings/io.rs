// src/settings/io.rs
// Reading and writing the settings file

use directories_next::ProjectDirs;
use std::fs;
use std::io::{self, BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::AppSettings;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "Costbook";
const APPLICATION: &str = "Costbook";
const CONFIG_FILE: &str = "app_settings.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not determine the settings directory")]
    NoConfigDir,
    #[error("Cannot access settings file {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Settings file {} is not valid JSON: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
}

/// How `load_from` found the settings; reported once logging is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Missing,
}

impl AppSettings {
    /// `<config dir>/Costbook/app_settings.json`, creating the directory.
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(SettingsError::NoConfigDir)?;
        let config_dir = dirs.config_dir();
        fs::create_dir_all(config_dir).map_err(|source| SettingsError::Io {
            path: config_dir.to_path_buf(),
            source,
        })?;
        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Read settings; a missing file yields the defaults. Does not log, so it
    /// can run before the subscriber is installed.
    pub fn load_from(path: &Path) -> Result<(AppSettings, LoadOutcome), SettingsError> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((AppSettings::default(), LoadOutcome::Missing)),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let settings = serde_json::from_reader(BufReader::new(file)).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((settings, LoadOutcome::Loaded))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = fs::File::create(path).map_err(io_err)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }
}
