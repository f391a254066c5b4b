// src/cli/config.rs
use std::path::PathBuf;

use super::{CliError, CliResult};
use crate::settings::AppSettings;

#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub data_dir: Option<PathBuf>,
    pub db_file: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl ConfigChanges {
    pub fn is_empty(&self) -> bool {
        self.data_dir.is_none() && self.db_file.is_none() && self.export_dir.is_none() && self.log_filter.is_none()
    }

    /// Apply the changes; returns false when nothing was given.
    pub fn apply(self, settings: &mut AppSettings) -> Result<bool, CliError> {
        if self.is_empty() {
            return Ok(false);
        }
        if let Some(file) = self.db_file {
            if file.trim().is_empty() {
                return Err(CliError::Usage("database file name cannot be empty".to_string()));
            }
            settings.db_file = file.trim().to_string();
        }
        if let Some(dir) = self.data_dir {
            settings.data_dir = Some(dir);
        }
        if let Some(dir) = self.export_dir {
            settings.export_dir = Some(dir);
        }
        if let Some(filter) = self.log_filter {
            settings.log_filter = filter;
        }
        Ok(true)
    }
}

pub fn run(mut settings: AppSettings, changes: ConfigChanges) -> CliResult {
    if changes.apply(&mut settings)? {
        let path = settings.save()?;
        println!("Settings saved to {}", path.display());
    } else {
        println!("Settings file: {}", AppSettings::config_path()?.display());
    }
    println!("Database:      {}", settings.store_config().db_path().display());
    match &settings.export_dir {
        Some(dir) => println!("Export dir:    {}", dir.display()),
        None => println!("Export dir:    (working directory)"),
    }
    println!("Log filter:    {}", settings.log_filter);
    Ok(())
}
