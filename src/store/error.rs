// src/store/error.rs

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Bad column name or type, unknown column, or a row that does not fit its table.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Unknown table or row.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        StoreError::NotFound(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// File or database unreachable/unwritable.
    pub fn is_io(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::Csv(e) => e.is_io_error(),
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(code, _)) => matches!(
                code.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::ReadOnly
                    | rusqlite::ErrorCode::SystemIoFailure
                    | rusqlite::ErrorCode::DiskFull
                    | rusqlite::ErrorCode::PermissionDenied
            ),
            _ => false,
        }
    }
}

pub trait DbResultExt<T> {
    /// Report failures to reach the database file as `Io` errors naming the path.
    fn io_context(self, path: &Path) -> StoreResult<T>;
}

impl<T> DbResultExt<T> for rusqlite::Result<T> {
    fn io_context(self, path: &Path) -> StoreResult<T> {
        self.map_err(|e| {
            let err = StoreError::Sqlite(e);
            if err.is_io() {
                StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("cannot open database {}: {}", path.display(), err),
                ))
            } else {
                err
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_helpers() {
        assert!(StoreError::validation("bad").is_validation());
        assert!(StoreError::not_found("table 'x'").is_not_found());
        let io = StoreError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"));
        assert!(io.is_io());
        assert!(!io.is_validation());
    }

    #[test]
    fn test_display_is_user_facing() {
        let e = StoreError::validation("column 'qty' already exists on table 'sales'");
        assert_eq!(
            e.to_string(),
            "Validation error: column 'qty' already exists on table 'sales'"
        );
    }
}
