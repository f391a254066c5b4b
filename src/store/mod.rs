// src/store/mod.rs

pub mod column_type;
pub mod connection;
pub mod definitions;
pub mod error;
pub mod filter;
pub mod reader;
pub mod schema;
pub mod value;
pub mod writer;

pub use column_type::ColumnType;
pub use connection::StoreConnection;
pub use definitions::{BaseTable, ColumnDefinition, QueryResult, RowData, RowId, TableDefinition, ID_COLUMN};
pub use error::{StoreError, StoreResult};
pub use filter::{Filters, OrderBy, Predicate};
pub use reader::DbReader;
pub use schema::SchemaStore;
pub use value::Value;
pub use writer::DbWriter;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_DB_FILE: &str = "costbook.db";

/// Database storage configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    pub fn default_dir() -> PathBuf {
        let documents = directories_next::UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        documents.join("Costbook")
    }

    pub fn new() -> Self {
        Self {
            data_dir: Self::default_dir(),
            file_name: DEFAULT_DB_FILE.to_string(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the single local data file. Reads borrow it shared, writes
/// borrow it exclusively.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create the database file and bring its schema up to date.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = StoreConnection::open_file(path)?;
        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        schema::initialize(&mut store.conn)?;
        info!("Opened store {:?}", path);
        Ok(store)
    }

    pub fn open_with_config(config: &StoreConfig) -> StoreResult<Self> {
        config.ensure_directories()?;
        Self::open(&config.db_path())
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let mut store = Self {
            conn: StoreConnection::open_in_memory()?,
            path: None,
        };
        schema::initialize(&mut store.conn)?;
        Ok(store)
    }

    /// File backing this store; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn close(self) -> StoreResult<()> {
        let path = self.path.clone();
        self.conn.close().map_err(|(_, e)| StoreError::from(e))?;
        info!("Closed store {:?}", path);
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
