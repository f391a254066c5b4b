// src/store/connection.rs

use super::error::{DbResultExt, StoreResult};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, warn};

pub struct StoreConnection;

impl StoreConnection {
    /// Opens (creating if needed) a database file with WAL journaling.
    /// PRAGMA settings are per connection, so they are applied on every open.
    pub fn open_file(path: &Path) -> StoreResult<Connection> {
        let conn = Connection::open(path).io_context(path)?;

        let journal_mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        if journal_mode.to_uppercase() != "WAL" {
            warn!(
                "Failed to set WAL mode on database {:?}. Current mode: {}. The file may be open elsewhere.",
                path.file_name(),
                journal_mode
            );
        } else {
            debug!("WAL mode activated for database {:?}", path.file_name());
        }

        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        Ok(conn)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> StoreResult<Connection> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(conn)
    }
}
