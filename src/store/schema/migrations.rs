// src/store/schema/migrations.rs

use super::writer;
use crate::store::error::StoreResult;
use rusqlite::{params, Connection};

/// Create migration tracking table
pub fn ensure_migration_tracking(conn: &Connection) -> StoreResult<()> {
    writer::create_migration_tracking_table(conn)
}

/// Check if a specific migration version has been applied
pub fn is_migration_applied(conn: &Connection, version: i32) -> StoreResult<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM _SchemaVersions WHERE version = ?",
        params![version],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Mark a migration as applied
pub fn mark_migration_applied(conn: &Connection, version: i32, description: &str) -> StoreResult<()> {
    writer::insert_migration_record(conn, version, description)
}

/// Versions applied so far, ascending
#[cfg(test)]
pub fn applied_versions(conn: &Connection) -> StoreResult<Vec<i32>> {
    let mut stmt = conn.prepare("SELECT version FROM _SchemaVersions ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i32>, _>>()?;
    Ok(versions)
}
