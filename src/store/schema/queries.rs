// src/store/schema/queries.rs
// READ-only schema queries. Writes live in schema/writer.rs.

use rusqlite::{params, Connection};
use tracing::{debug, warn};

use super::helpers::{quote_identifier, COLUMN_CATALOG_TABLE};
use crate::store::column_type::{parse_column_type, ColumnType};
use crate::store::definitions::ColumnDefinition;
use crate::store::error::{StoreError, StoreResult};
use crate::store::value::Value;

/// Check if a table exists in the database
pub fn table_exists(conn: &Connection, table_name: &str) -> StoreResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
        [table_name],
        |row| row.get(0),
    )?;
    if count == 0 {
        debug!("Table '{}' not found", table_name);
    }
    Ok(count > 0)
}

/// Verify table exists or return error
pub fn require_table(conn: &Connection, table_name: &str) -> StoreResult<()> {
    if !table_exists(conn, table_name)? {
        return Err(StoreError::not_found(format!("table '{}'", table_name)));
    }
    Ok(())
}

/// Physical (name, declared SQL type) pairs in table order
pub fn get_physical_columns(conn: &Connection, table_name: &str) -> StoreResult<Vec<(String, String)>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table_name)))?;
    let columns = stmt
        .query_map([], |r| Ok((r.get::<_, String>(1)?, r.get::<_, String>(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Catalog entries for a table ordered by column_index
pub fn read_catalog_columns(conn: &Connection, table_name: &str) -> StoreResult<Vec<ColumnDefinition>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT column_name, data_type, nullable, default_value
         FROM {} WHERE table_name = ? ORDER BY column_index",
        COLUMN_CATALOG_TABLE
    ))?;

    let raw = stmt
        .query_map([table_name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(name, data_type, nullable, default_json)| {
            let column_type = parse_column_type(&data_type).unwrap_or_else(|| {
                warn!(
                    "Unknown data type '{}' for '{}.{}' in catalog, treating as text",
                    data_type, table_name, name
                );
                ColumnType::Text
            });
            let default = match default_json {
                Some(json) => {
                    let value: Value = serde_json::from_str(&json)?;
                    match value.coerce(column_type) {
                        Ok(Value::Null) => None,
                        Ok(v) => Some(v),
                        Err(msg) => {
                            warn!("Ignoring stored default for '{}.{}': {}", table_name, name, msg);
                            None
                        }
                    }
                }
                None => None,
            };
            Ok(ColumnDefinition {
                name,
                column_type,
                nullable,
                default,
            })
        })
        .collect()
}

/// Next free catalog position for a table
pub fn next_column_index(conn: &Connection, table_name: &str) -> StoreResult<i64> {
    let max: Option<i64> = conn.query_row(
        &format!(
            "SELECT MAX(column_index) FROM {} WHERE table_name = ?",
            COLUMN_CATALOG_TABLE
        ),
        params![table_name],
        |row| row.get(0),
    )?;
    Ok(max.map(|m| m + 1).unwrap_or(0))
}

/// Check if a column exists in a table (case-insensitive)
pub fn column_exists(conn: &Connection, table_name: &str, column_name: &str) -> StoreResult<bool> {
    if !table_exists(conn, table_name)? {
        return Ok(false);
    }
    let columns = get_physical_columns(conn, table_name)?;
    Ok(columns.iter().any(|(c, _)| c.eq_ignore_ascii_case(column_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_require_table_reports_not_found() {
        let store = Store::open_in_memory().unwrap();
        let err = require_table(store.conn(), "suppliers").unwrap_err();
        assert!(err.is_not_found());
        assert!(require_table(store.conn(), "sales").is_ok());
    }

    #[test]
    fn test_catalog_matches_physical_layout() {
        let store = Store::open_in_memory().unwrap();
        let catalog: Vec<String> = read_catalog_columns(store.conn(), "inventory")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        let physical: Vec<String> = get_physical_columns(store.conn(), "inventory")
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(catalog, vec!["item", "quantity"]);
        assert_eq!(physical, vec!["id", "created_at", "item", "quantity"]);
        assert_eq!(next_column_index(store.conn(), "inventory").unwrap(), 2);
    }

    #[test]
    fn test_column_exists_is_case_insensitive() {
        let store = Store::open_in_memory().unwrap();
        assert!(column_exists(store.conn(), "receipts", "Cost_Center").unwrap());
        assert!(!column_exists(store.conn(), "receipts", "unit_cost").unwrap());
        assert!(!column_exists(store.conn(), "missing", "x").unwrap());
    }
}
