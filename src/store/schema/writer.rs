// src/store/schema/writer.rs
// Schema write operations: DDL and column catalog maintenance

use rusqlite::{params, Connection};
use tracing::info;

use super::helpers::{quote_identifier, COLUMN_CATALOG_TABLE};
use crate::store::definitions::ColumnDefinition;
use crate::store::error::StoreResult;

/// Create the migration tracking table
pub fn create_migration_tracking_table(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _SchemaVersions (
            version INTEGER PRIMARY KEY,
            applied_at TEXT DEFAULT CURRENT_TIMESTAMP,
            description TEXT
        )",
        [],
    )?;
    Ok(())
}

/// Record a migration version as applied
pub fn insert_migration_record(conn: &Connection, version: i32, description: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO _SchemaVersions (version, description) VALUES (?, ?)",
        params![version, description],
    )?;
    Ok(())
}

/// Create the column catalog table
pub fn create_column_catalog_table(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {} (
                table_name TEXT NOT NULL,
                column_index INTEGER NOT NULL,
                column_name TEXT NOT NULL COLLATE NOCASE,
                data_type TEXT NOT NULL,
                nullable INTEGER NOT NULL DEFAULT 1,
                default_value TEXT,
                added_at TEXT DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (table_name, column_name),
                UNIQUE (table_name, column_index)
            )",
            COLUMN_CATALOG_TABLE
        ),
        [],
    )?;
    Ok(())
}

/// Physical column clause, e.g. `"unit_cost" REAL NOT NULL DEFAULT 0.0`
pub fn column_clause(column: &ColumnDefinition) -> String {
    let mut clause = format!(
        "{} {}",
        quote_identifier(&column.name),
        column.column_type.sql_type()
    );
    if !column.nullable {
        clause.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        clause.push_str(" DEFAULT ");
        clause.push_str(&default.to_sql_literal());
    }
    clause
}

/// Create a data table with the system columns followed by `columns`
pub fn create_data_table(conn: &Connection, table_name: &str, columns: &[ColumnDefinition]) -> StoreResult<()> {
    let mut col_defs = vec![
        "id INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
        "created_at TEXT DEFAULT CURRENT_TIMESTAMP".to_string(),
    ];
    col_defs.extend(columns.iter().map(column_clause));

    let create_sql = format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table_name),
        col_defs.join(", ")
    );
    conn.execute(&create_sql, [])?;
    Ok(())
}

/// Insert a catalog row unless the column is already registered
pub fn insert_catalog_column(
    conn: &Connection,
    table_name: &str,
    column_index: i64,
    column: &ColumnDefinition,
) -> StoreResult<()> {
    let default_json = match &column.default {
        Some(v) => Some(serde_json::to_string(v)?),
        None => None,
    };
    conn.execute(
        &format!(
            "INSERT OR IGNORE INTO {} (table_name, column_index, column_name, data_type, nullable, default_value)
             VALUES (?, ?, ?, ?, ?, ?)",
            COLUMN_CATALOG_TABLE
        ),
        params![
            table_name,
            column_index,
            column.name,
            column.column_type.as_str(),
            column.nullable,
            default_json,
        ],
    )?;
    Ok(())
}

/// ALTER TABLE .. ADD COLUMN. SQLite fills existing rows with the DEFAULT clause.
pub fn alter_add_column(conn: &Connection, table_name: &str, column: &ColumnDefinition) -> StoreResult<()> {
    conn.execute(
        &format!(
            "ALTER TABLE {} ADD COLUMN {}",
            quote_identifier(table_name),
            column_clause(column)
        ),
        [],
    )?;
    Ok(())
}

/// Add a column and register it in the catalog as one unit of work
pub fn add_column(
    conn: &mut Connection,
    table_name: &str,
    column_index: i64,
    column: &ColumnDefinition,
) -> StoreResult<()> {
    let tx = conn.transaction()?;
    alter_add_column(&tx, table_name, column)?;
    insert_catalog_column(&tx, table_name, column_index, column)?;
    tx.commit()?;
    info!(
        "Added column '{}' ({}) to table '{}'",
        column.name, column.column_type, table_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::column_type::ColumnType;

    #[test]
    fn test_column_clause() {
        let col = ColumnDefinition::new("unit_cost", ColumnType::Decimal)
            .with_default(0.0)
            .not_null();
        assert_eq!(column_clause(&col), "\"unit_cost\" REAL NOT NULL DEFAULT 0.0");
        let col = ColumnDefinition::new("note", ColumnType::Text);
        assert_eq!(column_clause(&col), "\"note\" TEXT");
    }

    #[test]
    fn test_add_column_rolls_back_on_catalog_failure() {
        let mut conn = Connection::open_in_memory().unwrap();
        create_data_table(&conn, "inventory", &[ColumnDefinition::new("item", ColumnType::Text)]).unwrap();
        // Catalog table is missing, so the insert fails after the ALTER succeeded.
        let col = ColumnDefinition::new("unit_cost", ColumnType::Decimal);
        assert!(add_column(&mut conn, "inventory", 1, &col).is_err());

        let mut stmt = conn.prepare("PRAGMA table_info(\"inventory\")").unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(names, vec!["id", "created_at", "item"]);
    }
}
