// src/store/schema/table_creation.rs

use rusqlite::Connection;
use tracing::{info, warn};

use super::migrations::{ensure_migration_tracking, is_migration_applied, mark_migration_applied};
use super::queries;
use super::writer;
use crate::store::column_type::ColumnType;
use crate::store::definitions::{BaseTable, ColumnDefinition, SYSTEM_COLUMNS};
use crate::store::error::StoreResult;

/// Bring a database to the current layout. Safe to run on every open, and on
/// files written before the column catalog existed.
pub fn initialize(conn: &mut Connection) -> StoreResult<()> {
    let tx = conn.transaction()?;

    ensure_migration_tracking(&tx)?;
    writer::create_column_catalog_table(&tx)?;

    if !is_migration_applied(&tx, 1)? {
        for table in [BaseTable::Receipts, BaseTable::Sales, BaseTable::Recipes] {
            create_base_table(&tx, table)?;
        }
        mark_migration_applied(&tx, 1, "Created receipts, sales and recipes tables")?;
    }

    if !is_migration_applied(&tx, 2)? {
        create_base_table(&tx, BaseTable::Inventory)?;
        mark_migration_applied(&tx, 2, "Created inventory table")?;
    }

    for table in BaseTable::ALL {
        reconcile_catalog(&tx, table.name())?;
    }

    tx.commit()?;
    Ok(())
}

/// Create a base table and register its initial columns
fn create_base_table(conn: &Connection, table: BaseTable) -> StoreResult<()> {
    let columns = table.initial_columns();
    writer::create_data_table(conn, table.name(), &columns)?;

    if queries::read_catalog_columns(conn, table.name())?.is_empty() {
        for (idx, col) in columns.iter().enumerate() {
            writer::insert_catalog_column(conn, table.name(), idx as i64, col)?;
        }
    }
    info!("Created table '{}' with {} columns", table.name(), columns.len());
    Ok(())
}

/// Make catalog and physical table agree: catalog columns missing from the
/// table are re-added, untracked physical columns are registered.
pub fn reconcile_catalog(conn: &Connection, table_name: &str) -> StoreResult<()> {
    let physical = queries::get_physical_columns(conn, table_name)?;
    let catalog = queries::read_catalog_columns(conn, table_name)?;

    for col in &catalog {
        if !physical.iter().any(|(name, _)| name.eq_ignore_ascii_case(&col.name)) {
            warn!("Restoring column '{}' missing from table '{}'", col.name, table_name);
            writer::alter_add_column(conn, table_name, col)?;
        }
    }

    let mut next_index = queries::next_column_index(conn, table_name)?;
    for (name, sql_type) in &physical {
        let is_system = SYSTEM_COLUMNS.iter().any(|s| s.eq_ignore_ascii_case(name));
        let tracked = catalog.iter().any(|c| c.name.eq_ignore_ascii_case(name));
        if is_system || tracked {
            continue;
        }
        let column = ColumnDefinition::new(name.clone(), column_type_for_sql(sql_type));
        warn!(
            "Registering untracked column '{}' on table '{}' as {}",
            name, table_name, column.column_type
        );
        writer::insert_catalog_column(conn, table_name, next_index, &column)?;
        next_index += 1;
    }
    Ok(())
}

/// Best-effort mapping of a declared SQLite type back to a column type
fn column_type_for_sql(sql_type: &str) -> ColumnType {
    let upper = sql_type.to_ascii_uppercase();
    if upper.contains("INT") {
        ColumnType::Integer
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") || upper.contains("NUM") {
        ColumnType::Decimal
    } else if upper.contains("DATE") {
        ColumnType::Date
    } else {
        ColumnType::Text
    }
}
