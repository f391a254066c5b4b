// src/store/schema/mod.rs

mod helpers;
pub mod migrations;
pub mod queries;
mod table_creation;
pub mod writer;

pub use helpers::*;
pub use table_creation::initialize;

use tracing::debug;

use super::definitions::{BaseTable, ColumnDefinition, TableDefinition};
use super::error::{StoreError, StoreResult};
use super::value::Value;
use super::Store;

/// Owns table and column definitions. Tables are fixed; columns grow at runtime.
pub struct SchemaStore;

impl SchemaStore {
    /// Base tables in their fixed order
    pub fn table_names() -> Vec<&'static str> {
        BaseTable::ALL.iter().map(|t| t.name()).collect()
    }

    /// Resolve a user supplied table name to its canonical form
    pub fn resolve_table(table: &str) -> StoreResult<&'static str> {
        BaseTable::from_name(table)
            .map(BaseTable::name)
            .ok_or_else(|| StoreError::not_found(format!("table '{}'", table.trim())))
    }

    /// Current columns of a table in catalog order
    pub fn get_columns(store: &Store, table: &str) -> StoreResult<Vec<ColumnDefinition>> {
        let table = Self::resolve_table(table)?;
        queries::require_table(store.conn(), table)?;
        queries::read_catalog_columns(store.conn(), table)
    }

    pub fn table_definition(store: &Store, table: &str) -> StoreResult<TableDefinition> {
        let name = Self::resolve_table(table)?;
        Ok(TableDefinition {
            name: name.to_string(),
            columns: Self::get_columns(store, name)?,
        })
    }

    /// Add a column to an existing table. Existing rows take the column's
    /// default, or NULL when it has none.
    pub fn add_column(store: &mut Store, table: &str, column: ColumnDefinition) -> StoreResult<()> {
        let table = Self::resolve_table(table)?;
        let existing = Self::get_columns(store, table)?;

        validate_identifier(&column.name).map_err(StoreError::Validation)?;
        if let Some(dup) = existing.iter().find(|c| c.name.eq_ignore_ascii_case(&column.name)) {
            return Err(StoreError::validation(format!(
                "column '{}' already exists on table '{}'",
                dup.name, table
            )));
        }
        // Untracked physical columns would make the ALTER fail with a raw SQLite error
        if queries::column_exists(store.conn(), table, &column.name)? {
            return Err(StoreError::validation(format!(
                "column '{}' already exists on table '{}'",
                column.name, table
            )));
        }

        let default = match column.default {
            Some(v) => match v.coerce(column.column_type) {
                Ok(Value::Null) => None,
                Ok(v) => Some(v),
                Err(msg) => {
                    return Err(StoreError::validation(format!(
                        "default for '{}' does not match its type: {}",
                        column.name, msg
                    )))
                }
            },
            None => None,
        };
        if !column.nullable && default.is_none() {
            return Err(StoreError::validation(format!(
                "non-nullable column '{}' needs a default for existing rows",
                column.name
            )));
        }
        let column = ColumnDefinition { default, ..column };

        let index = queries::next_column_index(store.conn(), table)?;
        debug!("Adding column '{}' to '{}' at index {}", column.name, table, index);
        writer::add_column(store.conn_mut(), table, index, &column)
    }
}
