// src/store/writer/insertions.rs
// Insert operations

use rusqlite::{Connection, ToSql};

use super::helpers::build_insert_sql;
use crate::store::definitions::{ColumnDefinition, RowData, RowId, TableDefinition};
use crate::store::error::{StoreError, StoreResult};
use crate::store::value::Value;

/// Validated cells ready to be written
pub struct PreparedRow<'a> {
    cells: Vec<(&'a ColumnDefinition, Value)>,
}

/// Check a row against the table: known columns, matching types, and every
/// non-nullable column without a default present.
pub fn prepare_row(def: &TableDefinition, data: RowData) -> StoreResult<PreparedRow<'_>> {
    let cells = def.conform(data)?;
    for col in &def.columns {
        let given = cells.iter().any(|(c, _)| c.name == col.name);
        if !given && !col.nullable && col.default.is_none() {
            return Err(StoreError::validation(format!(
                "column '{}' on table '{}' is required",
                col.name, def.name
            )));
        }
    }
    Ok(PreparedRow { cells })
}

/// Insert a prepared row, returning its new id
pub fn insert_prepared(conn: &Connection, table_name: &str, row: &PreparedRow<'_>) -> StoreResult<RowId> {
    let names: Vec<&str> = row.cells.iter().map(|(c, _)| c.name.as_str()).collect();
    let sql = build_insert_sql(table_name, &names);
    let params: Vec<&dyn ToSql> = row.cells.iter().map(|(_, v)| v as &dyn ToSql).collect();
    conn.execute(&sql, params.as_slice())?;
    Ok(conn.last_insert_rowid())
}

/// Insert many rows in one transaction; nothing is written if any row is rejected
pub fn insert_rows(conn: &mut Connection, def: &TableDefinition, rows: Vec<RowData>) -> StoreResult<Vec<RowId>> {
    let prepared = rows
        .into_iter()
        .enumerate()
        .map(|(i, data)| {
            prepare_row(def, data).map_err(|e| match e {
                StoreError::Validation(msg) => StoreError::validation(format!("row {}: {}", i + 1, msg)),
                other => other,
            })
        })
        .collect::<StoreResult<Vec<_>>>()?;

    let tx = conn.transaction()?;
    let mut ids = Vec::with_capacity(prepared.len());
    for row in &prepared {
        ids.push(insert_prepared(&tx, &def.name, row)?);
    }
    tx.commit()?;
    Ok(ids)
}
