// src/store/writer/updates.rs

use rusqlite::{Connection, ToSql};

use super::helpers::build_update_sql;
use crate::store::definitions::{RowData, RowId, TableDefinition};
use crate::store::error::{StoreError, StoreResult};

/// Apply changes to one row by id
pub fn update_row(conn: &Connection, def: &TableDefinition, id: RowId, changes: RowData) -> StoreResult<()> {
    if changes.is_empty() {
        return Err(StoreError::validation("no changes given"));
    }
    let cells = def.conform(changes)?;

    let names: Vec<&str> = cells.iter().map(|(c, _)| c.name.as_str()).collect();
    let sql = build_update_sql(&def.name, &names);
    let mut params: Vec<&dyn ToSql> = cells.iter().map(|(_, v)| v as &dyn ToSql).collect();
    params.push(&id);

    let changed = conn.execute(&sql, params.as_slice())?;
    if changed == 0 {
        return Err(StoreError::not_found(format!("row {} in table '{}'", id, def.name)));
    }
    Ok(())
}
