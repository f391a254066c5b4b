// src/store/writer/deletions.rs

use super::helpers::build_delete_sql;
use crate::store::definitions::RowId;
use crate::store::error::{StoreError, StoreResult};
use rusqlite::{params, Connection};

/// Delete a row by primary key id
pub fn delete_row(conn: &Connection, table_name: &str, id: RowId) -> StoreResult<()> {
    let sql = build_delete_sql(table_name, "id = ?");
    let changed = conn.execute(&sql, params![id])?;
    if changed == 0 {
        return Err(StoreError::not_found(format!("row {} in table '{}'", id, table_name)));
    }
    Ok(())
}
