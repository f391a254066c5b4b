// src/store/writer/mod.rs
// Row write operations over any table and its current column set

mod deletions;
mod helpers;
mod insertions;
mod updates;
#[cfg(test)]
pub(crate) mod test_helpers;

use tracing::{debug, info};

use super::definitions::{RowData, RowId};
use super::error::StoreResult;
use super::schema::SchemaStore;
use super::Store;

/// Database writer - provides all row write operations
///
/// - `insertions`: single and batched inserts
/// - `updates`: partial row updates by id
/// - `deletions`: row removal by id
pub struct DbWriter;

impl DbWriter {
    /// Insert a row. Keys must name current columns; omitted columns take
    /// their default or NULL.
    pub fn insert(store: &mut Store, table: &str, row: RowData) -> StoreResult<RowId> {
        let def = SchemaStore::table_definition(store, table)?;
        let prepared = insertions::prepare_row(&def, row)?;
        let id = insertions::insert_prepared(store.conn(), &def.name, &prepared)?;
        debug!("Inserted row {} into '{}'", id, def.name);
        Ok(id)
    }

    /// Insert rows atomically
    pub fn insert_many(store: &mut Store, table: &str, rows: Vec<RowData>) -> StoreResult<Vec<RowId>> {
        let def = SchemaStore::table_definition(store, table)?;
        let ids = insertions::insert_rows(store.conn_mut(), &def, rows)?;
        info!("Inserted {} rows into '{}'", ids.len(), def.name);
        Ok(ids)
    }

    pub fn update(store: &mut Store, table: &str, id: RowId, changes: RowData) -> StoreResult<()> {
        let def = SchemaStore::table_definition(store, table)?;
        updates::update_row(store.conn(), &def, id, changes)?;
        debug!("Updated row {} in '{}'", id, def.name);
        Ok(())
    }

    pub fn delete(store: &mut Store, table: &str, id: RowId) -> StoreResult<()> {
        let table = SchemaStore::resolve_table(table)?;
        deletions::delete_row(store.conn(), table, id)?;
        debug!("Deleted row {} from '{}'", id, table);
        Ok(())
    }
}
