// src/cli/schema.rs
use super::CliResult;
use crate::properties::{PropertyRequest, PropertyService};
use crate::store::{DbReader, SchemaStore, Store};

pub fn run_init(store: &Store) -> CliResult {
    match store.path() {
        Some(path) => println!("Database ready: {}", path.display()),
        None => println!("Database ready (in memory)"),
    }
    run_tables(store)
}

pub fn run_tables(store: &Store) -> CliResult {
    println!("{:<12} {}", "Table", "Rows");
    println!("{}", "-".repeat(20));
    for table in SchemaStore::table_names() {
        println!("{:<12} {}", table, DbReader::count(store, table)?);
    }
    Ok(())
}

pub fn run_columns(store: &Store, table: &str) -> CliResult {
    let columns = SchemaStore::get_columns(store, table)?;
    println!("{:<24} {:<10} {:<10} {}", "Column", "Type", "Nullable", "Default");
    println!("{}", "-".repeat(60));
    for col in &columns {
        println!(
            "{:<24} {:<10} {:<10} {}",
            col.name,
            col.column_type,
            if col.nullable { "yes" } else { "no" },
            col.fill_value()
        );
    }
    Ok(())
}

pub fn run_add_property(
    store: &mut Store,
    table: String,
    name: String,
    type_name: String,
    default: Option<String>,
    required: bool,
) -> CliResult {
    let mut request = PropertyRequest::new(table, name, type_name);
    if let Some(default) = default {
        request = request.with_default(default);
    }
    request.required = required;
    let column = PropertyService::add_property(store, &request)?;
    println!("Added '{}' ({}) to '{}'", column.name, column.column_type, request.table.trim());
    Ok(())
}
