// src/store/writer/helpers.rs
// Helper functions for SQL generation

use crate::store::schema::quote_identifier;

/// Build a comma-separated list of quoted column names.
pub fn quote_column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a string of SQL placeholders (?, ?, ?, ...).
pub fn build_placeholders(count: usize) -> String {
    (0..count).map(|_| "?").collect::<Vec<_>>().join(", ")
}

/// Build an INSERT statement; with no columns every cell takes its default.
pub fn build_insert_sql(table_name: &str, columns: &[&str]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote_identifier(table_name));
    }
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table_name),
        quote_column_list(columns),
        build_placeholders(columns.len())
    )
}

/// Build an UPDATE statement setting `columns` on the row with a given id.
pub fn build_update_sql(table_name: &str, columns: &[&str]) -> String {
    let assignments = columns
        .iter()
        .map(|c| format!("{} = ?", quote_identifier(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE id = ?",
        quote_identifier(table_name),
        assignments
    )
}

/// Build a DELETE statement.
pub fn build_delete_sql(table_name: &str, where_clause: &str) -> String {
    format!("DELETE FROM {} WHERE {}", quote_identifier(table_name), where_clause)
}
