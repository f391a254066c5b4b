// src/store/schema/helpers.rs

use crate::store::definitions::SYSTEM_COLUMNS;

/// Longest column name accepted for a new property.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Name of the catalog table holding declared column definitions.
pub const COLUMN_CATALOG_TABLE: &str = "_Columns";

/// Quote a SQL identifier, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Check that a user supplied column name is a plain identifier:
/// `[A-Za-z_][A-Za-z0-9_]*`, bounded length, not reserved by the store.
pub fn validate_identifier(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("column name must not be empty".to_string());
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(format!(
            "column name '{}' is longer than {} characters",
            name, MAX_IDENTIFIER_LEN
        ));
    }
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "column name '{}' must start with a letter or underscore and contain only letters, digits and underscores",
            name
        ));
    }
    if SYSTEM_COLUMNS.iter().any(|s| s.eq_ignore_ascii_case(name)) {
        return Err(format!("column name '{}' is reserved", name));
    }
    if name.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(format!("column name '{}' uses the reserved 'sqlite_' prefix", name));
    }
    Ok(())
}

/// Turn a spreadsheet caption such as `Item Code` into a column name (`item_code`).
/// Replaces any character that is not [A-Za-z0-9_] with an underscore and collapses repeats.
pub fn normalize_caption(caption: &str) -> String {
    let mut out = String::with_capacity(caption.len());
    let mut last_us = false;
    for ch in caption.trim().chars() {
        let is_ok = ch.is_ascii_alphanumeric() || ch == '_';
        if is_ok {
            out.push(ch.to_ascii_lowercase());
            last_us = false;
        } else if !last_us {
            out.push('_');
            last_us = true;
        }
    }
    out.trim_matches('_').to_string()
}
