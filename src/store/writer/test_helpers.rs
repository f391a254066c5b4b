// src/store/writer/test_helpers.rs
// Test utilities shared by store tests

use chrono::NaiveDate;
use rusqlite::Connection;

use super::DbWriter;
use crate::store::definitions::{RowData, RowId};
use crate::store::value::Value;
use crate::store::Store;

/// Build a row from `(column, value)` pairs.
///
/// # Example
/// ```ignore
/// let r = row(&[("item", Value::from("Flour"))]);
/// ```
pub fn row(cells: &[(&str, Value)]) -> RowData {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Insert three sales rows:
/// - 2024-01-01, A01, value 50, discount 5
/// - 2024-01-05, B01, value 120, discount 0
/// - 2024-01-20, B01, value 300, no discount
pub fn seed_sales(store: &mut Store) -> Vec<RowId> {
    let rows = vec![
        row(&[
            ("date", date(2024, 1, 1)),
            ("item_code", Value::from("A01")),
            ("item_name", Value::from("Espresso")),
            ("quantity", Value::from(10.0)),
            ("rate", Value::from(5.0)),
            ("value", Value::from(50.0)),
            ("discount", Value::from(5.0)),
        ]),
        row(&[
            ("date", date(2024, 1, 5)),
            ("item_code", Value::from("B01")),
            ("item_name", Value::from("Burger")),
            ("quantity", Value::from(4.0)),
            ("rate", Value::from(30.0)),
            ("value", Value::from(120.0)),
            ("discount", Value::from(0.0)),
        ]),
        row(&[
            ("date", date(2024, 1, 20)),
            ("item_code", Value::from("B01")),
            ("item_name", Value::from("Burger")),
            ("quantity", Value::from(10.0)),
            ("rate", Value::from(30.0)),
            ("value", Value::from(300.0)),
        ]),
    ];
    DbWriter::insert_many(store, "sales", rows).unwrap()
}

/// Insert receipts for two months and two cost centers. Total value 1000.
pub fn seed_receipts(store: &mut Store) -> Vec<RowId> {
    let rows = [
        ("2024-01", "Kitchen", "Dry Goods", 10.0, 200.0),
        ("2024-01", "Bar", "Beverage", 5.0, 100.0),
        ("2024-02", "Kitchen", "Dry Goods", 20.0, 400.0),
        ("2024-02", "Kitchen", "Dairy", 15.0, 300.0),
    ]
    .into_iter()
    .map(|(month, center, group, qty, value)| {
        row(&[
            ("month", Value::from(month)),
            ("cost_center", Value::from(center)),
            ("item_group", Value::from(group)),
            ("qty", Value::from(qty)),
            ("value", Value::from(value)),
        ])
    })
    .collect();
    DbWriter::insert_many(store, "receipts", rows).unwrap()
}

/// A receipts table as written by the first release, before the column
/// catalog existed: a subset of today's columns plus one extra.
pub fn create_legacy_receipts_table(conn: &Connection) {
    conn.execute(
        "CREATE TABLE receipts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT,
            store TEXT,
            value REAL,
            supplier_ref INTEGER,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO receipts (date, store, value, supplier_ref) VALUES ('2023-12-31', 'Main', 42.5, 7)",
        [],
    )
    .unwrap();
}
