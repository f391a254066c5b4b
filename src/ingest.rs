// src/ingest.rs
// Recipe sheets: already-parsed spreadsheet records into recipe rows

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::store::schema::normalize_caption;
use crate::store::{BaseTable, ColumnDefinition, DbWriter, RowData, RowId, SchemaStore, Store, StoreError, StoreResult, Value};

/// Columns a recipe sheet must provide, with the captions users see.
const REQUIRED_RECIPE_COLUMNS: [(&str, &str); 4] = [
    ("item_code", "Item Code"),
    ("item_name", "Item Name"),
    ("selling_price", "Selling Price"),
    ("cost_price", "Cost Price"),
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub ids: Vec<RowId>,
    pub computed_cost_percentage: bool,
}

/// Read a delimited file into its header captions and records.
pub fn read_csv_records(path: &Path) -> StoreResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::Headers).from_path(path)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(str::to_string).collect());
    }
    Ok((headers, records))
}

/// Store recipe records stamped with the current time.
pub fn ingest_recipes(store: &mut Store, headers: &[String], records: &[Vec<String>]) -> StoreResult<IngestReport> {
    ingest_recipes_at(store, headers, records, Local::now().naive_local())
}

pub fn ingest_recipes_at(
    store: &mut Store,
    headers: &[String],
    records: &[Vec<String>],
    timestamp: NaiveDateTime,
) -> StoreResult<IngestReport> {
    if records.is_empty() {
        return Err(StoreError::validation("recipe sheet has no records"));
    }
    let table = SchemaStore::table_definition(store, BaseTable::Recipes.name())?;

    // Caption position -> column definition
    let mut mapped = Vec::with_capacity(headers.len());
    for caption in headers {
        let name = normalize_caption(caption);
        let col = table.column(&name).ok_or_else(|| {
            StoreError::validation(format!("unknown recipe column '{}'", caption.trim()))
        })?;
        if mapped.iter().any(|c: &&ColumnDefinition| c.name == col.name) {
            return Err(StoreError::validation(format!(
                "duplicate recipe column '{}' (maps to '{}')",
                caption.trim(),
                col.name
            )));
        }
        mapped.push(col);
    }

    let missing: Vec<&str> = REQUIRED_RECIPE_COLUMNS
        .iter()
        .filter(|(name, _)| !mapped.iter().any(|c| c.name == *name))
        .map(|(_, caption)| *caption)
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let compute_percentage = !mapped.iter().any(|c| c.name == "cost_percentage");
    let stamp = timestamp.format(TIMESTAMP_FORMAT).to_string();

    let mut rows = Vec::with_capacity(records.len());
    for (line, record) in records.iter().enumerate() {
        if record.len() > mapped.len() {
            warn!("Recipe row {} has {} extra cells, ignoring them", line + 1, record.len() - mapped.len());
        }
        let mut data = RowData::new();
        for (col, raw) in mapped.iter().zip(record.iter().map(String::as_str).chain(std::iter::repeat(""))) {
            let value = Value::parse_as(raw, col.column_type).map_err(|reason| {
                StoreError::validation(format!("row {}, column '{}': {}", line + 1, col.name, reason))
            })?;
            data.insert(col.name.clone(), value);
        }
        if compute_percentage {
            data.insert("cost_percentage".to_string(), cost_percentage(&data));
        }
        data.insert("last_updated".to_string(), Value::Text(stamp.clone()));
        rows.push(data);
    }

    let ids = DbWriter::insert_many(store, BaseTable::Recipes.name(), rows)?;
    info!("Stored {} recipes", ids.len());
    Ok(IngestReport {
        ids,
        computed_cost_percentage: compute_percentage,
    })
}

/// cost / selling * 100; NULL when either is missing or selling price is zero
fn cost_percentage(data: &RowData) -> Value {
    let selling = data.get("selling_price").and_then(Value::as_f64);
    let cost = data.get("cost_price").and_then(Value::as_f64);
    match (selling, cost) {
        (Some(s), Some(c)) if s != 0.0 => Value::Decimal(c / s * 100.0),
        _ => Value::Null,
    }
}
