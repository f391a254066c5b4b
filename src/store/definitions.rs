// src/store/definitions.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::column_type::ColumnType;
use super::error::{StoreError, StoreResult};
use super::value::Value;

/// Surrogate key of a row (`id INTEGER PRIMARY KEY AUTOINCREMENT`).
pub type RowId = i64;

/// Row identity column present on every table.
pub const ID_COLUMN: &str = "id";

/// Columns maintained by the store itself; never part of a table's column set.
pub const SYSTEM_COLUMNS: [&str; 2] = [ID_COLUMN, "created_at"];

/// Column values for an insert or update, keyed by column name.
pub type RowData = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<Value>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Value an existing or newly inserted row receives when none is given.
    pub fn fill_value(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }
}

/// The fixed set of tables the store is initialised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseTable {
    Receipts,
    Sales,
    Recipes,
    Inventory,
}

impl BaseTable {
    pub const ALL: [BaseTable; 4] = [
        BaseTable::Receipts,
        BaseTable::Sales,
        BaseTable::Recipes,
        BaseTable::Inventory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaseTable::Receipts => "receipts",
            BaseTable::Sales => "sales",
            BaseTable::Recipes => "recipes",
            BaseTable::Inventory => "inventory",
        }
    }

    pub fn from_name(name: &str) -> Option<BaseTable> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Columns a freshly initialised table starts with.
    pub fn initial_columns(self) -> Vec<ColumnDefinition> {
        use ColumnType::*;
        let cols: &[(&str, ColumnType)] = match self {
            BaseTable::Receipts => &[
                ("date", Date),
                ("store", Text),
                ("item_group", Text),
                ("item_code", Text),
                ("item_name", Text),
                ("uom", Text),
                ("qty", Decimal),
                ("rate", Decimal),
                ("value", Decimal),
                ("cost_center", Text),
                ("user", Text),
                ("hotel", Text),
                ("month", Text),
            ],
            BaseTable::Sales => &[
                ("date", Date),
                ("item_code", Text),
                ("item_name", Text),
                ("quantity", Decimal),
                ("rate", Decimal),
                ("value", Decimal),
                ("discount", Decimal),
            ],
            BaseTable::Recipes => &[
                ("item_code", Text),
                ("item_name", Text),
                ("category", Text),
                ("selling_price", Decimal),
                ("cost_price", Decimal),
                ("cost_percentage", Decimal),
                ("ingredients", Text),
                ("preparation", Text),
                ("last_updated", Text),
            ],
            BaseTable::Inventory => &[("item", Text), ("quantity", Decimal)],
        };
        cols.iter()
            .map(|(name, ty)| ColumnDefinition::new(*name, *ty))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Case-insensitive lookup returning the canonical definition.
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Like `column`, but an unknown name is a validation error.
    pub fn require_column(&self, name: &str) -> StoreResult<&ColumnDefinition> {
        self.column(name).ok_or_else(|| {
            StoreError::validation(format!("unknown column '{}' on table '{}'", name, self.name))
        })
    }

    /// Check and coerce a set of cells against this table's columns,
    /// keyed by canonical column name.
    pub fn conform(&self, data: RowData) -> StoreResult<Vec<(&ColumnDefinition, Value)>> {
        let mut out: Vec<(&ColumnDefinition, Value)> = Vec::with_capacity(data.len());
        for (name, value) in data {
            let col = self.require_column(&name)?;
            if out.iter().any(|(c, _)| c.name == col.name) {
                return Err(StoreError::validation(format!(
                    "column '{}' given more than once",
                    col.name
                )));
            }
            let value = value.coerce(col.column_type).map_err(|msg| {
                StoreError::validation(format!("column '{}': {}", col.name, msg))
            })?;
            if value.is_null() && !col.nullable {
                return Err(StoreError::validation(format!(
                    "column '{}' does not accept empty values",
                    col.name
                )));
            }
            out.push((col, value));
        }
        Ok(out)
    }
}

/// A stored row shaped to its table's current column set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: RowId,
    pub values: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, v)| v)
    }

    /// True when every given cell is present with an equal value.
    #[cfg(test)]
    pub fn matches(&self, data: &RowData) -> bool {
        data.iter().all(|(k, v)| self.get(k) == Some(v))
    }
}

/// Ordered, immutable rows produced by a read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    table: String,
    columns: Vec<ColumnDefinition>,
    rows: Vec<Row>,
}

impl QueryResult {
    pub(crate) fn new(table: String, columns: Vec<ColumnDefinition>, rows: Vec<Row>) -> Self {
        Self { table, columns, rows }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
