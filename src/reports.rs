// src/reports.rs
// Cost analysis over receipts, sales and recipes

use serde::Serialize;

use crate::store::schema::quote_identifier;
use crate::store::{BaseTable, DbReader, Filters, OrderBy, SchemaStore, Store, StoreError, StoreResult, Value};

/// Label used for rows whose group column is empty.
pub const NO_GROUP: &str = "(none)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCost {
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub selling_price: Option<f64>,
    pub cost_price: Option<f64>,
    pub cost_percentage: Option<f64>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub count: i64,
    pub average_cost_percentage: Option<f64>,
    pub min_cost_percentage: Option<f64>,
    pub max_cost_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub group: String,
    pub rows: i64,
    /// (column, sum) in the order requested
    pub sums: Vec<(String, f64)>,
}

impl GroupTotal {
    #[cfg(test)]
    pub fn sum(&self, column: &str) -> Option<f64> {
        self.sums.iter().find(|(c, _)| c == column).map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub row_counts: Vec<(String, i64)>,
    pub receipts_value: f64,
    pub sales_value: f64,
    /// receipts / sales * 100
    pub cost_ratio: Option<f64>,
}

fn text(v: Option<&Value>) -> Option<String> {
    v.filter(|v| !v.is_null()).map(|v| v.to_string())
}

/// Recipes, most recently updated first
pub fn recipe_overview(store: &Store) -> StoreResult<Vec<RecipeCost>> {
    let result = DbReader::query(
        store,
        BaseTable::Recipes.name(),
        &Filters::new(),
        Some(&OrderBy::desc("last_updated")),
    )?;
    Ok(result
        .rows()
        .iter()
        .map(|r| RecipeCost {
            item_code: text(r.get("item_code")),
            item_name: text(r.get("item_name")),
            category: text(r.get("category")),
            selling_price: r.get("selling_price").and_then(Value::as_f64),
            cost_price: r.get("cost_price").and_then(Value::as_f64),
            cost_percentage: r.get("cost_percentage").and_then(Value::as_f64),
            last_updated: text(r.get("last_updated")),
        })
        .collect())
}

pub fn recipe_summary(store: &Store) -> StoreResult<RecipeSummary> {
    let summary = store.conn().query_row(
        "SELECT COUNT(*), AVG(cost_percentage), MIN(cost_percentage), MAX(cost_percentage) FROM recipes",
        [],
        |row| {
            Ok(RecipeSummary {
                count: row.get(0)?,
                average_cost_percentage: row.get(1)?,
                min_cost_percentage: row.get(2)?,
                max_cost_percentage: row.get(3)?,
            })
        },
    )?;
    Ok(summary)
}

/// Row count and column sums of `table` per distinct value of `group_by`
pub fn group_totals(store: &Store, table: &str, group_by: &str, sum_columns: &[&str]) -> StoreResult<Vec<GroupTotal>> {
    let def = SchemaStore::table_definition(store, table)?;
    let group_col = def.require_column(group_by)?;
    let mut sum_cols = Vec::with_capacity(sum_columns.len());
    for name in sum_columns {
        let col = def.require_column(name)?;
        if col.column_type.sql_type() == "TEXT" {
            return Err(StoreError::validation(format!("column '{}' is not numeric", col.name)));
        }
        sum_cols.push(col);
    }

    let group_sql = quote_identifier(&group_col.name);
    let sums_sql: String = sum_cols
        .iter()
        .map(|c| format!(", TOTAL({})", quote_identifier(&c.name)))
        .collect();
    let sql = format!(
        "SELECT {g}, COUNT(*){sums} FROM {t} GROUP BY {g} ORDER BY {g}",
        g = group_sql,
        sums = sums_sql,
        t = quote_identifier(&def.name)
    );

    let mut stmt = store.conn().prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let group = match Value::from_sql_ref(row.get_ref(0)?, group_col.column_type) {
            Value::Null => NO_GROUP.to_string(),
            v => v.to_string(),
        };
        let mut sums = Vec::with_capacity(sum_cols.len());
        for (i, col) in sum_cols.iter().enumerate() {
            sums.push((col.name.clone(), row.get::<_, f64>(i + 2)?));
        }
        out.push(GroupTotal {
            group,
            rows: row.get(1)?,
            sums,
        });
    }
    Ok(out)
}

pub fn receipt_totals(store: &Store, group_by: &str) -> StoreResult<Vec<GroupTotal>> {
    group_totals(store, BaseTable::Receipts.name(), group_by, &["qty", "value"])
}

pub fn sales_totals(store: &Store, group_by: &str) -> StoreResult<Vec<GroupTotal>> {
    group_totals(store, BaseTable::Sales.name(), group_by, &["quantity", "value", "discount"])
}

pub fn overview(store: &Store) -> StoreResult<Overview> {
    let mut row_counts = Vec::new();
    for table in SchemaStore::table_names() {
        row_counts.push((table.to_string(), DbReader::count(store, table)?));
    }
    let total = |table: &str| -> StoreResult<f64> {
        let sql = format!("SELECT TOTAL(value) FROM {}", quote_identifier(table));
        Ok(store.conn().query_row(&sql, [], |row| row.get(0))?)
    };
    let receipts_value = total(BaseTable::Receipts.name())?;
    let sales_value = total(BaseTable::Sales.name())?;
    let cost_ratio = (sales_value != 0.0).then(|| receipts_value / sales_value * 100.0);

    Ok(Overview {
        row_counts,
        receipts_value,
        sales_value,
        cost_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ingest_recipes_at;
    use crate::store::writer::test_helpers::{seed_receipts, seed_sales};
    use chrono::NaiveDate;

    #[test]
    fn test_receipt_totals_by_month() {
        let mut store = Store::open_in_memory().unwrap();
        seed_receipts(&mut store);
        let totals = receipt_totals(&store, "month").unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].group, "2024-01");
        assert_eq!(totals[0].rows, 2);
        assert_eq!(totals[0].sum("value"), Some(300.0));
        assert_eq!(totals[1].sum("qty"), Some(35.0));
    }

    #[test]
    fn test_sales_totals_treat_missing_discount_as_zero() {
        let mut store = Store::open_in_memory().unwrap();
        seed_sales(&mut store);
        let totals = sales_totals(&store, "item_code").unwrap();
        let burger = totals.iter().find(|t| t.group == "B01").unwrap();
        assert_eq!(burger.sum("value"), Some(420.0));
        assert_eq!(burger.sum("discount"), Some(0.0));
    }

    #[test]
    fn test_group_totals_validates_columns() {
        let store = Store::open_in_memory().unwrap();
        assert!(receipt_totals(&store, "weather").unwrap_err().is_validation());
        let err = group_totals(&store, "receipts", "month", &["store"]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_overview_cost_ratio() {
        let mut store = Store::open_in_memory().unwrap();
        let empty = overview(&store).unwrap();
        assert_eq!(empty.cost_ratio, None);

        seed_receipts(&mut store);
        seed_sales(&mut store);
        let o = overview(&store).unwrap();
        assert_eq!(o.receipts_value, 1000.0);
        assert_eq!(o.sales_value, 470.0);
        assert_eq!(o.row_counts[0], ("receipts".to_string(), 4));
        let ratio = o.cost_ratio.unwrap();
        assert!((ratio - 212.765_957).abs() < 1e-3);
    }

    #[test]
    fn test_recipe_overview_and_summary() {
        let mut store = Store::open_in_memory().unwrap();
        let headers: Vec<String> = ["Item Code", "Item Name", "Selling Price", "Cost Price"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap().and_hms_opt(8, 0, 0).unwrap();
        ingest_recipes_at(&mut store, &headers, &[vec!["R1".into(), "Soup".into(), "100".into(), "20".into()]], day(1))
            .unwrap();
        ingest_recipes_at(&mut store, &headers, &[vec!["R2".into(), "Cake".into(), "50".into(), "20".into()]], day(2))
            .unwrap();

        let recipes = recipe_overview(&store).unwrap();
        assert_eq!(recipes[0].item_name.as_deref(), Some("Cake"));
        assert_eq!(recipes[0].cost_percentage, Some(40.0));

        let summary = recipe_summary(&store).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average_cost_percentage, Some(30.0));
        assert_eq!(summary.min_cost_percentage, Some(20.0));
        assert_eq!(summary.max_cost_percentage, Some(40.0));
    }
}
