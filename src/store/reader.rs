// src/store/reader.rs
// Read operations over any table and its current column set

use rusqlite::ToSql;
use tracing::debug;

use super::column_type::ColumnType;
use super::definitions::{ColumnDefinition, QueryResult, Row, RowId, TableDefinition, ID_COLUMN};
use super::error::{StoreError, StoreResult};
use super::filter::{Filters, OrderBy, Predicate};
use super::schema::{quote_identifier, SchemaStore};
use super::value::Value;
use super::Store;

pub struct DbReader;

/// A filter/order target: a user column or the row id.
enum Target<'a> {
    Id,
    Column(&'a ColumnDefinition),
}

impl Target<'_> {
    fn name(&self) -> &str {
        match self {
            Target::Id => ID_COLUMN,
            Target::Column(c) => &c.name,
        }
    }

    fn sql_name(&self) -> String {
        match self {
            Target::Id => ID_COLUMN.to_string(),
            Target::Column(c) => quote_identifier(&c.name),
        }
    }

    fn column_type(&self) -> ColumnType {
        match self {
            Target::Id => ColumnType::Integer,
            Target::Column(c) => c.column_type,
        }
    }

    fn coerce(&self, value: &Value) -> StoreResult<Value> {
        value.clone().coerce(self.column_type()).map_err(|msg| {
            StoreError::validation(format!("filter on '{}': {}", self.name(), msg))
        })
    }
}

fn resolve_target<'a>(def: &'a TableDefinition, name: &str) -> StoreResult<Target<'a>> {
    if name.eq_ignore_ascii_case(ID_COLUMN) {
        return Ok(Target::Id);
    }
    def.require_column(name).map(Target::Column)
}

/// Build `WHERE ...` (possibly empty) and its parameters
fn build_where(def: &TableDefinition, filters: &Filters) -> StoreResult<(String, Vec<Value>)> {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for (name, predicate) in filters {
        let target = resolve_target(def, name)?;
        let col = target.sql_name();
        match predicate {
            Predicate::Eq(value) => match target.coerce(value)? {
                Value::Null => clauses.push(format!("{} IS NULL", col)),
                v => {
                    clauses.push(format!("{} = ?", col));
                    params.push(v);
                }
            },
            Predicate::Range { min, max } => {
                if let Some(min) = min {
                    clauses.push(format!("{} >= ?", col));
                    params.push(target.coerce(min)?);
                }
                if let Some(max) = max {
                    clauses.push(format!("{} <= ?", col));
                    params.push(target.coerce(max)?);
                }
            }
        }
    }

    if clauses.is_empty() {
        Ok((String::new(), params))
    } else {
        Ok((format!(" WHERE {}", clauses.join(" AND ")), params))
    }
}

impl DbReader {
    /// Rows of `table` matching every filter, ordered by `order_by` then id.
    pub fn query(
        store: &Store,
        table: &str,
        filters: &Filters,
        order_by: Option<&OrderBy>,
    ) -> StoreResult<QueryResult> {
        let def = SchemaStore::table_definition(store, table)?;
        let (where_sql, params) = build_where(&def, filters)?;

        let order_sql = match order_by {
            Some(order) => {
                let target = resolve_target(&def, &order.column)?;
                format!(
                    " ORDER BY {} {}, id",
                    target.sql_name(),
                    if order.descending { "DESC" } else { "ASC" }
                )
            }
            None => " ORDER BY id".to_string(),
        };

        let select_list = std::iter::once(ID_COLUMN.to_string())
            .chain(def.columns.iter().map(|c| quote_identifier(&c.name)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {}{}{}",
            select_list,
            quote_identifier(&def.name),
            where_sql,
            order_sql
        );
        debug!("Query on '{}': {}", def.name, sql);

        let rows = read_rows(store, &def, &sql, &params)?;
        Ok(QueryResult::new(def.name, def.columns, rows))
    }

    /// Fetch a single row by id
    pub fn get(store: &Store, table: &str, id: RowId) -> StoreResult<Row> {
        let mut filters = Filters::new();
        filters.insert(ID_COLUMN.to_string(), Predicate::Eq(Value::Integer(id)));
        let result = Self::query(store, table, &filters, None)?;
        let name = result.table().to_string();
        result
            .rows()
            .first()
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("row {} in table '{}'", id, name)))
    }

    pub fn count(store: &Store, table: &str) -> StoreResult<i64> {
        let table = SchemaStore::resolve_table(table)?;
        let count = store.conn().query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn read_rows(store: &Store, def: &TableDefinition, sql: &str, params: &[Value]) -> StoreResult<Vec<Row>> {
    let mut stmt = store.conn().prepare(sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
    let mut rows = stmt.query(param_refs.as_slice())?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let id: RowId = row.get(0)?;
        let mut values = Vec::with_capacity(def.columns.len());
        for (i, col) in def.columns.iter().enumerate() {
            let value = Value::from_sql_ref(row.get_ref(i + 1)?, col.column_type);
            values.push((col.name.clone(), value));
        }
        out.push(Row { id, values });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::definitions::RowData;
    use crate::store::filter::filters;
    use crate::store::writer::test_helpers::seed_sales;
    use crate::store::writer::DbWriter;
    use chrono::NaiveDate;

    fn date(s: &str) -> Value {
        Value::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    #[test]
    fn test_query_default_order_is_insertion_order() {
        let mut store = Store::open_in_memory().unwrap();
        let ids = seed_sales(&mut store);
        let result = DbReader::query(&store, "sales", &Filters::new(), None).unwrap();
        let got: Vec<RowId> = result.rows().iter().map(|r| r.id).collect();
        assert_eq!(got, ids);
        assert_eq!(result.column_names()[0], "date");
    }

    #[test]
    fn test_eq_and_range_filters() {
        let mut store = Store::open_in_memory().unwrap();
        seed_sales(&mut store);

        let f = filters([("item_code", Predicate::Eq(Value::from("B01")))]);
        let result = DbReader::query(&store, "sales", &f, None).unwrap();
        assert_eq!(result.len(), 2);

        let f = filters([(
            "date",
            Predicate::range(Some(Value::from("2024-01-02")), Some(date("2024-01-31"))),
        )]);
        let result = DbReader::query(&store, "sales", &f, Some(&OrderBy::desc("value"))).unwrap();
        let values: Vec<Option<f64>> = result
            .rows()
            .iter()
            .map(|r| r.get("value").and_then(Value::as_f64))
            .collect();
        assert_eq!(values, vec![Some(300.0), Some(120.0)]);
    }

    #[test]
    fn test_filter_on_unknown_column_is_validation_error() {
        let store = Store::open_in_memory().unwrap();
        let f = filters([("colour", Predicate::Eq(Value::from("red")))]);
        assert!(DbReader::query(&store, "sales", &f, None).unwrap_err().is_validation());
        let err = DbReader::query(&store, "sales", &Filters::new(), Some(&OrderBy::asc("colour"))).unwrap_err();
        assert!(err.is_validation());
        let f = filters([("value", Predicate::Eq(Value::from("lots")))]);
        assert!(DbReader::query(&store, "sales", &f, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_eq_null_matches_missing_values() {
        let mut store = Store::open_in_memory().unwrap();
        seed_sales(&mut store);
        let f = filters([("discount", Predicate::Eq(Value::Null))]);
        let result = DbReader::query(&store, "sales", &f, None).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_insert_then_query_by_id_round_trips() {
        let mut store = Store::open_in_memory().unwrap();
        let mut row = RowData::new();
        row.insert("date".into(), date("2024-02-29"));
        row.insert("item_code".into(), Value::from("R-1"));
        row.insert("item_name".into(), Value::from("Club \"Sandwich\", large"));
        row.insert("quantity".into(), Value::Decimal(2.5));
        row.insert("discount".into(), Value::Null);
        let id = DbWriter::insert(&mut store, "sales", row.clone()).unwrap();

        let f = filters([("id", Predicate::Eq(Value::Integer(id)))]);
        let result = DbReader::query(&store, "sales", &f, None).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.rows()[0].matches(&row));
        assert_eq!(DbReader::get(&store, "sales", id).unwrap(), result.rows()[0]);
    }

    #[test]
    fn test_integer_input_for_decimal_column_round_trips() {
        let mut store = Store::open_in_memory().unwrap();
        let row: RowData = serde_json::from_str(r#"{"item":"Flour","quantity":10}"#).unwrap();
        assert_eq!(row.get("quantity"), Some(&Value::Integer(10)));
        let id = DbWriter::insert(&mut store, "inventory", row.clone()).unwrap();

        let stored = DbReader::get(&store, "inventory", id).unwrap();
        assert!(matches!(stored.get("quantity"), Some(Value::Decimal(q)) if *q == 10.0));
        assert!(stored.matches(&row));
        let f = filters([("quantity", Predicate::Eq(Value::Integer(10)))]);
        assert_eq!(DbReader::query(&store, "inventory", &f, None).unwrap().rows(), &[stored]);
    }

    #[test]
    fn test_get_missing_row_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        assert!(DbReader::get(&store, "recipes", 99).unwrap_err().is_not_found());
        assert!(DbReader::query(&store, "nope", &Filters::new(), None).unwrap_err().is_not_found());
    }
}
