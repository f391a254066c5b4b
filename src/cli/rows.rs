// src/cli/rows.rs
use std::path::Path;

use super::{parse_assignment, CliError, CliResult};
use crate::export::Exporter;
use crate::store::{DbReader, DbWriter, Filters, OrderBy, Predicate, QueryResult, RowData, RowId, SchemaStore, Store};

/// Filter arguments as given on the command line, each `column=value`.
#[derive(Debug, Default)]
pub struct FilterArgs {
    pub eq: Vec<String>,
    pub min: Vec<String>,
    pub max: Vec<String>,
}

fn parse_row(json: &str) -> Result<RowData, CliError> {
    serde_json::from_str(json).map_err(|e| CliError::Usage(format!("row must be a JSON object of column values: {}", e)))
}

pub fn build_filters(store: &Store, table: &str, args: &FilterArgs) -> Result<Filters, CliError> {
    let def = SchemaStore::table_definition(store, table)?;
    let mut filters = Filters::new();
    for raw in &args.eq {
        let (name, value) = parse_assignment(&def, raw)?;
        filters.insert(name, Predicate::Eq(value));
    }
    let mut bound = |raw: &str, is_min: bool| -> Result<(), CliError> {
        let (name, value) = parse_assignment(&def, raw)?;
        let entry = filters.entry(name.clone()).or_insert_with(|| Predicate::range(None, None));
        match entry {
            Predicate::Range { min, max } => {
                if is_min {
                    *min = Some(value);
                } else {
                    *max = Some(value);
                }
                Ok(())
            }
            Predicate::Eq(_) => Err(CliError::Usage(format!("'{}' has both an equality and a range filter", name))),
        }
    };
    for raw in &args.min {
        bound(raw, true)?;
    }
    for raw in &args.max {
        bound(raw, false)?;
    }
    Ok(filters)
}

fn print_result(result: &QueryResult) {
    if result.is_empty() {
        println!("No matching rows in '{}'", result.table());
        return;
    }
    let mut header = vec!["id"];
    header.extend(result.column_names());
    println!("{}", header.join("\t"));
    for row in result.rows() {
        let cells: Vec<String> = std::iter::once(row.id.to_string())
            .chain(row.values.iter().map(|(_, v)| v.to_string()))
            .collect();
        println!("{}", cells.join("\t"));
    }
    println!("({} rows)", result.len());
}

pub fn run_insert(store: &mut Store, table: &str, json: &str) -> CliResult {
    let id = DbWriter::insert(store, table, parse_row(json)?)?;
    println!("Inserted row {} into '{}'", id, table);
    Ok(())
}

pub fn run_query(
    store: &Store,
    table: &str,
    args: &FilterArgs,
    order: Option<OrderBy>,
    export_to: Option<&Path>,
) -> CliResult {
    let filters = build_filters(store, table, args)?;
    let result = DbReader::query(store, table, &filters, order.as_ref())?;
    match export_to {
        Some(path) => {
            Exporter::export(&result, path)?;
            println!("Exported {} rows to {}", result.len(), path.display());
        }
        None => print_result(&result),
    }
    Ok(())
}

pub fn run_update(store: &mut Store, table: &str, id: RowId, json: &str) -> CliResult {
    let changes = parse_row(json)?;
    DbWriter::update(store, table, id, changes)?;
    let row = DbReader::get(store, table, id)?;
    let cells: Vec<String> = row.values.iter().map(|(name, v)| format!("{}={}", name, v)).collect();
    println!("Updated row {} in '{}': {}", id, table, cells.join(", "));
    Ok(())
}

pub fn run_delete(store: &mut Store, table: &str, id: RowId) -> CliResult {
    DbWriter::delete(store, table, id)?;
    println!("Deleted row {} from '{}'", id, table);
    Ok(())
}

pub fn run_export(store: &Store, table: &str, path: &Path) -> CliResult {
    run_query(store, table, &FilterArgs::default(), None, Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::writer::test_helpers::seed_sales;
    use crate::store::Value;

    fn args(eq: &[&str], min: &[&str], max: &[&str]) -> FilterArgs {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        FilterArgs {
            eq: owned(eq),
            min: owned(min),
            max: owned(max),
        }
    }

    #[test]
    fn test_build_filters_merges_bounds() {
        let store = Store::open_in_memory().unwrap();
        let filters = build_filters(&store, "sales", &args(&["item_code=B01"], &["value=100"], &["value=200"])).unwrap();
        assert_eq!(filters.get("item_code"), Some(&Predicate::Eq(Value::from("B01"))));
        assert_eq!(
            filters.get("value"),
            Some(&Predicate::range(Some(Value::Decimal(100.0)), Some(Value::Decimal(200.0))))
        );
    }

    #[test]
    fn test_build_filters_rejects_conflicts() {
        let store = Store::open_in_memory().unwrap();
        let err = build_filters(&store, "sales", &args(&["value=1"], &["value=0"], &[])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn test_filtered_query_exports_matching_rows() {
        let mut store = Store::open_in_memory().unwrap();
        seed_sales(&mut store);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burgers.csv");
        run_query(&store, "sales", &args(&["item_code=B01"], &[], &[]), Some(OrderBy::desc("value")), Some(&path))
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("300"));
    }

    #[test]
    fn test_insert_update_delete_from_json() {
        let mut store = Store::open_in_memory().unwrap();
        run_insert(&mut store, "inventory", r#"{"item":"Flour","quantity":10}"#).unwrap();
        let id = DbReader::query(&store, "inventory", &Filters::new(), None).unwrap().rows()[0].id;
        run_update(&mut store, "inventory", id, r#"{"quantity":7.5}"#).unwrap();
        assert_eq!(DbReader::get(&store, "inventory", id).unwrap().get("quantity"), Some(&Value::Decimal(7.5)));
        assert!(matches!(run_insert(&mut store, "inventory", "[1,2]"), Err(CliError::Usage(_))));
        run_delete(&mut store, "inventory", id).unwrap();
        assert!(matches!(run_delete(&mut store, "inventory", id), Err(CliError::Store(ref e)) if e.is_not_found()));
    }
}
