// src/cli/import_recipes.rs
use std::path::Path;

use super::CliResult;
use crate::ingest::{ingest_recipes, read_csv_records};
use crate::store::Store;

pub fn run(store: &mut Store, path: &Path) -> CliResult {
    println!("Reading recipes from {}", path.display());
    let (headers, records) = read_csv_records(path)?;
    let report = ingest_recipes(store, &headers, &records)?;
    println!("Stored {} recipes", report.ids.len());
    if report.computed_cost_percentage {
        println!("Cost percentage computed from selling and cost price");
    }
    Ok(())
}
