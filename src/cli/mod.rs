// src/cli/mod.rs
// Command line front end: one subcommand per dashboard action

pub mod config;
pub mod import_recipes;
pub mod report;
pub mod rows;
pub mod schema;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use crate::properties::PropertyError;
use crate::settings::SettingsError;
use crate::store::{RowId, StoreError, TableDefinition, Value, ID_COLUMN};

#[derive(Parser)]
#[command(name = "costbook")]
#[command(about = "Costbook - receipts, sales, recipes and inventory cost tracking", long_about = None)]
pub struct Cli {
    /// Database file to use instead of the configured one (":memory:" for a throwaway database)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or upgrade the database and report its location
    Init,

    /// List tables with their row counts
    Tables,

    /// List a table's columns in order
    Columns { table: String },

    /// Add a property (column) to a table
    AddProperty {
        table: String,
        name: String,
        /// text, integer, decimal or date
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// Value existing and new rows receive when none is given
        #[arg(long)]
        default: Option<String>,
        /// Reject empty values (requires --default)
        #[arg(long)]
        required: bool,
    },

    /// Insert a row given as a JSON object, e.g. '{"item":"Flour","quantity":10}'
    Insert { table: String, json: String },

    /// Show rows, optionally filtered and ordered
    Query {
        table: String,
        /// Equality filter, column=value (repeatable)
        #[arg(long = "eq", value_name = "COLUMN=VALUE")]
        eq: Vec<String>,
        /// Inclusive lower bound, column=value (repeatable)
        #[arg(long = "min", value_name = "COLUMN=VALUE")]
        min: Vec<String>,
        /// Inclusive upper bound, column=value (repeatable)
        #[arg(long = "max", value_name = "COLUMN=VALUE")]
        max: Vec<String>,
        /// Column to order by
        #[arg(long)]
        order: Option<String>,
        #[arg(long, requires = "order")]
        desc: bool,
        /// Write the result as CSV instead of printing it
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Change cells of one row given as a JSON object
    Update { table: String, id: RowId, json: String },

    /// Delete one row
    Delete { table: String, id: RowId },

    /// Export a whole table as CSV
    Export { table: String, path: PathBuf },

    /// Load a recipe sheet (CSV with captions such as "Item Code", "Cost Price")
    ImportRecipes { path: PathBuf },

    /// Cost analysis reports
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
        /// Column to group receipts or sales by (default: month for receipts, date for sales)
        #[arg(long)]
        group_by: Option<String>,
    },

    /// Show the saved settings, or change them with the flags below
    Config {
        /// Directory holding the database
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Database file name inside the data directory
        #[arg(long)]
        db_file: Option<String>,
        /// Directory relative export paths are written to
        #[arg(long)]
        export_dir: Option<PathBuf>,
        /// Log filter used when RUST_LOG is unset, e.g. "info" or "costbook=debug"
        #[arg(long)]
        log_filter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Overview,
    Recipes,
    Receipts,
    Sales,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// Errors caused by the input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        match self {
            CliError::Store(e) => e.is_validation() || e.is_not_found(),
            CliError::Property(e) => e.is_validation(),
            CliError::Settings(_) => false,
            CliError::Usage(_) => true,
        }
    }
}

pub type CliResult = Result<(), CliError>;

/// Parse `column=value`, typing the value by the column it names.
pub fn parse_assignment(def: &TableDefinition, raw: &str) -> Result<(String, Value), CliError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::Usage(format!("expected COLUMN=VALUE, got '{}'", raw)))?;
    let name = name.trim();
    if name.eq_ignore_ascii_case(ID_COLUMN) {
        let id = value
            .trim()
            .parse::<RowId>()
            .map_err(|_| CliError::Usage(format!("'{}' is not a row id", value.trim())))?;
        return Ok((ID_COLUMN.to_string(), Value::Integer(id)));
    }
    let col = def.require_column(name)?;
    let value = Value::parse_as(value, col.column_type)
        .map_err(|reason| StoreError::validation(format!("column '{}': {}", col.name, reason)))?;
    Ok((col.name.clone(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BaseTable, ColumnType};

    fn inventory() -> TableDefinition {
        TableDefinition {
            name: "inventory".into(),
            columns: BaseTable::Inventory.initial_columns(),
        }
    }

    #[test]
    fn test_parse_assignment_types_by_column() {
        let def = inventory();
        assert_eq!(
            parse_assignment(&def, "Quantity=12.5").unwrap(),
            ("quantity".to_string(), Value::Decimal(12.5))
        );
        assert_eq!(
            parse_assignment(&def, "item=Flour=Fine").unwrap(),
            ("item".to_string(), Value::from("Flour=Fine"))
        );
        assert_eq!(parse_assignment(&def, "id=3").unwrap().1, Value::Integer(3));
        assert_eq!(def.columns[1].column_type, ColumnType::Decimal);
    }

    #[test]
    fn test_parse_assignment_errors() {
        let def = inventory();
        assert!(matches!(parse_assignment(&def, "quantity"), Err(CliError::Usage(_))));
        assert!(matches!(parse_assignment(&def, "colour=red"), Err(CliError::Store(ref e)) if e.is_validation()));
        assert!(matches!(parse_assignment(&def, "quantity=lots"), Err(CliError::Store(_))));
    }

    #[test]
    fn test_user_errors_are_told_apart() {
        assert!(CliError::Usage("bad".into()).is_user_error());
        assert!(CliError::from(StoreError::not_found("table 'x'")).is_user_error());
        assert!(CliError::from(PropertyError::EmptyName).is_user_error());
        let io = StoreError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert!(!CliError::from(io).is_user_error());
        assert!(!CliError::from(SettingsError::NoConfigDir).is_user_error());
    }

    #[test]
    fn test_cli_parses_query_flags() {
        let cli = Cli::try_parse_from([
            "costbook", "--db", "x.db", "query", "sales", "--eq", "item_code=B01", "--min", "date=2024-01-01",
            "--order", "value", "--desc",
        ])
        .unwrap();
        match cli.command {
            Commands::Query { table, eq, min, order, desc, .. } => {
                assert_eq!(table, "sales");
                assert_eq!(eq, vec!["item_code=B01"]);
                assert_eq!(min, vec!["date=2024-01-01"]);
                assert_eq!(order.as_deref(), Some("value"));
                assert!(desc);
            }
            _ => panic!("expected query"),
        }
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }
}
