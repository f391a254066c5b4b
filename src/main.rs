// src/main.rs

mod cli;
mod export;
mod ingest;
mod properties;
mod reports;
mod settings;
mod store;

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, CliResult, Commands};
use settings::{AppSettings, LoadOutcome};
use store::{OrderBy, Store};

/// `--db :memory:` runs against a throwaway database.
const IN_MEMORY_DB: &str = ":memory:";

fn init_logging(default_filter: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Settings are read before the subscriber exists; the outcome is logged once it does.
    let (settings, load_report) = match AppSettings::config_path()
        .and_then(|path| AppSettings::load_from(&path).map(|(settings, outcome)| (settings, outcome, path)))
    {
        Ok((settings, outcome, path)) => (settings, Ok((outcome, path))),
        Err(e) => (AppSettings::default(), Err(e)),
    };
    init_logging(&settings.log_filter, cli.verbose);
    match load_report {
        Ok((LoadOutcome::Loaded, path)) => debug!("Loaded settings from {:?}", path),
        Ok((LoadOutcome::Missing, path)) => debug!("No settings file at {:?}, using defaults", path),
        Err(e) => warn!("Using default settings: {}", e),
    }

    let command = match cli.command {
        Commands::Config {
            data_dir,
            db_file,
            export_dir,
            log_filter,
        } => {
            let changes = cli::config::ConfigChanges {
                data_dir,
                db_file,
                export_dir,
                log_filter,
            };
            return finish(cli::config::run(settings, changes));
        }
        other => other,
    };

    let config = settings.store_config();
    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path());
    debug!("Using database {:?}", db_path);

    let opened = match &cli.db {
        Some(path) if path.as_os_str() == IN_MEMORY_DB => Store::open_in_memory(),
        Some(path) => Store::open(path),
        None => Store::open_with_config(&config),
    };
    let mut store = match opened {
        Ok(store) => store,
        Err(e) => {
            error!("Cannot open database {:?}: {}", db_path, e);
            eprintln!("Error: cannot open database {}: {}", db_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = dispatch(&mut store, &settings, command);
    if let Err(e) = store.close() {
        warn!("Closing database failed: {}", e);
    }
    finish(outcome)
}

fn finish(outcome: CliResult) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_user_error() {
                error!("{:?}", e);
            }
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(store: &mut Store, settings: &AppSettings, command: Commands) -> CliResult {
    match command {
        Commands::Init => cli::schema::run_init(store),
        Commands::Tables => cli::schema::run_tables(store),
        Commands::Columns { table } => cli::schema::run_columns(store, &table),
        Commands::AddProperty {
            table,
            name,
            type_name,
            default,
            required,
        } => cli::schema::run_add_property(store, table, name, type_name, default, required),
        Commands::Insert { table, json } => cli::rows::run_insert(store, &table, &json),
        Commands::Query {
            table,
            eq,
            min,
            max,
            order,
            desc,
            export,
        } => {
            let order = order.map(|column| if desc { OrderBy::desc(column) } else { OrderBy::asc(column) });
            let export = export.map(|p| settings.export_path(&p));
            cli::rows::run_query(store, &table, &cli::rows::FilterArgs { eq, min, max }, order, export.as_deref())
        }
        Commands::Update { table, id, json } => cli::rows::run_update(store, &table, id, &json),
        Commands::Delete { table, id } => cli::rows::run_delete(store, &table, id),
        Commands::Export { table, path } => cli::rows::run_export(store, &table, &settings.export_path(&path)),
        Commands::ImportRecipes { path } => cli::import_recipes::run(store, &path),
        Commands::Report { kind, group_by } => cli::report::run(store, kind, group_by.as_deref()),
        Commands::Config { .. } => Err(cli::CliError::Usage("config does not use the database".to_string())),
    }
}
