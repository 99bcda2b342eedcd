//! Binary entry point wiring the SQLite-backed record store to a small CLI.
//! Each subcommand maps onto one library operation: bulk import, CSV export,
//! capped listing, and substring search.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use birthstats::config::Config;
use birthstats::db::{
    fetch_all_records, fetch_records, open_database, resolve_database_path, search_records,
    SqliteSink,
};
use birthstats::export::write_csv;
use birthstats::import::import_with_progress;
use birthstats::models::BirthRecord;

/// Manage a table of birth-statistics records.
#[derive(Parser, Debug)]
#[command(name = "birthstats")]
#[command(about = "Bulk import, export, and query birth-statistics records")]
struct Cli {
    /// Path to a TOML config file (defaults to ./birthstats.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a CSV file in one all-or-nothing transaction
    Import {
        /// CSV file with a header line and 8 fields per data line
        file: PathBuf,
        /// Records per insert batch (overrides the config file)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        batch_size: Option<u32>,
    },
    /// Export every record to a CSV file
    Export {
        /// Destination file, overwritten if it exists
        file: PathBuf,
    },
    /// Print the first records in the table
    List {
        /// Maximum rows to print
        #[arg(long, default_value_t = 1000)]
        limit: u32,
    },
    /// Print records where any field contains the given text
    Search {
        term: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let db_path = resolve_database_path(cli.database.or(config.database.clone()).as_deref())?;
    let conn = open_database(&db_path)?;

    match cli.command {
        Command::Import { file, batch_size } => {
            let batch_size = batch_size.map(|n| n as usize).unwrap_or(config.batch_size);
            run_import(&conn, &file, batch_size)
        }
        Command::Export { file } => run_export(&conn, &file),
        Command::List { limit } => {
            let records = fetch_records(&conn, limit)?;
            print_records(&records);
            Ok(())
        }
        Command::Search { term } => {
            let records = search_records(&conn, &term)?;
            print_records(&records);
            Ok(())
        }
    }
}

fn run_import(conn: &Connection, file: &PathBuf, batch_size: usize) -> Result<()> {
    let source = File::open(file)
        .with_context(|| format!("failed to open import file {}", file.display()))?;
    let mut sink = SqliteSink::new(conn);

    let outcome = import_with_progress(BufReader::new(source), &mut sink, batch_size, |lines| {
        info!("processed {lines} rows");
    })
    .with_context(|| format!("import of {} failed", file.display()))?;

    info!(
        "imported {} records from {} lines",
        outcome.records_committed, outcome.lines_read
    );
    println!(
        "Imported {} records ({} lines read).",
        outcome.records_committed, outcome.lines_read
    );
    Ok(())
}

fn run_export(conn: &Connection, file: &PathBuf) -> Result<()> {
    let records = fetch_all_records(conn)?;
    let out = File::create(file)
        .with_context(|| format!("failed to create export file {}", file.display()))?;

    let written = write_csv(&mut BufWriter::new(out), &records)?;
    println!("Exported {written} records to {}.", file.display());
    Ok(())
}

fn print_records(records: &[BirthRecord]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }
    for r in records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.id,
            r.year,
            r.record_type,
            r.area_code,
            r.area_name,
            r.gender,
            r.birth_weight,
            r.multiple_birth,
            r.birth_count
        );
    }
    println!("{} record(s).", records.len());
}
