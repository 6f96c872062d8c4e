use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;
use tax_core::calculations::TaxCalculator;
use tax_data::{load_ceilings, parse_batch};
use tax_db_sqlite::SqliteRepository;
use tracing_subscriber::EnvFilter;

/// Calculate tax for every row of a CSV file using the stored allowance
/// ceilings.
///
/// The CSV file must have the header `totalIncome,wht,donation`.
#[derive(Parser, Debug)]
#[command(name = "tax-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file to calculate
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g., sqlite:tax.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:tax.db?mode=rwc", env = "DATABASE_URL")]
    database: String,

    /// Run database migrations before calculating
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,

    /// Print the result as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr so `--json` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        eprintln!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
    }

    if let Some(seeds_dir) = &args.seeds {
        eprintln!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
    }

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;
    let filings = parse_batch(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
    eprintln!("Parsed {} rows from {}", filings.len(), args.file.display());

    let ceilings = load_ceilings(&repo)
        .await
        .context("Failed to read allowance ceilings")?;

    let results = TaxCalculator::default().calculate_batch(&filings, &ceilings);

    if args.json {
        let taxes: Vec<_> = results
            .iter()
            .map(|row| {
                let rounded = row.result.rounded();
                json!({
                    "totalIncome": row.total_income.to_f64(),
                    "tax": rounded.tax_owed.to_f64(),
                    "taxRefund": rounded.refund.to_f64(),
                })
            })
            .collect();
        let output = serde_json::to_string_pretty(&json!({ "taxes": taxes }))
            .context("Failed to serialize results")?;
        println!("{}", output);
    } else {
        println!("{:>6}  {:>16}  {:>14}  {:>14}", "row", "totalIncome", "tax", "taxRefund");
        for (idx, row) in results.iter().enumerate() {
            let rounded = row.result.rounded();
            println!(
                "{:>6}  {:>16}  {:>14}  {:>14}",
                idx + 1,
                row.total_income,
                rounded.tax_owed,
                rounded.refund
            );
        }
    }

    Ok(())
}
