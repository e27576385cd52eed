//! pumpwatch CLI
//!
//! Local execution entry point for scraping, consolidation, and snapshot
//! maintenance.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pumpwatch::{
    error::Result,
    models::Config,
    pipeline,
    storage::{SnapshotStore, dates},
    utils::http,
};

/// pumpwatch - Fuel Price Scraper
#[derive(Parser, Debug)]
#[command(
    name = "pumpwatch",
    version,
    about = "Scrapes state and county fuel prices into dated CSV snapshots"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the snapshot root directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape prices, write snapshots, and rebuild the master files
    Scrape,

    /// Rebuild the master files from snapshots already on disk
    Consolidate,

    /// Prefix each row of the CSV files in a directory with the file's date
    AddDates {
        /// Directory containing dated CSV files
        #[arg(short, long, default_value = "input")]
        input: PathBuf,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("pumpwatch starting...");

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = cli.output_dir {
        config.storage.output_dir = dir;
    }
    config.validate()?;

    let store = SnapshotStore::new(&config.storage.output_dir);

    match cli.command {
        Command::Scrape => {
            let client = http::create_client(&config.scraper)?;
            let outcome = pipeline::run_scrape(&config, &client, &store)?;

            log::info!(
                "Scraped {} states and {} county rows",
                outcome.national_count,
                outcome.county_count
            );
            if !outcome.state_failures.is_empty() {
                let failed: Vec<&str> = outcome
                    .state_failures
                    .iter()
                    .map(|f| f.abbreviation.as_str())
                    .collect();
                log::warn!(
                    "{} states failed detail extraction: {}",
                    failed.len(),
                    failed.join(", ")
                );
            }
            if !outcome.write_failures.is_empty() || !outcome.consolidation_failures.is_empty() {
                log::warn!(
                    "{} write and {} consolidation failures; see errors above",
                    outcome.write_failures.len(),
                    outcome.consolidation_failures.len()
                );
            }
        }

        Command::Consolidate => {
            let failures = pipeline::run_consolidate(&store);
            if failures.is_empty() {
                log::info!("Master files rebuilt");
            } else {
                log::warn!("{} scopes failed consolidation", failures.len());
            }
        }

        Command::AddDates { input } => {
            let count = dates::prefix_dates(&input)?;
            log::info!("Prefixed dates onto {} files in {}", count, input.display());
        }
    }

    log::info!("Done!");

    Ok(())
}
