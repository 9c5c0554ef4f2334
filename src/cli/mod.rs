use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use houserocket::Config;

pub mod commands;

#[derive(Parser)]
#[command(
    name = "houserocket",
    about = "Property buy/sell recommendation report",
    version = "0.1.0"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Sales CSV to load (overrides HOUSE_DATA_PATH)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Abort on the first malformed row instead of skipping it
    #[arg(long, global = true)]
    pub strict: bool,

    /// Restrict the report to these zipcodes (repeatable)
    #[arg(short, long = "zipcode", global = true)]
    pub zipcodes: Vec<u32>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show descriptive statistics for every numeric attribute
    Stats,

    /// Show the buy recommendation for each property
    Buy {
        /// Only list properties recommended for purchase
        #[arg(long)]
        only_yes: bool,
    },

    /// Show the resale plan and total profit
    Sell,

    /// Evaluate the business hypotheses H01-H10
    Hypotheses,

    /// Run every section of the report
    Report {
        /// Directory to export CSV tables into (overrides REPORT_OUTPUT_DIR)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Execute CLI command against the configured dataset
pub fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    if cli.strict {
        config.data.strict = true;
    }

    let report = commands::load_report(&config, &cli.zipcodes)?;

    match cli.command {
        Commands::Stats => {
            info!("Computing descriptive statistics");
            commands::stats(&report, cli.json)?;
        }
        Commands::Buy { only_yes } => {
            info!("Computing buy recommendations");
            commands::buy(&report, only_yes, cli.json)?;
        }
        Commands::Sell => {
            info!("Computing sell strategy");
            commands::sell(&report, cli.json)?;
        }
        Commands::Hypotheses => {
            info!("Evaluating hypotheses");
            commands::hypotheses(&report, cli.json)?;
        }
        Commands::Report { output } => {
            info!("Running full report");
            let output = output.or(config.output.dir);
            commands::full_report(&report, output.as_deref(), cli.json)?;
        }
    }
    Ok(())
}
