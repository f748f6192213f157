use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use uuid::Uuid;

use auction_clearing::utils::init_tracing;
use auction_clearing::{AuctionClearingService, AuctionInput, ClearingError, Config};

/// Clear a sealed-bid share auction at a uniform price.
///
/// No metrics recorder is installed, so the library's `metrics` calls are
/// no-ops in this binary; embedders install their own exporter.
#[derive(Debug, Parser)]
#[command(name = "auction-clearing", version)]
struct Cli {
    /// JSON file with `total_supply`, `bids` and an optional `auction_id`
    input: PathBuf,

    /// Auction id to use when the input file has none
    #[arg(long)]
    auction_id: Option<Uuid>,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    compact: bool,

    /// Skip the text report on stderr
    #[arg(long)]
    no_report: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            if let Some(clearing_error) = e.downcast_ref::<ClearingError>() {
                for message in clearing_error.validation_errors() {
                    eprintln!("  - {}", message);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration (also loads .env); tracing starts before the clearing section
    let config = Config::from_env(init_tracing)?;
    info!("Loaded configuration for environment: {}", config.environment);

    let input = AuctionInput::from_json_file(&cli.input)
        .with_context(|| format!("failed to read auction input {}", cli.input.display()))?;

    let auction_id = input
        .auction_id
        .or(cli.auction_id)
        .unwrap_or_else(Uuid::new_v4);

    let service = AuctionClearingService::new(config.clearing);
    let outcome = service.clear_auction(auction_id, &input.bids, input.total_supply)?;

    let json = if cli.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{}", json);

    if !cli.no_report {
        eprintln!("{}", outcome.summary);
    }

    Ok(())
}
