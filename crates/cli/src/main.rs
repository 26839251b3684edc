//! Operator tooling for the Unimon battle ledger.
//!
//! Run with: `unimon <command>`
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use commands::{Chance, Cycle, Inspect, Simulate};

/// Unimon battle ledger tools
#[derive(Parser)]
#[command(name = "unimon")]
#[command(about = "Simulate and inspect Unimon battles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a seeded multi-cycle simulation on an in-process ledger
    Simulate(Simulate),

    /// Print the clamped attacker win chance for a pairing
    Chance(Chance),

    /// Print the cycle clock at a given instant
    Cycle(Cycle),

    /// Read a persisted ledger snapshot
    Inspect(Inspect),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = logging::setup_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute().await,
        Command::Chance(cmd) => cmd.execute(),
        Command::Cycle(cmd) => cmd.execute(),
        Command::Inspect(cmd) => cmd.execute(),
    }
}
