//! ## videorelay-cli
//! **Operator interface for the event relay**
//!
//! Replays recorded transport messages through a relay bound to a logging
//! delegate, and validates configuration files.

use clap::Parser;
use videorelay_config::RelayConfig;
use videorelay_telemetry::logging::EventLogger;

mod commands;
mod delegate;
mod scenario;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RelayConfig::load_from_path(path)?,
        None => RelayConfig::load()?,
    };
    EventLogger::init(&config.telemetry.log_level);

    match cli.command {
        Commands::Replay(replay_args) => commands::run_replay(replay_args, &config).await,
        Commands::CheckConfig => commands::run_check_config(&config),
    }
}
