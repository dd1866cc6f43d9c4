use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::{info, instrument, warn};

use videorelay_config::RelayConfig;
use videorelay_core::{EventRelay, RelayOptions};
use videorelay_telemetry::{EventLogger, Milestone};

use crate::delegate::LoggingDelegate;
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "videorelay", version, about)]
pub struct Cli {
    /// Configuration file; defaults to config/videorelay.yaml plus env overrides
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded message scenario through a relay
    Replay(ReplayArgs),
    /// Load and validate configuration, then print it
    CheckConfig,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// YAML scenario file with a `messages` list
    #[arg(short, long)]
    pub scenario: PathBuf,
    /// Print Prometheus metrics after the relay has drained
    #[arg(long)]
    pub metrics: bool,
}

/// Outcome of a replay.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub messages: usize,
    pub queued: usize,
    pub delivered: u64,
}

pub async fn run_replay(args: ReplayArgs, config: &RelayConfig) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let name = scenario.name.clone().unwrap_or_else(|| "unnamed".into());
    let delegate = Arc::new(LoggingDelegate::default());
    let relay = EventRelay::with_options(delegate.clone(), RelayOptions::from(&config.queue));

    let summary = replay_scenario(&relay, scenario).await?;
    debug_assert_eq!(summary.delivered, delegate.handled());

    EventLogger::log_milestone(&Milestone::ReplayComplete {
        scenario: name,
        messages: summary.messages,
        queued: summary.queued,
        delivered: summary.delivered,
    });

    if args.metrics || config.telemetry.metrics {
        println!("{}", relay.metrics().gather_metrics()?);
    }
    Ok(())
}

/// Posts every message in file order, then closes the relay so the whole
/// backlog is delivered before returning.
#[instrument(skip_all, fields(messages = scenario.messages.len()))]
pub async fn replay_scenario(
    relay: &EventRelay,
    scenario: Scenario,
) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary {
        messages: scenario.messages.len(),
        ..ReplaySummary::default()
    };

    for (index, message) in scenario.messages.into_iter().enumerate() {
        match relay.post_wire(message) {
            Ok(()) => summary.queued += 1,
            Err(e) => warn!(index, "Message not relayed: {e}"),
        }
    }

    relay.close().await?;
    summary.delivered = relay.metrics().dispatched_events.get();
    info!(
        queued = summary.queued,
        delivered = summary.delivered,
        "Scenario replayed"
    );
    Ok(summary)
}

pub fn run_check_config(config: &RelayConfig) -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replay_skips_bad_messages_and_drains_the_rest() {
        let scenario = Scenario::from_yaml(
            "messages:\n\
             - { tag: 0, args: { profile: { video_state: 3 } } }\n\
             - { tag: 77 }\n\
             - { tag: 2, args: { event: 6 } }\n\
             - { tag: 4, args: { data_usage: oops } }\n\
             - { tag: 5, args: { capabilities: { width: 1280, height: 720 } } }\n",
        )
        .unwrap();
        let delegate = Arc::new(LoggingDelegate::default());
        let relay = EventRelay::new(delegate.clone());

        let summary = replay_scenario(&relay, scenario).await.unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                messages: 5,
                queued: 3,
                delivered: 3,
            }
        );
        assert_eq!(delegate.handled(), 3);
        assert_eq!(relay.metrics().unrecognized_messages.get(), 2);
    }

    #[test]
    fn parses_replay_flags() {
        let cli = Cli::parse_from([
            "videorelay",
            "replay",
            "--scenario",
            "calls.yaml",
            "--metrics",
            "--config",
            "relay.yaml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("relay.yaml")));
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.scenario, PathBuf::from("calls.yaml"));
                assert!(args.metrics);
            }
            Commands::CheckConfig => panic!("expected replay"),
        }
    }
}
