//! ## videorelay-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` takes precedence over the configured level so an operator can
//! turn on `videorelay_core=trace` for a single run without editing config.

use tracing::{info, info_span};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Points in a relay's life worth one structured log line each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Milestone {
    /// Every queued event has been handed to the delegate.
    RelayDrained {
        dispatched: u64,
        delegate_failures: u64,
        unrecognized: u64,
    },
    /// A recorded scenario was posted and the relay drained.
    ReplayComplete {
        scenario: String,
        messages: usize,
        queued: usize,
        delivered: u64,
    },
}

impl Milestone {
    pub fn name(&self) -> &'static str {
        match self {
            Milestone::RelayDrained { .. } => "relay_drained",
            Milestone::ReplayComplete { .. } => "replay_complete",
        }
    }
}

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Must be called at most once per process.
    pub fn init(default_level: &str) {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .init()
    }

    pub fn log_milestone(milestone: &Milestone) {
        let span = info_span!("relay_milestone", milestone = milestone.name());
        let _entered = span.enter();

        match milestone {
            Milestone::RelayDrained {
                dispatched,
                delegate_failures,
                unrecognized,
            } => info!(
                dispatched,
                delegate_failures, unrecognized, "Relay drained and closed"
            ),
            Milestone::ReplayComplete {
                scenario,
                messages,
                queued,
                delivered,
            } => {
                let skipped = messages.saturating_sub(*queued);
                info!(
                    %scenario,
                    messages,
                    queued,
                    skipped,
                    delivered,
                    "Scenario replay complete"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn replay_milestone_reports_skipped_messages() {
        EventLogger::log_milestone(&Milestone::ReplayComplete {
            scenario: "renegotiate".into(),
            messages: 5,
            queued: 3,
            delivered: 3,
        });
        assert!(logs_contain("Scenario replay complete"));
        assert!(logs_contain("scenario=renegotiate"));
        assert!(logs_contain("skipped=2"));
    }

    #[traced_test]
    #[test]
    fn drained_milestone_carries_counters() {
        EventLogger::log_milestone(&Milestone::RelayDrained {
            dispatched: 7,
            delegate_failures: 1,
            unrecognized: 0,
        });
        assert!(logs_contain("relay_drained"));
        assert!(logs_contain("delegate_failures=1"));
    }
}
