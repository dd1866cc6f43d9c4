//! # videorelay Telemetry
//!
//! Logging and metrics for the event relay.

pub mod logging;
pub mod metrics;

pub use logging::{EventLogger, Milestone};
pub use metrics::MetricsRecorder;
