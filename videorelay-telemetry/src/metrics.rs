//! ## videorelay-telemetry::metrics
//! **Prometheus counters and dispatch latency histogram**
//!
//! Every relay owns its own `Registry`, so several relays in one process (or
//! in one test binary) never share counts.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    /// Events accepted onto the queue.
    pub posted_events: IntCounter,
    /// Events handed to the delegate, whatever the outcome.
    pub dispatched_events: IntCounter,
    /// Delegate callbacks that returned an error or panicked.
    pub delegate_failures: IntCounter,
    /// Wire messages with an unknown tag or undecodable arguments.
    pub unrecognized_messages: IntCounter,
    /// Posts refused because the relay was closing or full.
    pub rejected_posts: IntCounter,
    pub dispatch_latency: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::try_new().expect("static metric definitions are valid")
    }

    fn try_new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let posted_events =
            IntCounter::new("videorelay_events_posted_total", "Events accepted for delivery")?;
        let dispatched_events = IntCounter::new(
            "videorelay_events_dispatched_total",
            "Events handed to the delegate",
        )?;
        let delegate_failures = IntCounter::new(
            "videorelay_delegate_failures_total",
            "Delegate callbacks that failed or panicked",
        )?;
        let unrecognized_messages = IntCounter::new(
            "videorelay_unrecognized_messages_total",
            "Wire messages that could not be decoded into an event",
        )?;
        let rejected_posts = IntCounter::new(
            "videorelay_posts_rejected_total",
            "Posts refused by a closed or full relay",
        )?;
        let dispatch_latency = Histogram::with_opts(
            HistogramOpts::new(
                "videorelay_dispatch_latency_ns",
                "Time spent inside a single delegate callback",
            )
            .buckets(vec![1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]),
        )?;

        registry.register(Box::new(posted_events.clone()))?;
        registry.register(Box::new(dispatched_events.clone()))?;
        registry.register(Box::new(delegate_failures.clone()))?;
        registry.register(Box::new(unrecognized_messages.clone()))?;
        registry.register(Box::new(rejected_posts.clone()))?;
        registry.register(Box::new(dispatch_latency.clone()))?;

        Ok(Self {
            registry,
            posted_events,
            dispatched_events,
            delegate_failures,
            unrecognized_messages,
            rejected_posts,
            dispatch_latency,
        })
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorders_do_not_share_counts() {
        let a = MetricsRecorder::new();
        let b = MetricsRecorder::new();
        a.posted_events.inc();
        assert_eq!(a.posted_events.get(), 1);
        assert_eq!(b.posted_events.get(), 0);
    }

    #[test]
    fn gathered_text_names_every_counter() {
        let metrics = MetricsRecorder::new();
        metrics.delegate_failures.inc();
        metrics.dispatch_latency.observe(2_500.0);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("videorelay_events_posted_total 0"));
        assert!(text.contains("videorelay_delegate_failures_total 1"));
        assert!(text.contains("videorelay_dispatch_latency_ns_count 1"));
    }
}
