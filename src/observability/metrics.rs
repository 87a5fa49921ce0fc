//! Delivery metrics.
//!
//! # Metrics
//! - `relay_log_records_total` (counter): records dispatched, by severity
//! - `relay_sink_sends_total` (counter): sink sends, by sink and outcome
//! - `relay_sink_send_duration_seconds` (histogram): send latency, by sink
//! - `relay_local_write_failures_total` (counter): local/host writer panics
//!
//! Recorded through the `metrics` facade; the embedding application decides
//! whether and where to export them.

use std::time::Instant;

use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    Failed,
    TimedOut,
}

impl SendOutcome {
    fn as_str(self) -> &'static str {
        match self {
            SendOutcome::Delivered => "delivered",
            SendOutcome::Failed => "failed",
            SendOutcome::TimedOut => "timed_out",
        }
    }
}

pub fn record_dispatch(severity: Severity) {
    ::metrics::counter!("relay_log_records_total", "severity" => severity.as_str()).increment(1);
}

pub fn record_sink_send(sink: &str, outcome: SendOutcome, started: Instant) {
    ::metrics::counter!(
        "relay_sink_sends_total",
        "sink" => sink.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    ::metrics::histogram!("relay_sink_send_duration_seconds", "sink" => sink.to_string())
        .record(started.elapsed().as_secs_f64());
}

pub fn record_local_write_failure() {
    ::metrics::counter!("relay_local_write_failures_total").increment(1);
}
