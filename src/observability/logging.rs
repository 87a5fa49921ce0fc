//! Diagnostics subscriber.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber for binaries embedding the logger
//! - Keep diagnostics on stderr so they never mix with local log lines
//!
//! # Design Decisions
//! - Filter from `RUST_LOG`, falling back to the given default
//! - JSON format for production, pretty format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_diagnostics(format: DiagnosticFormat, default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let (pretty, json) = match format {
        DiagnosticFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        DiagnosticFormat::Json => (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init_diagnostics(DiagnosticFormat::Pretty, "relay_logger=debug");
        init_diagnostics(DiagnosticFormat::Json, "relay_logger=debug");
    }
}
