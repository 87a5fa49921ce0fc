//! Observability of the logger itself.
//!
//! # Data Flow
//! ```text
//! configure / dispatch / sinks produce:
//!     → tracing events (sink skipped, sink failed, reload)
//!     → metrics.rs (records, sends, latency)
//!
//! logging.rs installs a subscriber for binaries that want to see them.
//! ```
//!
//! # Design Decisions
//! - Diagnostics never go through the logger's own sinks (no feedback loop)
//! - Metrics are cheap facade calls; no exporter is bundled

pub mod logging;
pub mod metrics;
