//! Multi-sink logging facade.
//!
//! One call formats a record once and delivers it to a local writer (or a
//! host-provided per-level writer) and to every configured remote sink:
//! a plain-text HTTP aggregator, Betterstack, a Teams-style chat webhook and
//! syslog. Each sink is gated by environment and severity threshold, and a
//! failing sink never affects the caller or the other sinks.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod observability;
pub mod resilience;
pub mod severity;
pub mod sinks;

pub use config::{
    BetterstackOptions, Environment, ErrorOptions, HostContextOptions, LogOptions, Merge,
    PackageInfo, RemoteOptions, Settings, SyslogOptions, SyslogProtocol, TeamsOptions,
};
pub use dispatch::{DispatchOutcome, Logger, LoggerBuilder, SinkOutcome};
pub use error::{ConfigError, LogError, LogResult, SinkError};
pub use message::{ErrorPolicy, Fragment, Message};
pub use severity::Severity;
pub use sinks::host::{HostContext, PerLevelLoggers};
pub use sinks::local::LineWriter;
pub use sinks::{GatePolicy, Payload, PayloadBody, Sink, SinkKind, SinkTarget, Transport, TransportFactory};
