//! Sink subsystem.
//!
//! # Data Flow
//! ```text
//! FormattedRecord
//!     → Sink::gate (enabled × environment × threshold)
//!     → Sink::format (text line or chat cards)
//!     → Sink::send → Transport::log (HTTP, webhook, syslog, test double)
//!
//! Local and host writers (local.rs, host.rs) are not sinks: they are the
//! always-on floor the engine falls back to.
//! ```
//!
//! # Design Decisions
//! - The engine iterates `Arc<dyn Sink>`; new destinations need no engine change
//! - Built-in destinations share one `ConfiguredSink`; only the transport differs
//! - Transports are built through an injected `TransportFactory`

pub mod betterstack;
pub mod host;
pub mod local;
pub mod remote;
pub mod syslog;
pub mod teams;
pub mod transport;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use futures_util::future::BoxFuture;

use crate::error::SinkError;
use crate::message::{ChatCards, FormattedRecord};
use crate::severity::Severity;

pub use transport::{NetworkTransports, SinkKind, SinkTarget, Transport, TransportFactory};

/// Whether a sink receives a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
    pub enabled: bool,
    pub only_in_production: bool,
    /// Least urgent severity accepted; `None` accepts all.
    pub minimum: Option<Severity>,
}

impl GatePolicy {
    pub fn allows(&self, severity: Severity, production: bool) -> bool {
        self.enabled
            && (production || !self.only_in_production)
            && self.minimum.map_or(true, |m| severity.within(m))
    }
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            only_in_production: true,
            minimum: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PayloadBody {
    Text(String),
    Cards(ChatCards),
}

/// What a transport receives.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub severity: Severity,
    pub resolved_at: DateTime<Local>,
    pub body: PayloadBody,
}

impl Payload {
    pub fn text(record: &FormattedRecord, text: impl Into<String>) -> Self {
        Self {
            severity: record.severity,
            resolved_at: record.resolved_at,
            body: PayloadBody::Text(text.into()),
        }
    }

    pub fn cards(record: &FormattedRecord) -> Self {
        Self {
            severity: record.severity,
            resolved_at: record.resolved_at,
            body: PayloadBody::Cards(record.cards.clone()),
        }
    }

    /// The body as one text line. Cards render as the adaptive card JSON.
    pub fn as_text(&self) -> String {
        match &self.body {
            PayloadBody::Text(text) => text.clone(),
            PayloadBody::Cards(cards) => cards.adaptive_card.to_string(),
        }
    }
}

/// A destination for formatted records.
pub trait Sink: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn policy(&self) -> GatePolicy;

    fn gate(&self, severity: Severity, production: bool) -> bool {
        self.policy().allows(severity, production)
    }

    fn format(&self, record: &FormattedRecord) -> Payload;

    fn send(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>>;

    /// Deadline for one send; `None` waits indefinitely.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Drop any long-lived connection after an abandoned send.
    fn reset(&self) {}
}

/// A built-in destination: gate policy plus a transport.
pub struct ConfiguredSink {
    kind: SinkKind,
    policy: GatePolicy,
    transport: Arc<dyn Transport>,
    timeout: Option<Duration>,
}

impl ConfiguredSink {
    pub fn new(
        kind: SinkKind,
        policy: GatePolicy,
        transport: Arc<dyn Transport>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            kind,
            policy,
            transport,
            timeout,
        }
    }

    pub fn kind(&self) -> SinkKind {
        self.kind
    }
}

impl fmt::Debug for ConfiguredSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredSink")
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Sink for ConfiguredSink {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn policy(&self) -> GatePolicy {
        self.policy
    }

    fn format(&self, record: &FormattedRecord) -> Payload {
        match self.kind {
            SinkKind::Remote | SinkKind::Syslog => Payload::text(record, record.remote_text.clone()),
            SinkKind::Betterstack => Payload::text(record, record.text.clone()),
            SinkKind::Teams => Payload::cards(record),
        }
    }

    fn send(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>> {
        self.transport.log(payload)
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn reset(&self) {
        self.transport.reset();
    }
}
