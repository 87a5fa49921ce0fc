//! Host-provided, request-scoped logger.
//!
//! # Responsibilities
//! - Hold the four per-level writers a serverless host exposes
//! - Reject incomplete writer sets as a whole
//! - Route the six severities onto the four host buckets
//!
//! When a host context is active it replaces the local writer for that call.

use std::fmt;

use crate::severity::{HostBucket, Severity};
use crate::sinks::local::LineWriter;

/// Writers as supplied by the host; any may be missing.
#[derive(Clone, Default)]
pub struct PerLevelLoggers {
    pub error: Option<LineWriter>,
    pub warn: Option<LineWriter>,
    pub info: Option<LineWriter>,
    pub verbose: Option<LineWriter>,
}

impl PerLevelLoggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error<F: Fn(&str) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.error = Some(LineWriter::new(f));
        self
    }

    pub fn warn<F: Fn(&str) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.warn = Some(LineWriter::new(f));
        self
    }

    pub fn info<F: Fn(&str) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.info = Some(LineWriter::new(f));
        self
    }

    pub fn verbose<F: Fn(&str) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.verbose = Some(LineWriter::new(f));
        self
    }

    /// All four writers, or nothing.
    pub fn complete(&self) -> Option<HostLoggers> {
        Some(HostLoggers {
            error: self.error.clone()?,
            warn: self.warn.clone()?,
            info: self.info.clone()?,
            verbose: self.verbose.clone()?,
        })
    }
}

impl fmt::Debug for PerLevelLoggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerLevelLoggers")
            .field("error", &self.error.is_some())
            .field("warn", &self.warn.is_some())
            .field("info", &self.info.is_some())
            .field("verbose", &self.verbose.is_some())
            .finish()
    }
}

/// A complete set of host writers.
#[derive(Debug, Clone)]
pub struct HostLoggers {
    error: LineWriter,
    warn: LineWriter,
    info: LineWriter,
    verbose: LineWriter,
}

impl HostLoggers {
    pub fn writer_for(&self, severity: Severity) -> &LineWriter {
        match severity.host_bucket() {
            HostBucket::Error => &self.error,
            HostBucket::Warn => &self.warn,
            HostBucket::Info => &self.info,
            HostBucket::Verbose => &self.verbose,
        }
    }

    pub fn emit(&self, severity: Severity, text: &str) -> bool {
        self.writer_for(severity).write(text)
    }
}

/// Host context in effect for a call.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    pub invocation_id: Option<String>,
    pub loggers: Option<HostLoggers>,
    pub exclude_invocation_id: bool,
}

impl HostContext {
    /// Build a per-call context. Incomplete writer sets are dropped, leaving
    /// only the invocation id.
    pub fn new(invocation_id: Option<String>, loggers: &PerLevelLoggers) -> Self {
        let loggers = loggers.complete();
        if loggers.is_none() {
            tracing::debug!("host context rejected: error, warn, info and verbose writers are all required");
        }
        Self {
            invocation_id,
            loggers,
            exclude_invocation_id: false,
        }
    }

    pub fn exclude_invocation_id(mut self, exclude: bool) -> Self {
        self.exclude_invocation_id = exclude;
        self
    }

    /// Invocation id to put ahead of the prefix, if any.
    pub fn leading_id(&self) -> Option<&str> {
        if self.exclude_invocation_id {
            None
        } else {
            self.invocation_id.as_deref()
        }
    }
}
