//! Per-call dispatch results.

use crate::severity::Severity;
use crate::sinks::SinkKind;

/// What happened at one sink during one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOutcome {
    pub name: String,
    /// Gate passed and a send was started.
    pub attempted: bool,
    /// Send completed without error.
    pub delivered: bool,
    pub error: Option<String>,
}

impl SinkOutcome {
    pub fn gated_off(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempted: false,
            delivered: false,
            error: None,
        }
    }

    pub fn delivered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempted: true,
            delivered: true,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempted: true,
            delivered: false,
            error: Some(error.into()),
        }
    }
}

/// Result of one `log` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Severity actually used (after fallback).
    pub severity: Severity,
    pub sinks: Vec<SinkOutcome>,
}

impl DispatchOutcome {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            sinks: Vec::new(),
        }
    }

    pub fn sink(&self, name: &str) -> Option<&SinkOutcome> {
        self.sinks.iter().find(|s| s.name == name)
    }

    pub fn delivered(&self, name: &str) -> bool {
        self.sink(name).is_some_and(|s| s.delivered)
    }

    pub fn attempted(&self, name: &str) -> bool {
        self.sink(name).is_some_and(|s| s.attempted)
    }

    /// The remote aggregator's gate passed and its send succeeded.
    pub fn remote(&self) -> bool {
        self.delivered(SinkKind::Remote.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_flag() {
        let mut outcome = DispatchOutcome::new(Severity::Info);
        assert!(!outcome.remote());

        outcome.sinks.push(SinkOutcome::failed("remote", "status 500"));
        assert!(outcome.attempted("remote"));
        assert!(!outcome.remote());

        outcome.sinks[0] = SinkOutcome::delivered("remote");
        assert!(outcome.remote());
        assert!(!outcome.delivered("teams"));
    }
}
