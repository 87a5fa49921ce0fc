//! Severity model.
//!
//! # Ordering
//! ```text
//! error(0) < warn(1) < info(2) < verbose(3) < debug(4) < silly(5)
//! ```
//! A lower rank is more urgent. A sink threshold of `info` accepts
//! `error`, `warn` and `info`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Total-ordered urgency of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error = 0,
    Warn = 1,
    Info = 2,
    Verbose = 3,
    Debug = 4,
    Silly = 5,
}

/// The four buckets a host-provided logger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostBucket {
    Error,
    Warn,
    Info,
    Verbose,
}

const LONGEST_NAME: usize = 7; // "verbose"

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Verbose,
        Severity::Debug,
        Severity::Silly,
    ];

    /// Look up a level name, ignoring case. `None` is the unresolved state.
    pub fn resolve(level: &str) -> Option<Severity> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(level))
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Verbose => "verbose",
            Severity::Debug => "debug",
            Severity::Silly => "silly",
        }
    }

    /// Upper-case label used on every formatted line.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Verbose => "VERBOSE",
            Severity::Debug => "DEBUG",
            Severity::Silly => "SILLY",
        }
    }

    /// Spaces that align the local line after `< LEVEL >`.
    pub fn padding(self) -> String {
        " ".repeat(LONGEST_NAME - self.as_str().len())
    }

    /// True when a record of this severity passes a threshold.
    pub fn within(self, threshold: Severity) -> bool {
        self <= threshold
    }

    /// Hex colour for the legacy message card.
    pub fn theme_color(self) -> &'static str {
        match self {
            Severity::Error => "d13438",
            Severity::Warn => "ffaa44",
            Severity::Info => "2e86de",
            Severity::Verbose => "8e8e8e",
            Severity::Debug => "6c757d",
            Severity::Silly => "b86bff",
        }
    }

    /// Named colour for adaptive card text blocks.
    pub fn adaptive_color(self) -> &'static str {
        match self {
            Severity::Error => "attention",
            Severity::Warn => "warning",
            Severity::Info => "accent",
            Severity::Verbose | Severity::Debug => "default",
            Severity::Silly => "good",
        }
    }

    pub fn host_bucket(self) -> HostBucket {
        match self {
            Severity::Error => HostBucket::Error,
            Severity::Warn => HostBucket::Warn,
            Severity::Info => HostBucket::Info,
            Severity::Verbose | Severity::Debug | Severity::Silly => HostBucket::Verbose,
        }
    }

    /// RFC 5424 severity code.
    pub fn syslog_code(self) -> u8 {
        match self {
            Severity::Error => 3,
            Severity::Warn => 4,
            Severity::Info => 6,
            Severity::Verbose | Severity::Debug | Severity::Silly => 7,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = crate::error::LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::resolve(s).ok_or_else(|| crate::error::LogError::InvalidLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_any_case() {
        let cases = [
            ("error", 0),
            ("warn", 1),
            ("info", 2),
            ("verbose", 3),
            ("debug", 4),
            ("silly", 5),
            ("Error", 0),
            ("WARN", 1),
        ];
        for (name, rank) in cases {
            assert_eq!(Severity::resolve(name).map(Severity::rank), Some(rank), "{name}");
        }
    }

    #[test]
    fn test_unresolved_names() {
        assert_eq!(Severity::resolve("randomString"), None);
        assert_eq!(Severity::resolve(""), None);
        assert_eq!(Severity::resolve("123"), None);
        assert!("nope".parse::<Severity>().is_err());
    }

    #[test]
    fn test_total_order() {
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(Severity::Error.within(Severity::Warn));
        assert!(Severity::Warn.within(Severity::Warn));
        assert!(!Severity::Info.within(Severity::Warn));
    }

    #[test]
    fn test_padding_aligns_labels() {
        for s in Severity::ALL {
            assert_eq!(s.as_str().len() + s.padding().len(), 7);
        }
    }

    #[test]
    fn test_host_buckets() {
        assert_eq!(Severity::Error.host_bucket(), HostBucket::Error);
        assert_eq!(Severity::Warn.host_bucket(), HostBucket::Warn);
        assert_eq!(Severity::Info.host_bucket(), HostBucket::Info);
        assert_eq!(Severity::Verbose.host_bucket(), HostBucket::Verbose);
        assert_eq!(Severity::Debug.host_bucket(), HostBucket::Verbose);
        assert_eq!(Severity::Silly.host_bucket(), HostBucket::Verbose);
    }
}
