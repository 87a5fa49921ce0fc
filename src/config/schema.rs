//! Logger options schema.
//!
//! Every field is optional: options describe a *change* to the current
//! configuration. [`LogOptions::merge`] folds a newer set over an older one,
//! field by field, so `configure(LogOptions::default())` never erases
//! anything. The serialisable part can be read from a TOML file; writers and
//! host loggers are supplied from code.

use serde::Deserialize;
use serde_json::Value;

use crate::sinks::host::PerLevelLoggers;
use crate::sinks::local::LineWriter;

/// Deep merge where the newer value wins wherever it is set.
pub trait Merge {
    fn merge(self, newer: Self) -> Self;
}

fn merge_opt<T: Merge>(older: Option<T>, newer: Option<T>) -> Option<T> {
    match (older, newer) {
        (Some(o), Some(n)) => Some(o.merge(n)),
        (o, None) => o,
        (None, n) => n,
    }
}

macro_rules! merge_fields {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl Merge for $ty {
            fn merge(self, newer: Self) -> Self {
                Self {
                    $($field: newer.$field.or(self.$field),)*
                }
            }
        }
    };
}

/// Prefix or suffix value. Anything other than a string is kept as
/// [`Affix::Invalid`] so the dispatch engine can reject it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Affix {
    Text(String),
    Invalid(Value),
}

impl From<&str> for Affix {
    fn from(s: &str) -> Self {
        Affix::Text(s.to_string())
    }
}

impl From<String> for Affix {
    fn from(s: String) -> Self {
        Affix::Text(s)
    }
}

/// Transport for the legacy syslog aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyslogProtocol {
    #[default]
    Udp,
    Tcp,
}

/// HTTP log aggregator (plain text lines with token auth).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteOptions {
    pub disabled: Option<bool>,
    pub only_in_prod: Option<bool>,
    pub host: Option<String>,
    pub token: Option<String>,
    /// Least urgent severity forwarded; unset forwards everything.
    pub level: Option<String>,
    pub timeout_ms: Option<u64>,
}

merge_fields!(RemoteOptions { disabled, only_in_prod, host, token, level, timeout_ms });

impl RemoteOptions {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            token: Some(token.into()),
            ..Self::default()
        }
    }
}

/// Betterstack HTTP ingestion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BetterstackOptions {
    pub disabled: Option<bool>,
    pub only_in_prod: Option<bool>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub level: Option<String>,
    pub timeout_ms: Option<u64>,
}

merge_fields!(BetterstackOptions { disabled, only_in_prod, url, token, level, timeout_ms });

/// Teams chat webhook. Defaults to `warn` as threshold.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TeamsOptions {
    pub disabled: Option<bool>,
    pub only_in_prod: Option<bool>,
    pub url: Option<String>,
    pub level: Option<String>,
    pub timeout_ms: Option<u64>,
}

merge_fields!(TeamsOptions { disabled, only_in_prod, url, level, timeout_ms });

impl TeamsOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Legacy syslog aggregator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyslogOptions {
    pub disabled: Option<bool>,
    pub only_in_prod: Option<bool>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Name this service reports as.
    pub hostname: Option<String>,
    pub protocol: Option<SyslogProtocol>,
    pub level: Option<String>,
    pub timeout_ms: Option<u64>,
}

merge_fields!(SyslogOptions { disabled, only_in_prod, host, port, hostname, protocol, level, timeout_ms });

/// Request-scoped host logging facility.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostContextOptions {
    pub invocation_id: Option<String>,
    #[serde(skip)]
    pub loggers: Option<PerLevelLoggers>,
    pub exclude_invocation_id: Option<bool>,
}

merge_fields!(HostContextOptions { invocation_id, loggers, exclude_invocation_id });

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ErrorOptions {
    pub use_message: Option<bool>,
}

merge_fields!(ErrorOptions { use_message });

/// Partial logger configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub remote: Option<RemoteOptions>,
    pub betterstack: Option<BetterstackOptions>,
    pub teams: Option<TeamsOptions>,
    pub syslog: Option<SyslogOptions>,
    pub host_context: Option<HostContextOptions>,
    pub prefix: Option<Affix>,
    pub suffix: Option<Affix>,
    #[serde(skip)]
    pub local_logger: Option<LineWriter>,
    pub error: Option<ErrorOptions>,
}

impl Merge for LogOptions {
    fn merge(self, newer: Self) -> Self {
        Self {
            remote: merge_opt(self.remote, newer.remote),
            betterstack: merge_opt(self.betterstack, newer.betterstack),
            teams: merge_opt(self.teams, newer.teams),
            syslog: merge_opt(self.syslog, newer.syslog),
            host_context: merge_opt(self.host_context, newer.host_context),
            prefix: newer.prefix.or(self.prefix),
            suffix: newer.suffix.or(self.suffix),
            local_logger: newer.local_logger.or(self.local_logger),
            error: merge_opt(self.error, newer.error),
        }
    }
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<Affix>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<Affix>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn local_logger<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.local_logger = Some(LineWriter::new(f));
        self
    }

    pub fn local_writer(mut self, writer: LineWriter) -> Self {
        self.local_logger = Some(writer);
        self
    }

    pub fn use_error_message(mut self, use_message: bool) -> Self {
        self.error = Some(ErrorOptions {
            use_message: Some(use_message),
        });
        self
    }

    pub fn remote(mut self, remote: RemoteOptions) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn betterstack(mut self, betterstack: BetterstackOptions) -> Self {
        self.betterstack = Some(betterstack);
        self
    }

    pub fn teams(mut self, teams: TeamsOptions) -> Self {
        self.teams = Some(teams);
        self
    }

    pub fn syslog(mut self, syslog: SyslogOptions) -> Self {
        self.syslog = Some(syslog);
        self
    }

    pub fn host_context(mut self, host_context: HostContextOptions) -> Self {
        self.host_context = Some(host_context);
        self
    }
}
