//! Configuration resolver.
//!
//! # Responsibilities
//! - Fill sink groups from environment defaults, explicit fields winning
//! - Decide per sink whether it is enabled; build transports only for enabled sinks
//! - Parse thresholds leniently (an unknown level means "accept all")
//! - Accept host contexts only with all four writers
//!
//! # Design Decisions
//! - Resolution never fails; problems become notes the engine logs locally
//! - A sink whose transport cannot be built is treated as disabled

use std::sync::Arc;
use std::time::Duration;

use crate::config::env::{self, Environment};
use crate::config::schema::{
    Affix, BetterstackOptions, LogOptions, RemoteOptions, SyslogOptions, TeamsOptions,
};
use crate::message::ErrorPolicy;
use crate::severity::Severity;
use crate::sinks::host::HostContext;
use crate::sinks::local::LineWriter;
use crate::sinks::{ConfiguredSink, GatePolicy, Sink, SinkKind, SinkTarget, TransportFactory};

const DEFAULT_SYSLOG_PORT: u16 = 514;
const NIL_HOSTNAME: &str = "-";

/// Effective configuration read by the dispatch engine on every call.
#[derive(Debug, Clone)]
pub struct Settings {
    pub production: bool,
    pub prefix: Option<Affix>,
    pub suffix: Option<Affix>,
    pub error_policy: ErrorPolicy,
    pub local: LineWriter,
    pub host: Option<HostContext>,
    pub sinks: Vec<Arc<dyn Sink>>,
}

impl Settings {
    pub fn sink(&self, name: &str) -> Option<&Arc<dyn Sink>> {
        self.sinks.iter().find(|s| s.name() == name)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            production: false,
            prefix: None,
            suffix: None,
            error_policy: ErrorPolicy::default(),
            local: LineWriter::default(),
            host: None,
            sinks: Vec::new(),
        }
    }
}

/// Outcome of one resolution.
#[derive(Debug)]
pub struct Resolution {
    pub settings: Settings,
    /// Problems found while resolving, to be reported as warnings.
    pub notes: Vec<String>,
}

/// Options for one built-in sink after environment defaults are applied.
struct SinkSpec {
    kind: SinkKind,
    disabled: bool,
    only_in_prod: Option<bool>,
    level: Option<String>,
    default_level: Option<Severity>,
    timeout_ms: Option<u64>,
    /// `None` when the required fields are missing.
    target: Option<SinkTarget>,
}

pub struct Resolver<'a> {
    env: &'a Environment,
    transports: &'a dyn TransportFactory,
}

impl<'a> Resolver<'a> {
    pub fn new(env: &'a Environment, transports: &'a dyn TransportFactory) -> Self {
        Self { env, transports }
    }

    pub fn resolve(&self, options: &LogOptions) -> Resolution {
        let mut notes = Vec::new();

        let specs = [
            self.remote_spec(options.remote.as_ref()),
            self.betterstack_spec(options.betterstack.as_ref()),
            self.teams_spec(options.teams.as_ref()),
            self.syslog_spec(options.syslog.as_ref(), &mut notes),
        ];

        let sinks = specs
            .into_iter()
            .flatten()
            .filter_map(|spec| self.build_sink(spec, &mut notes))
            .collect();

        let host = options.host_context.as_ref().map(|opts| {
            let loggers = opts.loggers.as_ref().and_then(|l| {
                let complete = l.complete();
                if complete.is_none() {
                    notes.push(
                        "host context ignored: error, warn, info and verbose writers are all required"
                            .to_string(),
                    );
                }
                complete
            });
            HostContext {
                invocation_id: opts.invocation_id.clone(),
                loggers,
                exclude_invocation_id: opts.exclude_invocation_id.unwrap_or(false),
            }
        });

        let settings = Settings {
            production: self.env.is_production(),
            prefix: options.prefix.clone(),
            suffix: options.suffix.clone(),
            error_policy: ErrorPolicy {
                use_message: options
                    .error
                    .as_ref()
                    .and_then(|e| e.use_message)
                    .unwrap_or(false),
            },
            local: options.local_logger.clone().unwrap_or_default(),
            host,
            sinks,
        };

        Resolution { settings, notes }
    }

    fn remote_spec(&self, opts: Option<&RemoteOptions>) -> Option<SinkSpec> {
        let env_host = self.env.get_owned(env::REMOTE_HOST);
        let env_token = self.env.get_owned(env::REMOTE_TOKEN);
        if opts.is_none() && (env_host.is_none() || env_token.is_none()) {
            return None;
        }
        let opts = opts.cloned().unwrap_or_default();
        let host = opts.host.or(env_host);
        let token = opts.token.or(env_token);

        Some(SinkSpec {
            kind: SinkKind::Remote,
            disabled: opts.disabled.unwrap_or(false),
            only_in_prod: opts.only_in_prod,
            level: opts.level,
            default_level: None,
            timeout_ms: opts.timeout_ms,
            target: host
                .zip(token)
                .map(|(host, token)| SinkTarget::Remote { host, token }),
        })
    }

    fn betterstack_spec(&self, opts: Option<&BetterstackOptions>) -> Option<SinkSpec> {
        let env_url = self.env.get_owned(env::BETTERSTACK_URL);
        let env_token = self.env.get_owned(env::BETTERSTACK_TOKEN);
        if opts.is_none() && (env_url.is_none() || env_token.is_none()) {
            return None;
        }
        let opts = opts.cloned().unwrap_or_default();
        let url = opts.url.or(env_url);
        let token = opts.token.or(env_token);

        Some(SinkSpec {
            kind: SinkKind::Betterstack,
            disabled: opts.disabled.unwrap_or(false),
            only_in_prod: opts.only_in_prod,
            level: opts.level,
            default_level: None,
            timeout_ms: opts.timeout_ms,
            target: url
                .zip(token)
                .map(|(url, token)| SinkTarget::Betterstack { url, token }),
        })
    }

    fn teams_spec(&self, opts: Option<&TeamsOptions>) -> Option<SinkSpec> {
        let env_url = self.env.get_owned(env::CHAT_WEBHOOK_URL);
        if opts.is_none() && env_url.is_none() {
            return None;
        }
        let opts = opts.cloned().unwrap_or_default();
        let url = opts.url.or(env_url);

        Some(SinkSpec {
            kind: SinkKind::Teams,
            disabled: opts.disabled.unwrap_or(false),
            only_in_prod: opts.only_in_prod,
            level: opts.level,
            default_level: Some(Severity::Warn),
            timeout_ms: opts.timeout_ms,
            target: url.map(|url| SinkTarget::Teams { url }),
        })
    }

    fn syslog_spec(&self, opts: Option<&SyslogOptions>, notes: &mut Vec<String>) -> Option<SinkSpec> {
        let env_host = self.env.get_owned(env::SYSLOG_HOST);
        if opts.is_none() && env_host.is_none() {
            return None;
        }
        let opts = opts.cloned().unwrap_or_default();
        let host = opts.host.or(env_host);

        let env_port = self.env.get(env::SYSLOG_PORT).and_then(|raw| match raw.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                notes.push(format!("ignoring invalid {} '{raw}'", env::SYSLOG_PORT));
                None
            }
        });
        let port = opts.port.or(env_port).unwrap_or(DEFAULT_SYSLOG_PORT);
        let hostname = opts
            .hostname
            .or_else(|| self.env.get_owned(env::SYSLOG_HOSTNAME))
            .unwrap_or_else(|| NIL_HOSTNAME.to_string());

        Some(SinkSpec {
            kind: SinkKind::Syslog,
            disabled: opts.disabled.unwrap_or(false),
            only_in_prod: opts.only_in_prod,
            level: opts.level,
            default_level: None,
            timeout_ms: opts.timeout_ms,
            target: host.map(|host| SinkTarget::Syslog {
                host,
                port,
                hostname,
                protocol: opts.protocol.unwrap_or_default(),
            }),
        })
    }

    fn build_sink(&self, spec: SinkSpec, notes: &mut Vec<String>) -> Option<Arc<dyn Sink>> {
        let name = spec.kind.name();
        if spec.disabled {
            tracing::debug!(sink = name, "sink disabled by configuration");
            return None;
        }
        let Some(target) = spec.target else {
            tracing::debug!(sink = name, "sink disabled: required connection fields missing");
            return None;
        };

        let minimum = match spec.level {
            None => spec.default_level,
            Some(level) => match Severity::resolve(&level) {
                Some(severity) => Some(severity),
                None => {
                    notes.push(format!(
                        "invalid level '{level}' for sink '{name}'; forwarding all severities"
                    ));
                    None
                }
            },
        };

        let timeout = match spec.timeout_ms {
            Some(0) => {
                notes.push(format!("timeout_ms for sink '{name}' must be positive; no deadline applied"));
                None
            }
            other => other.map(Duration::from_millis),
        };

        let transport = match self.transports.build(&target) {
            Ok(transport) => transport,
            Err(e) => {
                notes.push(format!("sink '{name}' disabled: {e}"));
                return None;
            }
        };

        let policy = GatePolicy {
            enabled: true,
            only_in_production: spec.only_in_prod.unwrap_or(true),
            minimum,
        };
        tracing::debug!(sink = name, ?policy, "sink configured");

        Some(Arc::new(ConfiguredSink::new(spec.kind, policy, transport, timeout)))
    }
}
