//! The dispatch engine.
//!
//! # Steps per call
//! ```text
//! 1. resolve severity        unknown level: error outside production, WARN inside
//! 2. check prefix/suffix     non-string: error outside production, dropped inside
//! 3. normalise message       [invocation id] [prefix] fragments.. [suffix]
//! 4. format                  FormattedRecord (local, remote, host, cards)
//! 5. emit locally            host writer if a host context is active, else local writer
//! 6. fan out                 every gated-in sink, concurrently, each isolated
//! 7. report                  DispatchOutcome; failures become local warnings
//! ```
//!
//! Internal warnings (unknown level, sink failure, resolver notes) only take
//! step 5. They never reach remote sinks, so a failing sink cannot loop.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use arc_swap::ArcSwap;
use futures_util::future::join_all;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::env::Environment;
use crate::config::package::PackageInfo;
use crate::config::resolver::{Resolution, Resolver, Settings};
use crate::config::schema::{Affix, LogOptions, Merge};
use crate::dispatch::outcome::{DispatchOutcome, SinkOutcome};
use crate::error::{LogError, LogResult, SinkError};
use crate::message::{FormattedRecord, Message};
use crate::observability::metrics::{self, SendOutcome};
use crate::resilience::timeouts::with_deadline;
use crate::severity::Severity;
use crate::sinks::host::HostContext;
use crate::sinks::{NetworkTransports, Sink, TransportFactory};

const SELF_NAME: &str = "logger";

/// Options accumulated so far plus sinks registered from code.
#[derive(Default)]
struct ConfigState {
    options: LogOptions,
    custom: Vec<Arc<dyn Sink>>,
    /// Resolver notes already reported; merged options keep producing them.
    reported: Vec<String>,
}

/// A logger instance owning its configuration.
pub struct Logger {
    settings: ArcSwap<Settings>,
    state: Mutex<ConfigState>,
    env: Environment,
    package: Option<PackageInfo>,
    transports: Arc<dyn TransportFactory>,
}

/// Builder for [`Logger`].
#[derive(Default)]
pub struct LoggerBuilder {
    env: Option<Environment>,
    package: Option<PackageInfo>,
    transports: Option<Arc<dyn TransportFactory>>,
    options: LogOptions,
}

impl LoggerBuilder {
    pub fn environment(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn package(mut self, package: PackageInfo) -> Self {
        self.package = Some(package);
        self
    }

    pub fn transports(mut self, transports: Arc<dyn TransportFactory>) -> Self {
        self.transports = Some(transports);
        self
    }

    pub fn options(mut self, options: LogOptions) -> Self {
        self.options = options;
        self
    }

    /// Build and run the first configuration, so environment-only setups
    /// work without an explicit `configure` call.
    pub fn build(self) -> Logger {
        let logger = Logger {
            settings: ArcSwap::from_pointee(Settings::default()),
            state: Mutex::new(ConfigState::default()),
            env: self.env.unwrap_or_else(Environment::from_process),
            package: self.package,
            transports: self
                .transports
                .unwrap_or_else(|| Arc::new(NetworkTransports::new())),
        };
        logger.configure(self.options);
        logger
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Process environment, network transports, and the package found by
    /// [`PackageInfo::detect`]. Deployed binaries should pass
    /// `package_info!()` to the builder instead: neither `CARGO_PKG_*` nor a
    /// `Cargo.toml` exists outside the source tree.
    pub fn new() -> Self {
        let mut builder = Self::builder();
        if let Some(package) = PackageInfo::detect() {
            builder = builder.package(package);
        }
        builder.build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Snapshot of the effective configuration.
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.load_full()
    }

    fn lock_state(&self) -> MutexGuard<'_, ConfigState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Merge `options` over everything configured so far and swap in the
    /// result. Unset fields keep their previous values.
    pub fn configure(&self, options: LogOptions) {
        let notes = {
            let mut state = self.lock_state();
            let merged = std::mem::take(&mut state.options).merge(options);
            let Resolution { mut settings, notes } =
                Resolver::new(&self.env, self.transports.as_ref()).resolve(&merged);
            settings.sinks.extend(state.custom.iter().cloned());
            state.options = merged;
            let fresh: Vec<String> = notes
                .iter()
                .filter(|note| !state.reported.contains(note))
                .cloned()
                .collect();
            state.reported = notes;

            tracing::debug!(
                sinks = ?settings.sinks.iter().map(|s| s.name().to_string()).collect::<Vec<_>>(),
                production = settings.production,
                "logger configured"
            );
            self.settings.store(Arc::new(settings));
            fresh
        };

        if !notes.is_empty() {
            let settings = self.settings.load_full();
            for note in notes {
                self.emit_internal(&settings, settings.host.as_ref(), vec!["configure".into(), note]);
            }
        }
    }

    /// Add a sink that survives later reconfiguration.
    pub fn register_sink(&self, sink: Arc<dyn Sink>) {
        let mut state = self.lock_state();
        state.custom.push(sink.clone());
        let mut settings = Settings::clone(&self.settings.load());
        settings.sinks.push(sink);
        self.settings.store(Arc::new(settings));
    }

    /// Apply every options update received on `updates`, in order.
    pub fn follow(self: &Arc<Self>, mut updates: mpsc::UnboundedReceiver<LogOptions>) -> JoinHandle<()> {
        let logger = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(options) = updates.recv().await {
                logger.configure(options);
                tracing::info!("logger options reloaded");
            }
        })
    }

    /// Log `message` at `level` (case-insensitive).
    pub async fn log(&self, level: &str, message: impl Into<Message>) -> LogResult<DispatchOutcome> {
        self.dispatch(level, message.into(), None).await
    }

    /// Log through a request-scoped host context, overriding any configured
    /// one for this call.
    pub async fn log_in_context(
        &self,
        level: &str,
        message: impl Into<Message>,
        context: &HostContext,
    ) -> LogResult<DispatchOutcome> {
        self.dispatch(level, message.into(), Some(context)).await
    }

    pub async fn error(&self, message: impl Into<Message>) -> LogResult<DispatchOutcome> {
        self.log(Severity::Error.as_str(), message).await
    }

    pub async fn warn(&self, message: impl Into<Message>) -> LogResult<DispatchOutcome> {
        self.log(Severity::Warn.as_str(), message).await
    }

    pub async fn info(&self, message: impl Into<Message>) -> LogResult<DispatchOutcome> {
        self.log(Severity::Info.as_str(), message).await
    }

    pub async fn verbose(&self, message: impl Into<Message>) -> LogResult<DispatchOutcome> {
        self.log(Severity::Verbose.as_str(), message).await
    }

    pub async fn debug(&self, message: impl Into<Message>) -> LogResult<DispatchOutcome> {
        self.log(Severity::Debug.as_str(), message).await
    }

    pub async fn silly(&self, message: impl Into<Message>) -> LogResult<DispatchOutcome> {
        self.log(Severity::Silly.as_str(), message).await
    }

    async fn dispatch(
        &self,
        level: &str,
        message: Message,
        context: Option<&HostContext>,
    ) -> LogResult<DispatchOutcome> {
        let settings = self.settings.load_full();
        let production = settings.production;
        let host = context.or(settings.host.as_ref());

        let severity = match Severity::resolve(level) {
            Some(severity) => severity,
            None if production => {
                self.emit_internal(
                    &settings,
                    host,
                    vec![format!("unknown log level '{level}', logging as {}", Severity::Warn)],
                );
                Severity::Warn
            }
            None => return Err(LogError::InvalidLevel(level.to_string())),
        };

        let prefix = checked_affix(settings.prefix.as_ref(), "prefix", production)?;
        let suffix = checked_affix(settings.suffix.as_ref(), "suffix", production)?;

        let mut fragments = Vec::with_capacity(message.fragments().len() + 3);
        if let Some(id) = host.and_then(HostContext::leading_id) {
            fragments.push(id.to_string());
        }
        fragments.extend(prefix);
        fragments.extend(message.render(settings.error_policy));
        fragments.extend(suffix);

        let record = FormattedRecord::new(severity, fragments, self.package.as_ref());
        metrics::record_dispatch(severity);

        self.emit(&settings, host, &record);

        let results = join_all(
            settings
                .sinks
                .iter()
                .map(|sink| deliver(sink.as_ref(), &record, production)),
        )
        .await;

        let mut outcome = DispatchOutcome::new(severity);
        let mut misconfigured = None;
        for (sink_outcome, error) in results {
            if let Some(err) = error {
                self.emit_internal(
                    &settings,
                    host,
                    vec![sink_outcome.name.clone(), "error".into(), err.to_string()],
                );
                if err.is_config_error() && !production && misconfigured.is_none() {
                    misconfigured = Some(LogError::Sink {
                        sink: sink_outcome.name.clone(),
                        source: err,
                    });
                }
            }
            outcome.sinks.push(sink_outcome);
        }

        match misconfigured {
            Some(err) => Err(err),
            None => Ok(outcome),
        }
    }

    /// Local or host emission. Never fails outward.
    fn emit(&self, settings: &Settings, host: Option<&HostContext>, record: &FormattedRecord) {
        let written = match host.and_then(|h| h.loggers.as_ref()) {
            Some(loggers) => loggers.emit(record.severity, &record.text),
            None => settings.local.write(&record.local_text),
        };
        if !written {
            metrics::record_local_write_failure();
        }
    }

    /// A warning about the logger itself, emitted locally only.
    fn emit_internal(&self, settings: &Settings, host: Option<&HostContext>, detail: Vec<String>) {
        let mut fragments = Vec::with_capacity(detail.len() + 1);
        fragments.push(SELF_NAME.to_string());
        fragments.extend(detail);
        tracing::warn!(detail = %fragments.join(" - "), "logger warning");
        let record = FormattedRecord::new(Severity::Warn, fragments, self.package.as_ref());
        self.emit(settings, host, &record);
    }
}

/// JavaScript-style truthiness of a rejected affix value; falsy values are
/// treated as unset.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn checked_affix(
    affix: Option<&Affix>,
    field: &'static str,
    production: bool,
) -> LogResult<Option<String>> {
    match affix {
        None => Ok(None),
        Some(Affix::Text(text)) => Ok(Some(text.clone())),
        Some(Affix::Invalid(value)) if !production && is_truthy(value) => {
            Err(LogError::InvalidAffix { field })
        }
        Some(Affix::Invalid(_)) => Ok(None),
    }
}

/// Gate, format and send to one sink. Errors are returned, not raised.
async fn deliver(
    sink: &dyn Sink,
    record: &FormattedRecord,
    production: bool,
) -> (SinkOutcome, Option<SinkError>) {
    let name = sink.name().to_string();
    if !sink.gate(record.severity, production) {
        tracing::trace!(sink = %name, severity = %record.severity, "sink gated off");
        return (SinkOutcome::gated_off(name), None);
    }

    let payload = sink.format(record);
    let started = Instant::now();
    match with_deadline(sink.timeout(), sink.send(payload)).await {
        Ok(()) => {
            metrics::record_sink_send(&name, SendOutcome::Delivered, started);
            (SinkOutcome::delivered(name), None)
        }
        Err(err) => {
            let kind = if matches!(err, SinkError::Timeout(_)) {
                sink.reset();
                SendOutcome::TimedOut
            } else {
                SendOutcome::Failed
            };
            metrics::record_sink_send(&name, kind, started);
            tracing::warn!(sink = %name, error = %err, "sink delivery failed");
            (SinkOutcome::failed(name, err.to_string()), Some(err))
        }
    }
}
