//! Error types for configuration, dispatch and sink transports.

use thiserror::Error;

/// Errors returned to the caller of [`crate::Logger::log`].
///
/// Outside production these are raised; in production the engine
/// substitutes a safe default and records a local warning instead.
#[derive(Debug, Error)]
pub enum LogError {
    /// The level string does not name a severity.
    #[error("Unknown log level '{0}'")]
    InvalidLevel(String),

    /// A configured prefix or suffix is not a string.
    #[error("logger {field} has to be of type string")]
    InvalidAffix { field: &'static str },

    /// A sink failed at send time because of its own configuration.
    #[error("sink '{sink}' is misconfigured: {source}")]
    Sink {
        sink: String,
        #[source]
        source: SinkError,
    },
}

/// Errors produced by a sink transport.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Request could not be sent.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// Target URL is malformed or not acceptable for this sink.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Socket level failure (syslog).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Send did not finish within the configured deadline.
    #[error("send timed out after {0} ms")]
    Timeout(u64),

    /// Transport-specific failure.
    #[error("{0}")]
    Other(String),
}

impl SinkError {
    /// True when the failure stems from the sink's configuration rather than
    /// from delivery.
    pub fn is_config_error(&self) -> bool {
        matches!(self, SinkError::InvalidUrl { .. })
    }
}

/// Errors raised while loading an options file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

/// Result type for dispatch operations.
pub type LogResult<T> = Result<T, LogError>;
