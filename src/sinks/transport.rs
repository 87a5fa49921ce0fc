//! Transport capability and its default network factory.

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::config::schema::SyslogProtocol;
use crate::error::SinkError;
use crate::sinks::betterstack::BetterstackTransport;
use crate::sinks::remote::RemoteTransport;
use crate::sinks::syslog::SyslogTransport;
use crate::sinks::teams::TeamsTransport;
use crate::sinks::Payload;

/// Delivers one payload to an external service.
pub trait Transport: Send + Sync {
    fn log(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>>;

    /// Forget connection state; the next `log` reconnects.
    fn reset(&self) {}
}

/// The built-in destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Remote,
    Betterstack,
    Teams,
    Syslog,
}

impl SinkKind {
    pub fn name(self) -> &'static str {
        match self {
            SinkKind::Remote => "remote",
            SinkKind::Betterstack => "betterstack",
            SinkKind::Teams => "teams",
            SinkKind::Syslog => "syslog",
        }
    }
}

/// Connection details the resolver hands to a [`TransportFactory`].
#[derive(Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Remote {
        host: String,
        token: String,
    },
    Betterstack {
        url: String,
        token: String,
    },
    Teams {
        url: String,
    },
    Syslog {
        host: String,
        port: u16,
        hostname: String,
        protocol: SyslogProtocol,
    },
}

impl SinkTarget {
    pub fn kind(&self) -> SinkKind {
        match self {
            SinkTarget::Remote { .. } => SinkKind::Remote,
            SinkTarget::Betterstack { .. } => SinkKind::Betterstack,
            SinkTarget::Teams { .. } => SinkKind::Teams,
            SinkTarget::Syslog { .. } => SinkKind::Syslog,
        }
    }
}

// Tokens stay out of debug output.
impl fmt::Debug for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkTarget::Remote { host, .. } => f
                .debug_struct("Remote")
                .field("host", host)
                .field("token", &"***")
                .finish(),
            SinkTarget::Betterstack { url, .. } => f
                .debug_struct("Betterstack")
                .field("url", url)
                .field("token", &"***")
                .finish(),
            SinkTarget::Teams { url } => f.debug_struct("Teams").field("url", url).finish(),
            SinkTarget::Syslog {
                host,
                port,
                hostname,
                protocol,
            } => f
                .debug_struct("Syslog")
                .field("host", host)
                .field("port", port)
                .field("hostname", hostname)
                .field("protocol", protocol)
                .finish(),
        }
    }
}

/// Builds transports during configuration.
pub trait TransportFactory: Send + Sync {
    fn build(&self, target: &SinkTarget) -> Result<Arc<dyn Transport>, SinkError>;
}

/// Real network transports sharing one HTTP client.
#[derive(Debug, Clone, Default)]
pub struct NetworkTransports {
    client: reqwest::Client,
}

impl NetworkTransports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl TransportFactory for NetworkTransports {
    fn build(&self, target: &SinkTarget) -> Result<Arc<dyn Transport>, SinkError> {
        let transport: Arc<dyn Transport> = match target {
            SinkTarget::Remote { host, token } => {
                Arc::new(RemoteTransport::new(self.client.clone(), host, token)?)
            }
            SinkTarget::Betterstack { url, token } => Arc::new(BetterstackTransport::new(
                self.client.clone(),
                url.clone(),
                token.clone(),
            )),
            SinkTarget::Teams { url } => Arc::new(TeamsTransport::new(self.client.clone(), url.clone())),
            SinkTarget::Syslog {
                host,
                port,
                hostname,
                protocol,
            } => Arc::new(SyslogTransport::new(host, *port, hostname, *protocol)?),
        };
        Ok(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_tokens() {
        let target = SinkTarget::Remote {
            host: "https://logs.example".into(),
            token: "s3cret".into(),
        };
        let shown = format!("{target:?}");
        assert!(shown.contains("logs.example"));
        assert!(!shown.contains("s3cret"));
    }

    #[test]
    fn test_remote_build_rejects_bad_url() {
        let factory = NetworkTransports::new();
        let result = factory.build(&SinkTarget::Remote {
            host: "not a url".into(),
            token: "t".into(),
        });
        assert!(matches!(result, Err(SinkError::InvalidUrl { .. })));
    }

    #[test]
    fn test_teams_build_is_lazy() {
        let factory = NetworkTransports::new();
        let result = factory.build(&SinkTarget::Teams {
            url: "::not-a-url::".into(),
        });
        assert!(result.is_ok());
    }
}
