//! Legacy syslog aggregator transport.
//!
//! # Responsibilities
//! - Frame records as RFC 5424 lines (facility `user`)
//! - UDP: one datagram per record from an ephemeral socket of the target's
//!   address family
//! - TCP: one long-lived connection, newline-delimited, opened lazily
//!
//! # Design Decisions
//! - A send abandoned by its deadline leaves the stream in an unknown state;
//!   `reset` drops it and the next send reconnects
//! - A reset requested while a send holds the stream is deferred to the next
//!   send, which reconnects before writing

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::SecondsFormat;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tokio::sync::Mutex;

use crate::config::schema::SyslogProtocol;
use crate::error::SinkError;
use crate::sinks::{Payload, Transport};

const FACILITY_USER: u8 = 1;

pub struct SyslogTransport {
    host: String,
    port: u16,
    hostname: String,
    protocol: SyslogProtocol,
    stream: Mutex<Option<TcpStream>>,
    stale: AtomicBool,
}

/// `<PRI>1 TIMESTAMP HOSTNAME - - - - MSG`
pub fn frame(payload: &Payload, hostname: &str) -> String {
    let pri = FACILITY_USER * 8 + payload.severity.syslog_code();
    format!(
        "<{pri}>1 {} {hostname} - - - - {}",
        payload.resolved_at.to_rfc3339_opts(SecondsFormat::Millis, false),
        payload.as_text()
    )
}

impl SyslogTransport {
    pub fn new(host: &str, port: u16, hostname: &str, protocol: SyslogProtocol) -> Result<Self, SinkError> {
        // IPv6 literals may come bracketed, as in URLs.
        let host = host.trim().trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(SinkError::InvalidUrl {
                url: host.to_string(),
                reason: "syslog host is empty".into(),
            });
        }
        Ok(Self {
            host: host.to_string(),
            port,
            hostname: hostname.to_string(),
            protocol,
            stream: Mutex::new(None),
            stale: AtomicBool::new(false),
        })
    }

    async fn resolve(&self) -> Result<SocketAddr, SinkError> {
        lookup_host((self.host.as_str(), self.port))
            .await?
            .next()
            .ok_or_else(|| SinkError::Other(format!("syslog host '{}' did not resolve", self.host)))
    }

    async fn send_udp(&self, line: &str) -> Result<(), SinkError> {
        let target = self.resolve().await?;
        let local = if target.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(local).await?;
        socket.send_to(line.as_bytes(), target).await?;
        Ok(())
    }

    async fn send_tcp(&self, line: &str) -> Result<(), SinkError> {
        let mut guard = self.stream.lock().await;
        if self.stale.swap(false, Ordering::SeqCst) && guard.take().is_some() {
            tracing::debug!(host = %self.host, port = self.port, "dropping stale syslog connection");
        }
        if guard.is_none() {
            tracing::debug!(host = %self.host, port = self.port, "opening syslog connection");
            *guard = Some(TcpStream::connect((self.host.as_str(), self.port)).await?);
        }
        let Some(stream) = guard.as_mut() else {
            return Err(SinkError::Other("syslog connection unavailable".into()));
        };

        let mut framed = line.to_string();
        framed.push('\n');
        if let Err(e) = stream.write_all(framed.as_bytes()).await {
            *guard = None;
            return Err(e.into());
        }
        Ok(())
    }

    async fn send(&self, payload: Payload) -> Result<(), SinkError> {
        let line = frame(&payload, &self.hostname);
        match self.protocol {
            SyslogProtocol::Udp => self.send_udp(&line).await,
            SyslogProtocol::Tcp => self.send_tcp(&line).await,
        }
    }
}

impl Transport for SyslogTransport {
    fn log(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>> {
        self.send(payload).boxed()
    }

    fn reset(&self) {
        match self.stream.try_lock() {
            Ok(mut guard) => {
                if guard.take().is_some() {
                    tracing::debug!(host = %self.host, port = self.port, "syslog connection reset");
                }
            }
            Err(_) => {
                self.stale.store(true, Ordering::SeqCst);
                tracing::debug!(host = %self.host, port = self.port, "syslog connection busy; reset deferred");
            }
        }
    }
}
