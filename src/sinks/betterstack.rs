//! Betterstack HTTP ingestion transport.
//!
//! # Responsibilities
//! - Check the ingestion URL at send time (HTTPS, `betterstackdata.com` host)
//! - Map severities onto the levels the service knows
//! - Post `{dt, level, message}` with a bearer token

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use url::Url;

use crate::error::SinkError;
use crate::severity::Severity;
use crate::sinks::{Payload, Transport};

const INGEST_DOMAIN: &str = "betterstackdata.com";

#[derive(Debug, Serialize)]
struct Entry<'a> {
    dt: String,
    level: &'static str,
    message: &'a str,
}

pub struct BetterstackTransport {
    client: reqwest::Client,
    url: String,
    token: String,
}

/// The service has no `verbose` or `silly`; both become `debug`.
pub fn service_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warn => "warn",
        Severity::Info => "info",
        Severity::Verbose | Severity::Debug | Severity::Silly => "debug",
    }
}

pub fn validate_url(raw: &str) -> Result<Url, SinkError> {
    let invalid = |reason: &str| SinkError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "https" {
        return Err(invalid("must use HTTPS"));
    }
    match url.host_str() {
        Some(host) if host.ends_with(INGEST_DOMAIN) => Ok(url),
        _ => Err(invalid("host must end with betterstackdata.com")),
    }
}

impl BetterstackTransport {
    pub fn new(client: reqwest::Client, url: String, token: String) -> Self {
        Self { client, url, token }
    }

    async fn post(&self, payload: Payload) -> Result<(), SinkError> {
        let url = validate_url(&self.url)?;
        let message = payload.as_text();
        let entry = Entry {
            dt: payload.resolved_at.to_rfc3339(),
            level: service_level(payload.severity),
            message: &message,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&entry)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl Transport for BetterstackTransport {
    fn log(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>> {
        self.post(payload).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_rules() {
        assert!(validate_url("https://in.logs.betterstackdata.com").is_ok());
        assert!(matches!(
            validate_url("http://in.logs.betterstackdata.com"),
            Err(SinkError::InvalidUrl { .. })
        ));
        assert!(validate_url("https://example.com").is_err());
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(service_level(Severity::Error), "error");
        assert_eq!(service_level(Severity::Verbose), "debug");
        assert_eq!(service_level(Severity::Silly), "debug");
    }
}
