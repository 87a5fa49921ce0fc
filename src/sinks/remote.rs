//! HTTP log aggregator transport.
//!
//! Posts the remote text line as `text/plain` with the token as basic-auth
//! password. The endpoint URL is validated when the transport is built.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::SinkError;
use crate::sinks::{Payload, Transport};

pub struct RemoteTransport {
    client: reqwest::Client,
    url: Url,
    token: String,
}

impl RemoteTransport {
    pub fn new(client: reqwest::Client, host: &str, token: &str) -> Result<Self, SinkError> {
        let url = Url::parse(host).map_err(|e| SinkError::InvalidUrl {
            url: host.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            url,
            token: token.to_string(),
        })
    }

    async fn post(&self, payload: Payload) -> Result<(), SinkError> {
        let response = self
            .client
            .post(self.url.clone())
            .basic_auth("", Some(&self.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(payload.as_text())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl Transport for RemoteTransport {
    fn log(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>> {
        self.post(payload).boxed()
    }
}
