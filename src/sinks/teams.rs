//! Teams webhook transport.
//!
//! Classic Office connectors (`*.webhook.office.com`) take the legacy message
//! card; workflow endpoints take the adaptive card. The URL is parsed on every
//! send, so a malformed URL surfaces at send time.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use url::Url;

use crate::error::SinkError;
use crate::sinks::{Payload, PayloadBody, Transport};

const OFFICE_WEBHOOK_HOST: &str = "webhook.office.com";

/// Which card a webhook expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFormat {
    MessageCard,
    AdaptiveCard,
}

pub fn card_format(url: &Url) -> CardFormat {
    match url.host_str() {
        Some(host) if host.contains(OFFICE_WEBHOOK_HOST) => CardFormat::MessageCard,
        _ => CardFormat::AdaptiveCard,
    }
}

pub struct TeamsTransport {
    client: reqwest::Client,
    url: String,
}

impl TeamsTransport {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    async fn post(&self, payload: Payload) -> Result<(), SinkError> {
        let url = Url::parse(&self.url).map_err(|e| SinkError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let body = match &payload.body {
            PayloadBody::Cards(cards) => match card_format(&url) {
                CardFormat::MessageCard => &cards.message_card,
                CardFormat::AdaptiveCard => &cards.adaptive_card,
            },
            PayloadBody::Text(_) => {
                return Err(SinkError::Other("teams webhook expects a card payload".into()))
            }
        };

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl Transport for TeamsTransport {
    fn log(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>> {
        self.post(payload).boxed()
    }
}
