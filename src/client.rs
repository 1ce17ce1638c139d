//! Message sources the view can fetch from.
//!
//! [`MessageSource`] is the seam between the view lifecycle and the network.
//! [`HttpMessageSource`] is the production implementation: one `GET` against
//! the configured endpoint, no query parameters, no body.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::EndpointConfig;
use crate::error::{FetchError, Result};
use crate::message::Message;

/// Anything that can produce the current list of messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch the full list of messages, in the order the source holds them.
    async fn fetch_messages(&self) -> Result<Vec<Message>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Reads messages from an HTTP endpoint returning a JSON array.
#[derive(Debug, Clone)]
pub struct HttpMessageSource {
    endpoint: Url,
    http: reqwest::Client,
    require_success_status: bool,
}

impl HttpMessageSource {
    /// Build a source from endpoint settings.
    pub fn new(settings: &EndpointConfig) -> Result<Self> {
        let endpoint = Url::parse(&settings.url)?;
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            endpoint,
            http,
            require_success_status: settings.require_success_status,
        })
    }

    /// The endpoint this source reads from.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MessageSource for HttpMessageSource {
    async fn fetch_messages(&self) -> Result<Vec<Message>> {
        info!(
            name: "messages.fetch.started",
            endpoint = %self.endpoint,
            "Fetching messages"
        );

        let response = self.http.get(self.endpoint.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            if self.require_success_status {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            warn!(
                status = status.as_u16(),
                endpoint = %self.endpoint,
                "Endpoint returned non-success status, parsing body anyway"
            );
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Received message payload");

        let messages: Vec<Message> = serde_json::from_slice(&body)?;

        info!(
            name: "messages.fetch.completed",
            endpoint = %self.endpoint,
            count = messages.len(),
            "Messages fetched"
        );
        Ok(messages)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}
