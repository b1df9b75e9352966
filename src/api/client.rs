//! Remote endpoint client
//!
//! HTTP client for the message-answering service. A request carries a message
//! (and, for uploads, a filename); the response may carry a reply message.

use crate::config::Config;
use crate::error::ChatError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Request body sent to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    /// Message text, or the encoded file payload for uploads
    pub message: String,
    /// Name of the uploaded file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl OutgoingMessage {
    /// A plain text message
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filename: None,
        }
    }

    /// A file upload: encoded payload plus the original file name
    pub fn file(payload: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            message: payload.into(),
            filename: Some(filename.into()),
        }
    }
}

/// Parsed endpoint response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Reply text, when the response carried a `message` field
    pub message: Option<String>,
}

impl Reply {
    /// Parse a response body.
    ///
    /// Any JSON shape is accepted. Only a `message` field on an object yields
    /// reply text; `null` gives an empty reply and other non-string values are
    /// rendered as JSON. An empty body is treated as a response without a reply.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(body)?;
        let message = value.get("message").map(|m| match m {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        });
        Ok(Self { message })
    }
}

/// Something that answers chat messages
#[async_trait]
pub trait RemoteEndpoint: Send + Sync {
    /// Deliver one request and wait for its reply
    async fn send(&self, request: &OutgoingMessage) -> Result<Reply, ChatError>;
}

/// Endpoint reached over HTTP with a JSON `POST`
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// Create an endpoint for `url` using a shared client (connection pooling)
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Build the endpoint from configuration, applying the optional timeout
    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.endpoint.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::new(builder.build()?, config.message_url()))
    }

    /// Target URL of every request
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteEndpoint for HttpEndpoint {
    async fn send(&self, request: &OutgoingMessage) -> Result<Reply, ChatError> {
        tracing::debug!(
            url = %self.url,
            payload_len = request.message.len(),
            filename = ?request.filename,
            "Posting message"
        );

        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status.as_u16(),
                error_body = %body,
                "Endpoint returned error status"
            );

            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let reply = Reply::from_body(&body)?;

        tracing::debug!(has_reply = reply.message.is_some(), "Received response");
        Ok(reply)
    }
}
