//! Delivery of tracking data to the analytics collector.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sweet_home_core::{InteractionRecord, SessionRecord};
use thiserror::Error;
use url::Url;

use crate::config::TrackerConfig;

/// Errors that can occur when delivering tracking data.
#[derive(Debug, Error)]
pub enum SinkError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Collector rejected the payload.
    #[error("Collector returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Collector URL could not be built.
    #[error("Invalid collector URL: {0}")]
    Url(#[from] url::ParseError),

    /// Bearer token is not a valid header value.
    #[error("Invalid bearer token")]
    InvalidToken,
}

/// Destination for captured tracking data.
///
/// Delivery is best effort. The tracker logs errors and never retries.
#[async_trait]
pub trait InteractionSink: Send + Sync {
    /// Forward a single interaction at capture time.
    async fn send_interaction(&self, record: &InteractionRecord) -> Result<(), SinkError>;

    /// Forward the session aggregate flushed on page hide.
    async fn send_session(&self, record: &SessionRecord) -> Result<(), SinkError>;
}

/// Posts tracking data as JSON to the analytics collector.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    interaction_url: Url,
    session_url: Url,
}

impl HttpSink {
    /// Create a sink for the configured collector.
    ///
    /// No request timeout is set; a send lasts as long as the network lets it.
    ///
    /// # Errors
    ///
    /// Returns error if the collector URLs cannot be built, the token is not
    /// a valid header value, or the HTTP client fails to build.
    pub fn new(config: &TrackerConfig, token: Option<&SecretString>) -> Result<Self, SinkError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| SinkError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            interaction_url: config.interaction_url()?,
            session_url: config.session_url()?,
        })
    }

    async fn post<B: Serialize + Sync>(&self, url: &Url, body: &B) -> Result<(), SinkError> {
        let response = self.client.post(url.clone()).json(body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(SinkError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl InteractionSink for HttpSink {
    async fn send_interaction(&self, record: &InteractionRecord) -> Result<(), SinkError> {
        self.post(&self.interaction_url, record).await
    }

    async fn send_session(&self, record: &SessionRecord) -> Result<(), SinkError> {
        self.post(&self.session_url, record).await
    }
}
