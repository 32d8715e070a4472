//! HTTP transport to the Responses endpoint.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::envelope::ResponsesRequest;
use crate::error::LlmError;
use crate::transport::Transport;

/// Posts request envelopes with a bearer token.
///
/// The body is returned as text for every HTTP status; error payloads are
/// recognised later by [`crate::response::extract_output_text`].
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    api_key: String,
    request_timeout_ms: u64,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a client with the configured connect and request timeouts.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if the key is blank or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::ConfigError("API key is empty".into()));
        }

        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LlmError::ConfigError(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
            request_timeout_ms: u64::try_from(config.request_timeout().as_millis())
                .unwrap_or(u64::MAX),
        })
    }

    /// Target endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ResponsesRequest) -> Result<String, LlmError> {
        let start = Instant::now();
        let result = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!("LLM request timed out after {}ms", self.request_timeout_ms);
                return Err(LlmError::Timeout(self.request_timeout_ms));
            }
            Err(e) => {
                warn!("LLM request failed: {e}");
                return Err(e.into());
            }
        };

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.request_timeout_ms)
            } else {
                LlmError::from(e)
            }
        })?;

        let latency_ms = start.elapsed().as_millis();
        if status.is_success() {
            debug!(%status, latency_ms, bytes = body.len(), model = %request.model, "LLM call completed");
        } else {
            warn!(%status, latency_ms, "LLM endpoint returned non-success status");
        }
        Ok(body)
    }
}
