//! Generation server client.
//!
//! Wraps an [`HttpClient`] with the server's request conventions: the JSON
//! body and headers of a streaming generation request, and the envelope of
//! the metrics endpoint.

use std::sync::Arc;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::models::{GenerateRequest, MetricsEnvelope, ServerMetrics};
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// Client for the generation server.
#[derive(Clone)]
pub struct GenerationClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    /// Create a client backed by reqwest.
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::with_connect_timeout(config.connect_timeout)?;
        Ok(Self::with_http(config, Arc::new(http)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_http(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Headers sent with every generation request.
    pub fn stream_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers
    }

    /// Send `prompt` and return the raw response body as a chunk stream.
    ///
    /// A non-success status is returned as [`GenerationError::Transport`]
    /// before any chunk is read.
    pub async fn open_stream(&self, prompt: &str) -> GenerationResult<ByteStream> {
        let url = self.config.api_url();
        let body = serde_json::to_string(&GenerateRequest::streaming(prompt))
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        tracing::debug!("POST {} ({} bytes)", url, body.len());

        self.http
            .post_stream(&url, &body, &Self::stream_headers())
            .await
            .map_err(GenerationError::from_request)
    }

    /// Fetch the server's performance counters.
    pub async fn fetch_metrics(&self) -> GenerationResult<ServerMetrics> {
        let url = self.config.metrics_url();
        let response = self
            .http
            .get(&url, &Headers::new())
            .await
            .map_err(GenerationError::Connection)?;

        // Error envelopes arrive with a 500 status; prefer their message.
        let envelope: Option<MetricsEnvelope> = response.json().ok();

        match envelope {
            Some(envelope) if envelope.is_success() => envelope.data.ok_or_else(|| {
                GenerationError::InvalidResponse("metrics response has no data".to_string())
            }),
            Some(envelope) => Err(GenerationError::Server(
                envelope
                    .message
                    .unwrap_or_else(|| format!("status {}", response.status)),
            )),
            None if !response.is_success() => Err(GenerationError::Transport {
                status: response.status,
                message: response.text().unwrap_or_default(),
            }),
            None => Err(GenerationError::InvalidResponse(
                "metrics response is not a JSON envelope".to_string(),
            )),
        }
    }
}
