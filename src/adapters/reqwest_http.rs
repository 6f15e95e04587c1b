//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of [`HttpClient`] on top of `reqwest`.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use parley::adapters::ReqwestHttpClient;
/// use parley::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::with_connect_timeout(Duration::from_secs(5))?;
/// let response = client.get("http://localhost:8080/metrics", &Headers::new()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with reqwest's default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client whose connection attempts give up after `timeout`.
    ///
    /// Only the connect phase is bounded; a generation stream may stay open
    /// for as long as the server keeps producing tokens.
    pub fn with_connect_timeout(timeout: Duration) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map(|client| Self { client })
            .map_err(|e| HttpError::Other(e.to_string()))
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(self.client.request(method, url), |builder, (name, value)| {
                builder.header(name, value)
            })
    }
}

/// Failure before or while receiving the response head.
fn request_error(err: reqwest::Error) -> HttpError {
    let message = err.to_string();
    if err.is_timeout() {
        HttpError::Timeout(message)
    } else if err.is_connect() {
        HttpError::ConnectionFailed(message)
    } else if err.is_builder() {
        HttpError::InvalidUrl(message)
    } else {
        HttpError::Other(message)
    }
}

/// Failure while reading body chunks.
fn body_error(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(err.to_string())
    } else {
        HttpError::Io(err.to_string())
    }
}

/// Header names are lowercased by reqwest; non-UTF-8 values are skipped.
fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
    map.iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let response = self
            .request(reqwest::Method::GET, url, headers)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status().as_u16();
        let response_headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(body_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let response = self
            .request(reqwest::Method::POST, url, headers)
            .body(body.to_owned())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Box::pin(
            response.bytes_stream().map(|chunk| chunk.map_err(body_error)),
        ))
    }
}
