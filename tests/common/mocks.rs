//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from `parley::adapters::mock`
//! and provides builder-style setups for scripted server responses.

pub use parley::adapters::mock::http::MockResponse;
pub use parley::adapters::mock::MockHttpClient;
pub use parley::traits::{Headers, HttpClient, HttpError, Response};

use bytes::Bytes;

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    /// Creates a new mock HTTP configuration.
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a successful JSON response.
    #[allow(dead_code)]
    pub fn with_json_response(self, url: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Configures a stream that yields `chunks` for every unmatched URL.
    pub fn with_stream(self, chunks: &[&str]) -> Self {
        self.client
            .set_default_response(MockResponse::Stream(to_bytes(chunks)));
        self
    }

    /// Configures a stream that yields `chunks` and then never ends.
    #[allow(dead_code)]
    pub fn with_open_stream(self, chunks: &[&str]) -> Self {
        self.client
            .set_default_response(MockResponse::StreamThenPending(to_bytes(chunks)));
        self
    }

    /// Configures a stream that yields `chunks` and then fails.
    #[allow(dead_code)]
    pub fn with_broken_stream(self, chunks: &[&str], error: HttpError) -> Self {
        self.client
            .set_default_response(MockResponse::StreamThenError(to_bytes(chunks), error));
        self
    }

    /// Configures a non-success status for every unmatched URL.
    #[allow(dead_code)]
    pub fn with_status_error(self, status: u16) -> Self {
        self.client
            .set_default_response(MockResponse::Error(HttpError::ServerError {
                status,
                message: String::new(),
            }));
        self
    }

    /// Builds the configured MockHttpClient.
    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn to_bytes(chunks: &[&str]) -> Vec<Bytes> {
    chunks.iter().map(|c| Bytes::from(c.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn test_mock_http_config() {
        let client = MockHttpConfig::new()
            .with_json_response("http://localhost:8080/metrics", 200, r#"{"status": "success"}"#)
            .build();

        assert!(client.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_mock_stream_config() {
        let client = MockHttpConfig::new().with_stream(&["data: a\n"]).build();

        let mut stream = client
            .post_stream("http://anything/", "{}", &Headers::new())
            .await
            .unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from("data: a\n"));
        assert!(stream.next().await.is_none());
    }
}
