//! Client configuration.
//!
//! Defaults target a generation server on `localhost:8080` that accepts
//! generation requests on `/` and serves metrics on `/metrics`.

use std::time::Duration;

/// Default server base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default path for generation requests.
pub const DEFAULT_API_PATH: &str = "/";

/// Default path for the metrics endpoint.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`GenerationClient`](crate::client::GenerationClient).
///
/// # Example
///
/// ```
/// use parley::config::ClientConfig;
///
/// let config = ClientConfig::default().with_base_url("http://10.0.0.2:8080/");
/// assert_eq!(config.api_url(), "http://10.0.0.2:8080/");
/// assert_eq!(config.metrics_url(), "http://10.0.0.2:8080/metrics");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port of the server
    pub base_url: String,
    /// Path that accepts generation requests
    pub api_path: String,
    /// Path that serves metrics
    pub metrics_path: String,
    /// How long to wait for a connection before failing
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the generation path.
    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    /// Set the metrics path.
    pub fn with_metrics_path(mut self, path: impl Into<String>) -> Self {
        self.metrics_path = path.into();
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build config from the process environment.
    ///
    /// Reads `PARLEY_URL`, `PARLEY_API_PATH`, `PARLEY_METRICS_PATH` and
    /// `PARLEY_TIMEOUT_SECS`; unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PARLEY_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        if let Some(path) = lookup("PARLEY_API_PATH") {
            config = config.with_api_path(path);
        }
        if let Some(path) = lookup("PARLEY_METRICS_PATH") {
            config = config.with_metrics_path(path);
        }
        if let Some(secs) = lookup("PARLEY_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => config = config.with_connect_timeout(Duration::from_secs(secs)),
                Err(_) => tracing::warn!("Ignoring invalid PARLEY_TIMEOUT_SECS: {}", secs),
            }
        }

        config
    }

    /// Full URL for generation requests.
    pub fn api_url(&self) -> String {
        join_url(&self.base_url, &self.api_path)
    }

    /// Full URL for the metrics endpoint.
    pub fn metrics_url(&self) -> String {
        join_url(&self.base_url, &self.metrics_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
