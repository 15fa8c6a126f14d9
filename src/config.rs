//! Centralized configuration management for field-builder

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "http://www.mocky.io/v2/566061f21200008e3aabd919";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL the field definition is posted to
    pub endpoint: String,
    /// Log file used while the terminal UI owns the screen
    pub log_file: PathBuf,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds; `None` leaves the transport default
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: "field-builder/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_file: PathBuf::from("field_builder.log"),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("FIELD_BUILDER_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let log_file = std::env::var("FIELD_BUILDER_LOG_FILE")
            .unwrap_or_else(|_| "field_builder.log".to_string())
            .into();

        let http = HttpConfig {
            timeout_seconds: parse_env_var("FIELD_BUILDER_HTTP_TIMEOUT_SECONDS")?,
            user_agent: std::env::var("FIELD_BUILDER_USER_AGENT")
                .unwrap_or_else(|_| "field-builder/0.1.0".to_string()),
        };

        Ok(Config {
            endpoint,
            log_file,
            http,
        })
    }

    /// Replace the endpoint, e.g. from a command line flag
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    /// Get HTTP timeout as Duration, if one is configured
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid submission endpoint: {}", self.endpoint))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!(
                "Submission endpoint must use http or https: {}",
                self.endpoint
            ));
        }

        if self.http.timeout_seconds == Some(0) {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
