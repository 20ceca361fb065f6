//! Centralized configuration management for arbres

use anyhow::{Context, Result};
use std::time::Duration;

/// Default opendatasoft search endpoint for the catalog.
pub const DEFAULT_API_URL: &str = "https://opendata.paris.fr/api/records/1.0/search/";
/// Dataset identifier on the open-data portal.
pub const DEFAULT_DATASET: &str = "arbresremarquablesparis";
/// Records fetched per page.
pub const DEFAULT_ROWS_PER_PAGE: usize = 9;
/// Terminal width (columns) at or below which cards collapse and
/// become toggleable.
pub const DEFAULT_NARROW_COLS: u16 = 80;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog search endpoint
    pub api_url: String,
    /// Dataset identifier passed on every request
    pub dataset: String,
    /// Page size for catalog requests
    pub rows_per_page: usize,
    /// Terminal width threshold for collapsed cards
    pub narrow_cols: u16,
    /// Path of the log file written in TUI mode
    pub log_file: String,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "arbres/0.1.0".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let api_url =
            std::env::var("ARBRES_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let dataset =
            std::env::var("ARBRES_DATASET").unwrap_or_else(|_| DEFAULT_DATASET.to_string());

        let rows_per_page =
            parse_env_var("ARBRES_ROWS_PER_PAGE")?.unwrap_or(DEFAULT_ROWS_PER_PAGE);
        let narrow_cols = parse_env_var("ARBRES_NARROW_COLS")?.unwrap_or(DEFAULT_NARROW_COLS);

        let log_file =
            std::env::var("ARBRES_LOG_FILE").unwrap_or_else(|_| "arbres.log".to_string());

        let http = HttpConfig {
            timeout_seconds: parse_env_var("ARBRES_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("ARBRES_USER_AGENT")
                .unwrap_or_else(|_| "arbres/0.1.0".to_string()),
        };

        Ok(Config {
            api_url,
            dataset,
            rows_per_page,
            narrow_cols,
            log_file,
            http,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration. A bad endpoint URL or zero page size is a
    /// fatal configuration error; nothing downstream can recover from it.
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("Invalid catalog endpoint URL: {}", self.api_url))?;

        if self.rows_per_page == 0 {
            return Err(anyhow::anyhow!("ARBRES_ROWS_PER_PAGE must be at least 1"));
        }

        if self.dataset.trim().is_empty() {
            return Err(anyhow::anyhow!("ARBRES_DATASET must not be empty"));
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
