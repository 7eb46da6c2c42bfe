//! Desk configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Configuration for the accounts collaborator and the refresh loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Base URL of the accounts API
    pub api_url: String,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Interval between hierarchy refreshes and snapshot polls (seconds)
    pub refresh_interval_secs: u64,

    /// Symbol reported as the chart's current instrument
    pub default_symbol: Option<String>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            refresh_interval_secs: 5,
            default_symbol: None,
        }
    }
}

impl DeskConfig {
    /// Defaults overridden by environment variables:
    /// - COPYDESK_API_URL
    /// - COPYDESK_TIMEOUT_SECS
    /// - COPYDESK_REFRESH_SECS
    /// - COPYDESK_SYMBOL
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("COPYDESK_API_URL") {
            config.api_url = url;
        }
        if let Ok(timeout) = std::env::var("COPYDESK_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout
                .parse()
                .context("Invalid COPYDESK_TIMEOUT_SECS")?;
        }
        if let Ok(refresh) = std::env::var("COPYDESK_REFRESH_SECS") {
            config.refresh_interval_secs = refresh
                .parse()
                .context("Invalid COPYDESK_REFRESH_SECS")?;
        }
        if let Ok(symbol) = std::env::var("COPYDESK_SYMBOL") {
            if !symbol.trim().is_empty() {
                config.default_symbol = Some(symbol);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            anyhow::bail!("API URL must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be at least one second");
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("Refresh interval must be at least one second");
        }
        Ok(())
    }
}
