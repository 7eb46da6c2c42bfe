//! Client for the accounts API: account lists, copy relationships, and live
//! trade/order snapshots.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::DeskConfig;
use crate::models::{Account, AccountId, LiveTradeSnapshot, RelationshipPayload};

use super::types::AccountsResponse;

/// Read-only client for the accounts collaborator.
pub struct AccountsClient {
    client: Client,
    base_url: String,
}

impl AccountsClient {
    /// Create a client from desk configuration.
    pub fn new(config: &DeskConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all accounts visible to the user.
    pub async fn get_accounts(&self) -> Result<Vec<Account>> {
        let response: AccountsResponse = self.get_json("/accounts", "accounts").await?;
        Ok(response.into_accounts())
    }

    /// Fetch the copy relationship payload.
    pub async fn get_relationships(&self) -> Result<RelationshipPayload> {
        self.get_json("/copier_accounts", "relationships").await
    }

    /// Fetch the current open trades and orders of one account.
    pub async fn get_live_snapshot(&self, account_id: AccountId) -> Result<LiveTradeSnapshot> {
        let path = format!("/accounts/{}/live", account_id);
        self.get_json(&path, "live snapshot").await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!(url = %url, "Fetching {}", what);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} request failed: {} - {}", what, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }
}
