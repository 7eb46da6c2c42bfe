//! Desk runner: periodic hierarchy refresh and live snapshot polling.
//!
//! Each tick:
//! - Rebuilds the account hierarchy from fresh accounts and relationships
//! - Replaces the active account's live snapshot
//! - Logs what the host would see for the current symbol

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::api::AccountsClient;
use crate::broker::{BrokerAdapterFacade, ChartHost};
use crate::config::DeskConfig;
use crate::hierarchy::{AccountHierarchyBuilder, CopyRelationshipIndex, HierarchyNode};
use crate::models::{Account, AccountId, RelationshipPayload};

/// Latest hierarchy computation.
#[derive(Debug, Clone, Default)]
struct HierarchyState {
    accounts: Vec<Account>,
    nodes: Vec<HierarchyNode>,
    excluded: Vec<AccountId>,
}

/// Orchestrates the accounts client, the snapshot store, and the facade.
pub struct Desk<H: ChartHost> {
    config: DeskConfig,
    client: AccountsClient,
    facade: Arc<BrokerAdapterFacade<H>>,
    state: Arc<RwLock<HierarchyState>>,
    shutdown: Arc<AtomicBool>,
}

impl<H: ChartHost> Desk<H> {
    pub fn new(config: DeskConfig, facade: BrokerAdapterFacade<H>) -> Result<Self> {
        config.validate()?;
        let client = AccountsClient::new(&config)?;

        Ok(Self {
            config,
            client,
            facade: Arc::new(facade),
            state: Arc::new(RwLock::new(HierarchyState::default())),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn facade(&self) -> &BrokerAdapterFacade<H> {
        &self.facade
    }

    /// Fetch accounts and relationships and rebuild the hierarchy.
    ///
    /// A failed relationship fetch is treated as no payload, which leaves
    /// every account standalone.
    pub async fn refresh_hierarchy(&self) -> Result<Vec<HierarchyNode>> {
        let accounts = self.client.get_accounts().await?;

        let payload = match self.client.get_relationships().await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(error = %e, "Relationship fetch failed; treating all accounts as standalone");
                None
            }
        };

        Ok(self.apply_refresh(accounts, payload.as_ref()).await)
    }

    /// Rebuild the hierarchy from already fetched inputs.
    pub async fn apply_refresh(
        &self,
        accounts: Vec<Account>,
        payload: Option<&RelationshipPayload>,
    ) -> Vec<HierarchyNode> {
        let index = CopyRelationshipIndex::from_payload(payload);
        let builder = AccountHierarchyBuilder::new(&accounts, &index);
        let nodes = builder.build();
        let excluded = builder.excluded_accounts(&nodes);

        if !excluded.is_empty() {
            warn!(excluded = ?excluded, "Copier accounts whose master is not visible");
        }

        if index.is_empty() {
            debug!("No copy relationships; every account is standalone");
        }

        info!(
            accounts = accounts.len(),
            masters = index.len(),
            links = index.link_count(),
            nodes = nodes.len(),
            "Account hierarchy refreshed"
        );

        let mut state = self.state.write().await;
        *state = HierarchyState {
            accounts,
            nodes: nodes.clone(),
            excluded,
        };

        nodes
    }

    pub async fn hierarchy(&self) -> Vec<HierarchyNode> {
        self.state.read().await.nodes.clone()
    }

    /// Make a known account the facade's active account.
    pub async fn select_account(&self, account_id: AccountId) -> Result<()> {
        let account = self
            .state
            .read()
            .await
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Account {} not found", account_id))?;

        info!(account = account_id, name = %account.display_name(), "Selecting account");
        self.facade.switch_account(account).await;
        Ok(())
    }

    /// Replace the active account's snapshot with a fresh one.
    /// Returns the new snapshot version, or `None` with no active account.
    pub async fn poll_snapshot(&self) -> Result<Option<u64>> {
        let Some(account) = self.facade.active_account().await else {
            return Ok(None);
        };

        let snapshot = self.client.get_live_snapshot(account.id).await?;
        let version = self.facade.store().update_positions(account.id, snapshot).await;
        Ok(Some(version))
    }

    /// Main run loop.
    pub async fn run(&self) -> Result<()> {
        info!(
            api_url = %self.config.api_url,
            interval = self.config.refresh_interval_secs,
            "Starting desk loop"
        );

        let mut ticker = interval(Duration::from_secs(self.config.refresh_interval_secs));

        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
            shutdown.store(true, Ordering::SeqCst);
        });

        while !self.shutdown.load(Ordering::SeqCst) {
            ticker.tick().await;

            if let Err(e) = self.tick().await {
                error!(error = %e, "Error in desk tick");
            }
        }

        info!("Desk loop stopped");
        Ok(())
    }

    async fn tick(&self) -> Result<()> {
        debug!("Desk tick");

        self.refresh_hierarchy().await?;

        if let Some(version) = self.poll_snapshot().await? {
            let positions = self.facade.positions().await;
            let orders = self.facade.orders().await;
            info!(
                version = version,
                positions = positions.len(),
                orders = orders.len(),
                "Live snapshot applied"
            );
        }

        Ok(())
    }

    pub async fn get_stats(&self) -> DeskStats {
        let state = self.state.read().await;
        let active = self.facade.active_account().await;

        let stored = match &active {
            Some(account) => self.facade.store().current(account.id).await,
            None => None,
        };

        DeskStats {
            accounts: state.accounts.len(),
            nodes: state.nodes.len(),
            copiers: state.nodes.iter().map(|n| n.slaves.len()).sum(),
            excluded: state.excluded.len(),
            active_account: active.map(|a| a.display_name()),
            snapshot_version: stored.as_ref().map(|s| s.version),
            snapshot_received_at: stored.as_ref().map(|s| s.received_at),
        }
    }
}

/// Desk statistics.
#[derive(Debug, Clone)]
pub struct DeskStats {
    pub accounts: usize,
    pub nodes: usize,
    pub copiers: usize,
    pub excluded: usize,
    pub active_account: Option<String>,
    pub snapshot_version: Option<u64>,
    pub snapshot_received_at: Option<DateTime<Utc>>,
}

impl fmt::Display for DeskStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Desk Statistics ===")?;
        writeln!(f, "Accounts:        {}", self.accounts)?;
        writeln!(f, "Hierarchy Nodes: {}", self.nodes)?;
        writeln!(f, "Copiers Placed:  {}", self.copiers)?;
        writeln!(f, "Excluded:        {}", self.excluded)?;
        writeln!(
            f,
            "Active Account:  {}",
            self.active_account.as_deref().unwrap_or("-")
        )?;
        match (self.snapshot_version, self.snapshot_received_at) {
            (Some(v), Some(at)) => writeln!(f, "Snapshot:        v{} at {}", v, at.format("%H:%M:%S"))?,
            (Some(v), None) => writeln!(f, "Snapshot:        v{}", v)?,
            _ => writeln!(f, "Snapshot:        none")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{FixedSymbolHost, LiveTradeStore};
    use crate::models::CopyRelationship;

    fn desk() -> Desk<FixedSymbolHost> {
        let facade = BrokerAdapterFacade::new(FixedSymbolHost::new("EURUSD"), LiveTradeStore::new());
        Desk::new(DeskConfig::default(), facade).unwrap()
    }

    fn accounts() -> Vec<Account> {
        (1..=5).map(|id| Account::new(id, format!("acct-{}", id))).collect()
    }

    #[tokio::test]
    async fn test_apply_refresh_rebuilds_from_scratch() {
        let desk = desk();
        let payload = RelationshipPayload::new(vec![
            CopyRelationship::new(1, [2, 3]),
            CopyRelationship::new(99, [5]),
        ]);

        let nodes = desk.apply_refresh(accounts(), Some(&payload)).await;
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].slaves.len(), 2);

        let stats = desk.get_stats().await;
        assert_eq!(stats.accounts, 5);
        assert_eq!(stats.copiers, 2);
        assert_eq!(stats.excluded, 1);

        // Without a payload everything becomes standalone again.
        let nodes = desk.apply_refresh(accounts(), None).await;
        assert_eq!(nodes.len(), 5);
        assert!(nodes.iter().all(|n| n.slaves.is_empty()));
        assert_eq!(desk.hierarchy().await, nodes);
    }

    #[tokio::test]
    async fn test_select_account() {
        let desk = desk();
        desk.apply_refresh(accounts(), None).await;

        assert!(desk.select_account(42).await.is_err());

        desk.select_account(3).await.unwrap();
        let info = desk.facade().account_manager_info().await;
        assert_eq!(info.account_title, "acct-3");

        let stats = desk.get_stats().await;
        assert_eq!(stats.active_account.as_deref(), Some("acct-3"));
        assert!(stats.snapshot_version.is_none());
        assert!(stats.snapshot_received_at.is_none());

        desk.facade()
            .store()
            .update_positions(3, crate::models::LiveTradeSnapshot::default())
            .await;
        let stats = desk.get_stats().await;
        assert!(stats.snapshot_version.is_some());
        assert!(stats.snapshot_received_at.is_some());
        assert!(stats.to_string().contains("Snapshot:        v"));
    }

    #[tokio::test]
    async fn test_poll_without_account_is_noop() {
        let desk = desk();
        assert_eq!(desk.poll_snapshot().await.unwrap(), None);
    }
}
