//! Broker contract consumed by the charting host.
//!
//! Every operation resolves; a missing symbol, account, or snapshot yields an
//! empty result rather than an error.

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Account, AccountId};

use super::store::LiveTradeStore;
use super::types::{AccountManagerInfo, BrokerOrder, BrokerPosition, ContextMenuAction};
use super::views::SymbolScopedView;

/// Pull interface to the host for the symbol currently shown on the chart.
pub trait ChartHost: Send + Sync {
    fn current_symbol(&self) -> Option<String>;
}

/// Host stand-in that always reports the same symbol.
#[derive(Debug, Clone, Default)]
pub struct FixedSymbolHost {
    symbol: Option<String>,
}

impl FixedSymbolHost {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
        }
    }

    pub fn none() -> Self {
        Self { symbol: None }
    }
}

impl ChartHost for FixedSymbolHost {
    fn current_symbol(&self) -> Option<String> {
        self.symbol.clone()
    }
}

/// Broker adapter bound to a host and a live snapshot store.
pub struct BrokerAdapterFacade<H: ChartHost> {
    host: H,
    store: LiveTradeStore,
    account: RwLock<Option<Account>>,
}

impl<H: ChartHost> BrokerAdapterFacade<H> {
    pub fn new(host: H, store: LiveTradeStore) -> Self {
        Self {
            host,
            store,
            account: RwLock::new(None),
        }
    }

    /// Make an account active. Its stored snapshot is cleared first so no
    /// data from an earlier session is shown before the next push.
    pub async fn switch_account(&self, account: Account) {
        self.store.clear(account.id).await;
        debug!(account = account.id, "Switched active account");
        *self.account.write().await = Some(account);
    }

    pub async fn active_account(&self) -> Option<Account> {
        self.account.read().await.clone()
    }

    pub fn store(&self) -> &LiveTradeStore {
        &self.store
    }

    /// Positions on the host's current symbol.
    pub async fn positions(&self) -> Vec<BrokerPosition> {
        let Some(symbol) = self.host.current_symbol() else {
            debug!("No current symbol; reporting no positions");
            return Vec::new();
        };

        let Some(account_id) = self.active_account_id().await else {
            return Vec::new();
        };

        let positions = match self.store.current(account_id).await {
            Some(stored) => SymbolScopedView::new(&stored.snapshot, &symbol).positions(),
            None => Vec::new(),
        };

        debug!(symbol = %symbol, count = positions.len(), "Positions requested");
        positions
    }

    /// Pending orders on the host's current symbol.
    pub async fn orders(&self) -> Vec<BrokerOrder> {
        let Some(symbol) = self.host.current_symbol() else {
            debug!("No current symbol; reporting no orders");
            return Vec::new();
        };

        let Some(account_id) = self.active_account_id().await else {
            return Vec::new();
        };

        let orders = match self.store.current(account_id).await {
            Some(stored) => SymbolScopedView::new(&stored.snapshot, &symbol).orders(),
            None => Vec::new(),
        };

        debug!(symbol = %symbol, count = orders.len(), "Orders requested");
        orders
    }

    /// Trading hours are not modeled.
    pub async fn is_tradable(&self) -> bool {
        true
    }

    pub async fn account_manager_info(&self) -> AccountManagerInfo {
        match self.account.read().await.as_ref() {
            Some(account) => AccountManagerInfo {
                account_title: account.display_name(),
                currency: account.currency.clone(),
                balance: account.balance,
            },
            None => AccountManagerInfo {
                account_title: String::new(),
                currency: String::new(),
                balance: Decimal::ZERO,
            },
        }
    }

    pub async fn chart_context_menu_actions(&self) -> Vec<ContextMenuAction> {
        Vec::new()
    }

    async fn active_account_id(&self) -> Option<AccountId> {
        self.account.read().await.as_ref().map(|a| a.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LiveTradeSnapshot, Order, OrderKind, Trade, TradeSide};
    use rust_decimal_macros::dec;

    fn snapshot() -> LiveTradeSnapshot {
        LiveTradeSnapshot::new(
            vec![
                Trade::new(1, "EURUSD", TradeSide::Long, dec!(2), dec!(1.0850)),
                Trade::new(2, "GBPUSD", TradeSide::Short, dec!(1), dec!(1.2710)),
            ],
            vec![Order::new(3, "EURUSD", TradeSide::Long, OrderKind::Stop, dec!(1), dec!(1.2345))],
        )
    }

    async fn facade(host: FixedSymbolHost) -> BrokerAdapterFacade<FixedSymbolHost> {
        let facade = BrokerAdapterFacade::new(host, LiveTradeStore::new());
        let mut account = Account::new(7, "Primary");
        account.currency = "USD".to_string();
        account.balance = dec!(2500);
        facade.switch_account(account).await;
        facade
    }

    #[tokio::test]
    async fn test_positions_for_current_symbol() {
        let facade = facade(FixedSymbolHost::new("EURUSD")).await;
        facade.store().update_positions(7, snapshot()).await;

        let positions = facade.positions().await;
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].symbol, "EURUSD");
        assert_eq!(positions[0].qty, dec!(2));
        assert_eq!(positions[0].side, 1);

        let orders = facade.orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_type, 3);
    }

    #[tokio::test]
    async fn test_no_symbol_resolves_empty() {
        let facade = facade(FixedSymbolHost::none()).await;
        facade.store().update_positions(7, snapshot()).await;

        assert!(facade.positions().await.is_empty());
        assert!(facade.orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_snapshot_resolves_empty() {
        let facade = facade(FixedSymbolHost::new("EURUSD")).await;
        assert!(facade.positions().await.is_empty());
        assert!(facade.orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_push_clears_positions() {
        let facade = facade(FixedSymbolHost::new("EURUSD")).await;
        facade.store().update_positions(7, snapshot()).await;
        assert_eq!(facade.positions().await.len(), 1);

        facade.store().update_positions(7, LiveTradeSnapshot::default()).await;
        assert!(facade.positions().await.is_empty());
        assert!(facade.orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_switch_account_drops_stale_snapshot() {
        let facade = facade(FixedSymbolHost::new("EURUSD")).await;
        facade.store().update_positions(8, snapshot()).await;

        facade.switch_account(Account::new(8, "Second")).await;
        assert!(facade.positions().await.is_empty());

        facade.store().update_positions(8, snapshot()).await;
        assert_eq!(facade.positions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_static_operations() {
        let facade = facade(FixedSymbolHost::new("EURUSD")).await;

        assert!(facade.is_tradable().await);
        assert!(facade.chart_context_menu_actions().await.is_empty());

        let info = facade.account_manager_info().await;
        assert_eq!(info.account_title, "Primary");
        assert_eq!(info.currency, "USD");
        assert_eq!(info.balance, dec!(2500));
    }

    #[tokio::test]
    async fn test_no_active_account() {
        let facade = BrokerAdapterFacade::new(FixedSymbolHost::new("EURUSD"), LiveTradeStore::new());
        facade.store().update_positions(7, snapshot()).await;

        assert!(facade.positions().await.is_empty());
        assert_eq!(facade.account_manager_info().await.account_title, "");
    }
}
