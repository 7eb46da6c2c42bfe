//! Latest pushed trade/order snapshot per account.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{AccountId, LiveTradeSnapshot};

/// Snapshot as held by the store, stamped on arrival.
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    /// Store-wide monotonically increasing version
    pub version: u64,
    pub received_at: DateTime<Utc>,
    pub snapshot: LiveTradeSnapshot,
}

/// Single-writer cache of live snapshots.
///
/// Updates swap in a new shared snapshot; readers clone the handle, so a
/// query sees either the old snapshot or the new one in full.
///
/// The map sits behind a tokio `RwLock`, so a writer can wait for readers
/// already holding it. Readers keep the lock only for one `Arc` clone and
/// writers build the snapshot before taking it, which keeps that wait short.
#[derive(Debug, Clone, Default)]
pub struct LiveTradeStore {
    snapshots: Arc<RwLock<HashMap<AccountId, Arc<StoredSnapshot>>>>,
    version: Arc<AtomicU64>,
}

impl LiveTradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot for an account wholesale.
    /// Returns the version assigned to the new snapshot.
    pub async fn update_positions(&self, account_id: AccountId, snapshot: LiveTradeSnapshot) -> u64 {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let trades = snapshot.trades.len();
        let orders = snapshot.orders.len();
        let empty = snapshot.is_empty();

        let stored = Arc::new(StoredSnapshot {
            version,
            received_at: Utc::now(),
            snapshot,
        });

        self.snapshots.write().await.insert(account_id, stored);

        debug!(
            account = account_id,
            version = version,
            trades = trades,
            orders = orders,
            empty = empty,
            "Snapshot replaced"
        );

        version
    }

    /// Current snapshot for an account, if any was pushed.
    pub async fn current(&self, account_id: AccountId) -> Option<Arc<StoredSnapshot>> {
        self.snapshots.read().await.get(&account_id).cloned()
    }

    /// Drop the snapshot for an account.
    pub async fn clear(&self, account_id: AccountId) {
        if self.snapshots.write().await.remove(&account_id).is_some() {
            debug!(account = account_id, "Snapshot cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Trade, TradeSide};
    use rust_decimal_macros::dec;

    fn one_trade() -> LiveTradeSnapshot {
        LiveTradeSnapshot::new(
            vec![Trade::new(1, "EURUSD", TradeSide::Long, dec!(1), dec!(1.1))],
            vec![],
        )
    }

    #[test]
    fn test_update_replaces_wholesale() {
        tokio_test::block_on(async {
            let store = LiveTradeStore::new();

            let v1 = store.update_positions(7, one_trade()).await;
            let v2 = store.update_positions(7, LiveTradeSnapshot::default()).await;
            assert!(v2 > v1);

            let current = store.current(7).await.unwrap();
            assert_eq!(current.version, v2);
            assert!(current.snapshot.is_empty());
        });
    }

    #[test]
    fn test_reader_keeps_its_snapshot() {
        tokio_test::block_on(async {
            let store = LiveTradeStore::new();
            store.update_positions(7, one_trade()).await;

            let held = store.current(7).await.unwrap();
            store.update_positions(7, LiveTradeSnapshot::default()).await;

            assert_eq!(held.snapshot.trades.len(), 1);
            assert!(store.current(7).await.unwrap().snapshot.is_empty());
        });
    }

    #[test]
    fn test_accounts_are_independent() {
        tokio_test::block_on(async {
            let store = LiveTradeStore::new();
            store.update_positions(1, one_trade()).await;

            assert!(store.current(2).await.is_none());

            store.clear(1).await;
            assert!(store.current(1).await.is_none());
        });
    }
}
