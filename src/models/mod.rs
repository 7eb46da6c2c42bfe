//! Data models for accounts, copy relationships, trades, and orders.

mod account;
mod order;
mod relationship;
mod snapshot;
mod trade;

pub use account::{Account, AccountId};
pub use order::{Order, OrderKind};
pub use relationship::{CopyRelationship, RelationshipPayload};
pub use snapshot::LiveTradeSnapshot;
pub use trade::{Trade, TradeSide};
