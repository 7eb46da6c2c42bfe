//! Accounts API client used to refresh accounts, relationships, and live
//! snapshots.

mod accounts_client;
mod types;

pub use accounts_client::AccountsClient;
pub use types::AccountsResponse;
