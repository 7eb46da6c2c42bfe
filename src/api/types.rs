//! Response shapes of the accounts API.

use serde::Deserialize;

use crate::models::Account;

/// `/accounts` returns either a bare array or an object wrapping one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountsResponse {
    List(Vec<Account>),
    Wrapped {
        #[serde(default)]
        accounts: Vec<Account>,
    },
}

impl AccountsResponse {
    pub fn into_accounts(self) -> Vec<Account> {
        match self {
            AccountsResponse::List(accounts) => accounts,
            AccountsResponse::Wrapped { accounts } => accounts,
        }
    }
}
