//! Trading account as supplied by the accounts collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier. Identity of an account is its id alone.
pub type AccountId = i64;

/// Trading account with display attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account id
    pub id: AccountId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Current balance in account currency
    #[serde(default)]
    pub balance: Decimal,

    /// ISO currency code (e.g., "USD")
    #[serde(default)]
    pub currency: String,
}

impl Account {
    /// Create an account with only an id and a name.
    pub fn new(id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: Decimal::ZERO,
            currency: String::new(),
        }
    }

    /// Get display name (name, or `#id` when unnamed).
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("#{}", self.id)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(Account::new(7, "Main").display_name(), "Main");
        assert_eq!(Account::new(7, "  ").display_name(), "#7");
    }

    #[test]
    fn test_deserialize_minimal() {
        let account: Account = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(account.id, 3);
        assert_eq!(account.balance, Decimal::ZERO);

        let account: Account =
            serde_json::from_str(r#"{"id": 4, "name": "Swing", "balance": "1500.25", "currency": "EUR"}"#)
                .unwrap();
        assert_eq!(account.balance, dec!(1500.25));
        assert_eq!(account.currency, "EUR");
    }
}
