//! Copy-trading relationship payload: masters and the accounts copying them.
//!
//! The collaborator payload is loosely shaped, so nested arrays that are
//! missing or malformed deserialize as empty instead of failing the whole
//! payload. Individual records that cannot be read are skipped.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::account::AccountId;

/// Link from a master to one copy account, with per-link settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopierLink {
    /// Account receiving the mirrored trades
    pub copy_account: AccountId,

    /// Whether copying is currently switched on for this link
    #[serde(default)]
    pub enabled: bool,

    /// Volume multiplier applied to mirrored trades
    #[serde(default)]
    pub multiplier: Option<Decimal>,
}

impl CopierLink {
    #[cfg(test)]
    pub fn new(copy_account: AccountId) -> Self {
        Self {
            copy_account,
            enabled: true,
            multiplier: None,
        }
    }
}

/// A master account and its ordered copier links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyRelationship {
    pub master_account: AccountId,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub copier_accounts: Vec<CopierLink>,
}

impl CopyRelationship {
    #[cfg(test)]
    pub fn new(master_account: AccountId, copiers: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            master_account,
            copier_accounts: copiers.into_iter().map(CopierLink::new).collect(),
        }
    }

    /// Copy-account ids in link order.
    pub fn copy_account_ids(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.copier_accounts.iter().map(|link| link.copy_account)
    }
}

/// Top-level relationship payload from the accounts collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipPayload {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub copier_accounts: Vec<CopyRelationship>,
}

#[cfg(test)]
impl RelationshipPayload {
    pub fn new(relationships: Vec<CopyRelationship>) -> Self {
        Self {
            copier_accounts: relationships,
        }
    }
}

/// Read a JSON array element by element, skipping unreadable entries.
/// Anything that is not an array reads as empty.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        let json = r#"{
            "copier_accounts": [
                {
                    "master_account": 1,
                    "copier_accounts": [
                        {"copy_account": 2, "enabled": true, "multiplier": 1.5},
                        {"copy_account": 3, "enabled": false}
                    ]
                }
            ]
        }"#;

        let payload: RelationshipPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.copier_accounts.len(), 1);

        let rel = &payload.copier_accounts[0];
        assert_eq!(rel.master_account, 1);
        assert_eq!(rel.copy_account_ids().collect::<Vec<_>>(), vec![2, 3]);
        assert!(!rel.copier_accounts[1].enabled);
    }

    #[test]
    fn test_malformed_nested_arrays_are_empty() {
        let json = r#"{
            "copier_accounts": [
                {"master_account": 1, "copier_accounts": null},
                {"master_account": 2, "copier_accounts": "oops"},
                {"master_account": 3},
                {"copier_accounts": []},
                {"master_account": 4, "copier_accounts": [{"copy_account": "x"}, {"copy_account": 5}]}
            ]
        }"#;

        let payload: RelationshipPayload = serde_json::from_str(json).unwrap();
        let masters: Vec<_> = payload.copier_accounts.iter().map(|r| r.master_account).collect();
        assert_eq!(masters, vec![1, 2, 3, 4]);
        assert!(payload.copier_accounts[0].copier_accounts.is_empty());
        assert!(payload.copier_accounts[1].copier_accounts.is_empty());
        assert_eq!(payload.copier_accounts[3].copy_account_ids().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_missing_top_level_array() {
        let payload: RelationshipPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.copier_accounts.is_empty());

        let payload: RelationshipPayload =
            serde_json::from_str(r#"{"copier_accounts": {"master_account": 1}}"#).unwrap();
        assert!(payload.copier_accounts.is_empty());
    }
}
