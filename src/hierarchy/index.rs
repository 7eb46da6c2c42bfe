//! Master-id to copier-id lookup built from raw relationship records.

use std::collections::{HashMap, HashSet};

use crate::models::{AccountId, CopyRelationship, RelationshipPayload};

/// One-level copy relationship lookup.
///
/// Duplicate master records contribute by concatenation; deduplication is
/// left to callers.
#[derive(Debug, Clone, Default)]
pub struct CopyRelationshipIndex {
    slaves_by_master: HashMap<AccountId, Vec<AccountId>>,
    copiers: HashSet<AccountId>,
}

impl CopyRelationshipIndex {
    /// Build the index from relationship records.
    pub fn build<'a, I>(relationships: I) -> Self
    where
        I: IntoIterator<Item = &'a CopyRelationship>,
    {
        let mut slaves_by_master: HashMap<AccountId, Vec<AccountId>> = HashMap::new();
        let mut copiers = HashSet::new();

        for relationship in relationships {
            let slaves = slaves_by_master
                .entry(relationship.master_account)
                .or_default();

            for copy_account in relationship.copy_account_ids() {
                slaves.push(copy_account);
                copiers.insert(copy_account);
            }
        }

        Self {
            slaves_by_master,
            copiers,
        }
    }

    /// Build from an optional payload. An absent payload yields an empty
    /// index, so every account classifies as standalone.
    pub fn from_payload(payload: Option<&RelationshipPayload>) -> Self {
        match payload {
            Some(payload) => Self::build(&payload.copier_accounts),
            None => Self::default(),
        }
    }

    /// Copy-account ids of a master in link order; empty if unknown.
    pub fn slaves_of(&self, master_id: AccountId) -> &[AccountId] {
        self.slaves_by_master
            .get(&master_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a relationship record exists for this master id.
    pub fn has_master(&self, id: AccountId) -> bool {
        self.slaves_by_master.contains_key(&id)
    }

    /// Whether the id appears in any master's copier list.
    pub fn has_copier(&self, id: AccountId) -> bool {
        self.copiers.contains(&id)
    }

    /// Number of distinct masters.
    pub fn len(&self) -> usize {
        self.slaves_by_master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slaves_by_master.is_empty()
    }

    /// Total number of copier links across all masters.
    pub fn link_count(&self) -> usize {
        self.slaves_by_master.values().map(Vec::len).sum()
    }
}
