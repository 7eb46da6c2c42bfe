//! Partitioning of an account list into master/copier hierarchy nodes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Account, AccountId};

use super::classifier::{AccountRole, AccountRoleClassifier};
use super::index::CopyRelationshipIndex;

/// A master (or standalone) account and the accounts copying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub master: Account,
    pub slaves: Vec<Account>,
}

impl HierarchyNode {
    pub fn standalone(account: Account) -> Self {
        Self {
            master: account,
            slaves: Vec::new(),
        }
    }

    /// All account ids referenced by this node, master first.
    pub fn account_ids(&self) -> impl Iterator<Item = AccountId> + '_ {
        std::iter::once(self.master.id).chain(self.slaves.iter().map(|a| a.id))
    }
}

/// Builds hierarchy nodes from an ordered account list.
///
/// Every input account lands in exactly one node, as a master or inside one
/// slave list, except a copier whose master is missing from the input. Such
/// an account appears in no node and is reported by [`excluded_accounts`].
///
/// [`excluded_accounts`]: AccountHierarchyBuilder::excluded_accounts
pub struct AccountHierarchyBuilder<'a> {
    accounts: &'a [Account],
    index: &'a CopyRelationshipIndex,
}

impl<'a> AccountHierarchyBuilder<'a> {
    pub fn new(accounts: &'a [Account], index: &'a CopyRelationshipIndex) -> Self {
        Self { accounts, index }
    }

    /// Master nodes in input order, followed by standalone nodes in input order.
    pub fn build(&self) -> Vec<HierarchyNode> {
        let classifier = AccountRoleClassifier::new(self.index);

        let mut by_id: HashMap<AccountId, &Account> = HashMap::with_capacity(self.accounts.len());
        for account in self.accounts {
            by_id.entry(account.id).or_insert(account);
        }

        let mut processed_slaves: HashSet<AccountId> = HashSet::new();
        let mut emitted: HashSet<AccountId> = HashSet::new();
        let mut nodes = Vec::new();

        // Masters first, in input order.
        for account in self.accounts {
            if processed_slaves.contains(&account.id) || emitted.contains(&account.id) {
                continue;
            }
            if classifier.classify(account.id) != AccountRole::Master {
                continue;
            }

            emitted.insert(account.id);

            let mut slaves = Vec::new();
            for &slave_id in self.index.slaves_of(account.id) {
                if slave_id == account.id
                    || processed_slaves.contains(&slave_id)
                    || emitted.contains(&slave_id)
                {
                    continue;
                }
                // Ids outside the input set are dropped.
                if let Some(slave) = by_id.get(&slave_id) {
                    processed_slaves.insert(slave_id);
                    slaves.push((*slave).clone());
                }
            }

            nodes.push(HierarchyNode {
                master: account.clone(),
                slaves,
            });
        }

        // Then standalones, in input order.
        for account in self.accounts {
            if processed_slaves.contains(&account.id) || emitted.contains(&account.id) {
                continue;
            }
            if classifier.classify(account.id) == AccountRole::Standalone {
                emitted.insert(account.id);
                nodes.push(HierarchyNode::standalone(account.clone()));
            }
        }

        debug!(
            accounts = self.accounts.len(),
            nodes = nodes.len(),
            slaves = processed_slaves.len(),
            "Built account hierarchy"
        );

        nodes
    }

    /// Input account ids referenced by none of the given nodes, in input order.
    pub fn excluded_accounts(&self, nodes: &[HierarchyNode]) -> Vec<AccountId> {
        let included: HashSet<AccountId> = nodes.iter().flat_map(|n| n.account_ids()).collect();

        let mut seen = HashSet::new();
        let excluded: Vec<AccountId> = self
            .accounts
            .iter()
            .map(|a| a.id)
            .filter(|id| !included.contains(id) && seen.insert(*id))
            .collect();

        if !excluded.is_empty() {
            debug!(excluded = ?excluded, "Copier accounts without a visible master");
        }

        excluded
    }
}
