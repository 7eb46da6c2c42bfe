//! Account role classification against a relationship index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::AccountId;

use super::index::CopyRelationshipIndex;

/// Role of an account in the copy-trading hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Master,
    Copier,
    Standalone,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Master => "MASTER",
            AccountRole::Copier => "COPIER",
            AccountRole::Standalone => "STANDALONE",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Stateless classifier over a borrowed index.
#[derive(Debug, Clone, Copy)]
pub struct AccountRoleClassifier<'a> {
    index: &'a CopyRelationshipIndex,
}

impl<'a> AccountRoleClassifier<'a> {
    pub fn new(index: &'a CopyRelationshipIndex) -> Self {
        Self { index }
    }

    /// True iff the id has a relationship record, even with no copiers.
    pub fn is_master(&self, id: AccountId) -> bool {
        self.index.has_master(id)
    }

    /// True iff the id appears in any master's copier list.
    pub fn is_copier(&self, id: AccountId) -> bool {
        self.index.has_copier(id)
    }

    /// Classify an account. Master takes precedence over copier.
    pub fn classify(&self, id: AccountId) -> AccountRole {
        if self.is_master(id) {
            AccountRole::Master
        } else if self.is_copier(id) {
            AccountRole::Copier
        } else {
            AccountRole::Standalone
        }
    }
}
