//! Blacklist registry: every account ever implicated in a fraud verdict.
//!
//! RULE: append-only. There is no removal operation; the only way back
//! to empty is a full engine reset (clear or logout).

use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AccountId>", into = "Vec<AccountId>")]
pub struct BlacklistRegistry {
    order:   Vec<AccountId>,
    members: HashSet<AccountId>,
}

impl BlacklistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add accounts. Already-present accounts are a no-op for membership;
    /// the reporting counter is bumped by the caller, not here.
    pub fn add<'a, I>(&mut self, accounts: I)
    where
        I: IntoIterator<Item = &'a AccountId>,
    {
        for account in accounts {
            if self.members.insert(account.clone()) {
                self.order.push(account.clone());
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Members in first-flagged order.
    pub fn snapshot(&self) -> Vec<AccountId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl From<Vec<AccountId>> for BlacklistRegistry {
    fn from(accounts: Vec<AccountId>) -> Self {
        let mut registry = Self::new();
        registry.add(&accounts);
        registry
    }
}

impl From<BlacklistRegistry> for Vec<AccountId> {
    fn from(registry: BlacklistRegistry) -> Self {
        registry.order
    }
}
