//! Alert log: capped, most-recent-first.

use crate::{
    category::{FraudCategory, Severity},
    types::{AccountId, ALERT_CAPACITY},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id:        String,
    #[serde(rename = "type")]
    pub category:  FraudCategory,
    pub message:   String,
    pub accounts:  Vec<AccountId>,
    pub timestamp: DateTime<Utc>,
    pub severity:  Severity,
}

impl Alert {
    /// Build the alert raised for a fraud verdict.
    pub fn for_verdict(category: FraudCategory, accounts: &[AccountId], at: DateTime<Utc>) -> Self {
        Self {
            id:        Uuid::new_v4().to_string(),
            category,
            message:   format!("{category} detected involving {} accounts", accounts.len()),
            accounts:  accounts.to_vec(),
            timestamp: at,
            severity:  category.severity(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertLog {
    entries: VecDeque<Alert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend, then keep only the newest `ALERT_CAPACITY`.
    /// Identical alerts are not deduplicated.
    pub fn push(&mut self, alert: Alert) {
        self.entries.push_front(alert);
        self.entries.truncate(ALERT_CAPACITY);
    }

    /// Re-apply the cap to data loaded from an older snapshot.
    pub(crate) fn enforce_cap(&mut self) {
        self.entries.truncate(ALERT_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.entries.front()
    }
}
