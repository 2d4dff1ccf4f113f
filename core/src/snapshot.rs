//! Session snapshot serialization: dashboard state to/from JSON.
//!
//! A snapshot is written at the end of every committed analysis cycle.
//! It captures everything needed to resume a session after login
//! without re-querying the classifier. The graph is not stored; it is
//! rebuilt from history + blacklist on restore.

use crate::{
    alerts::AlertLog,
    blacklist::BlacklistRegistry,
    history::TransactionHistory,
    patterns::PatternCounters,
    stats::Stats,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub transactions:   TransactionHistory,
    #[serde(default)]
    pub alerts:         AlertLog,
    #[serde(default)]
    pub fraud_patterns: PatternCounters,
    #[serde(default)]
    pub pattern_index:  u64,
    #[serde(default)]
    pub blacklisted:    BlacklistRegistry,
    #[serde(default)]
    pub stats:          Stats,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored blob, re-applying the history and alert caps.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut snapshot: SessionSnapshot = serde_json::from_str(json)?;
        snapshot.transactions.enforce_cap();
        snapshot.alerts.enforce_cap();
        Ok(snapshot)
    }
}
