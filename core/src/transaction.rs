//! Transactions as they arrive from a sample source, and as they are
//! recorded in the history ledger after enrichment.

use crate::{
    category::FraudCategory,
    types::{AccountId, TxId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transaction as produced by a sample source and sent to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id:     Option<TxId>,
    pub sender:    AccountId,
    pub receiver:  AccountId,
    pub amount:    f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RawTransaction {
    pub fn new(sender: impl Into<AccountId>, receiver: impl Into<AccountId>, amount: f64) -> Self {
        Self {
            tx_id:     None,
            sender:    sender.into(),
            receiver:  receiver.into(),
            amount,
            timestamp: None,
        }
    }

    /// True when either party appears in `flagged`.
    pub fn touches_any(&self, flagged: &[AccountId]) -> bool {
        flagged.iter().any(|a| *a == self.sender || *a == self.receiver)
    }
}

/// Generate a transaction id in the classifier's `TXN<stamp><suffix>` form.
pub fn generate_tx_id(now: DateTime<Utc>) -> TxId {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("TXN{}{}", now.format("%Y%m%d%H%M%S"), suffix)
}

/// A recorded, enriched transaction. Immutable once in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id:         TxId,
    pub sender:     AccountId,
    pub receiver:   AccountId,
    pub amount:     f64,
    pub timestamp:  DateTime<Utc>,
    pub is_fraud:   bool,
    pub fraud_type: Option<FraudCategory>,
}

impl Transaction {
    /// Enrich a raw transaction against a verdict's flagged accounts.
    /// Fraud is a per-transaction membership test on sender or receiver.
    pub fn enrich(
        raw:        RawTransaction,
        flagged:    &[AccountId],
        category:   Option<FraudCategory>,
        recorded:   DateTime<Utc>,
    ) -> Self {
        let is_fraud = raw.touches_any(flagged);
        Self {
            id:         raw.tx_id.unwrap_or_else(|| generate_tx_id(recorded)),
            sender:     raw.sender,
            receiver:   raw.receiver,
            amount:     raw.amount.max(0.0),
            timestamp:  recorded,
            is_fraud,
            fraud_type: if is_fraud { category } else { None },
        }
    }
}
