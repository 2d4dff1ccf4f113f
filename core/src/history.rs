//! Transaction history: capped, most-recent-first ledger.
//!
//! RULE: entries are evicted from the tail, never mutated.

use crate::{
    transaction::Transaction,
    types::HISTORY_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHistory {
    entries: VecDeque<Transaction>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a whole batch, keeping its internal order, then truncate.
    /// Batch `[t1, t2]` on top of `[t0]` yields `[t1, t2, t0]`.
    pub fn append_batch(&mut self, batch: Vec<Transaction>) {
        for tx in batch.into_iter().rev() {
            self.entries.push_front(tx);
        }
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub(crate) fn enforce_cap(&mut self) {
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&Transaction> {
        self.entries.front()
    }

    pub fn oldest(&self) -> Option<&Transaction> {
        self.entries.back()
    }
}
