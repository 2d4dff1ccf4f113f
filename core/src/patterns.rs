//! Per-category fraud pattern tally.

use crate::category::FraudCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<FraudCategory, u64>", into = "BTreeMap<FraudCategory, u64>")]
pub struct PatternCounters {
    counts: BTreeMap<FraudCategory, u64>,
}

impl Default for PatternCounters {
    fn default() -> Self {
        Self {
            counts: FraudCategory::ALL.into_iter().map(|c| (c, 0)).collect(),
        }
    }
}

impl PatternCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, category: FraudCategory) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn count(&self, category: FraudCategory) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Share of the total for one category, as a percentage in [0, 100].
    pub fn share(&self, category: FraudCategory) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(category) as f64 / total as f64 * 100.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (FraudCategory, u64)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
}

impl From<BTreeMap<FraudCategory, u64>> for PatternCounters {
    fn from(loaded: BTreeMap<FraudCategory, u64>) -> Self {
        let mut counters = Self::default();
        counters.counts.extend(loaded);
        counters
    }
}

impl From<PatternCounters> for BTreeMap<FraudCategory, u64> {
    fn from(counters: PatternCounters) -> Self {
        counters.counts
    }
}
