//! Sample patterns and the offline synthetic batch generator.
//!
//! Batch shapes mirror the classifier's demo generator so a locally
//! generated batch exercises the same verdict paths as a fetched one.

use crate::{
    classifier::{SampleBatch, SampleSource},
    error::EngineResult,
    name_generator::NameGenerator,
    rng::SampleRng,
    transaction::{generate_tx_id, RawTransaction},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePattern {
    Normal,
    Cycle,
    Smurf,
    Structuring,
    GnnTrigger,
}

impl SamplePattern {
    /// Rotation order. Append only: the persisted pattern index points into this.
    pub const ALL: [SamplePattern; 5] = [
        Self::Normal,
        Self::Cycle,
        Self::Smurf,
        Self::Structuring,
        Self::GnnTrigger,
    ];

    pub fn from_index(index: u64) -> Self {
        Self::ALL[(index % Self::ALL.len() as u64) as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal      => "normal",
            Self::Cycle       => "cycle",
            Self::Smurf       => "smurf",
            Self::Structuring => "structuring",
            Self::GnnTrigger  => "gnn_trigger",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == raw)
    }
}

impl fmt::Display for SamplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seeded, offline `SampleSource`.
pub struct SyntheticSampleSource {
    rng: Mutex<SampleRng>,
}

impl SyntheticSampleSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(SampleRng::new(seed, 0)) }
    }

    /// Generate one batch. `None` picks a pattern uniformly.
    pub fn generate(&self, pattern: Option<SamplePattern>) -> SampleBatch {
        let mut rng = self.rng.lock();
        let pattern = pattern.unwrap_or_else(|| *rng.pick(&SamplePattern::ALL));
        let base = Utc::now();
        let mut transactions = Vec::new();

        let mut push = |sender: &str, receiver: &str, amount: i64, offset: Duration| {
            let at = base + offset;
            transactions.push(RawTransaction {
                tx_id:     Some(generate_tx_id(at)),
                sender:    sender.to_string(),
                receiver:  receiver.to_string(),
                amount:    amount as f64,
                timestamp: Some(at.to_rfc3339()),
            });
        };

        match pattern {
            SamplePattern::Cycle => {
                let people = NameGenerator::distinct_names(&mut rng, 3);
                let amount = rng.int_between(25_000, 50_000);
                for i in 0..3 {
                    let jitter = rng.int_between(-500, 500);
                    push(&people[i], &people[(i + 1) % 3], amount + jitter, Duration::minutes(15 * i as i64));
                }
            }
            SamplePattern::Smurf => {
                let people = NameGenerator::distinct_names(&mut rng, 6);
                for i in 0..5 {
                    let amount = rng.int_between(7_000, 9_500);
                    push(&people[0], &people[i + 1], amount, Duration::minutes(10 * i as i64));
                }
            }
            SamplePattern::Structuring => {
                let people = NameGenerator::distinct_names(&mut rng, 2);
                for i in 0..4 {
                    let amount = rng.int_between(9_000, 9_900);
                    push(&people[0], &people[1], amount, Duration::hours(3 * i as i64));
                }
            }
            SamplePattern::GnnTrigger => {
                let people = NameGenerator::distinct_names(&mut rng, 6);
                for i in 0..5 {
                    let amount = rng.int_between(5_000, 15_000);
                    push(&people[i % 6], &people[(i + 2) % 6], amount, Duration::minutes(20 * i as i64));
                }
            }
            SamplePattern::Normal => {
                let people = NameGenerator::distinct_names(&mut rng, 4);
                let count = rng.int_between(2, 4);
                for i in 0..count {
                    let s = rng.next_u64_below(4) as usize;
                    let r = (s + 1 + rng.next_u64_below(3) as usize) % 4;
                    let amount = rng.int_between(100, 2_000);
                    push(&people[s], &people[r], amount, Duration::minutes(30 * i));
                }
            }
        }

        SampleBatch { transactions, pattern: Some(pattern) }
    }
}

#[async_trait]
impl SampleSource for SyntheticSampleSource {
    async fn generate_sample(&self, pattern: Option<SamplePattern>) -> EngineResult<SampleBatch> {
        Ok(self.generate(pattern))
    }
}
