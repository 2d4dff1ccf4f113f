//! The seams to the external classification service.
//!
//! RULE: the engine never decides fraud itself. It only consumes
//! verdicts through `Classifier` and batches through `SampleSource`.

use crate::{
    category::{lenient_category, FraudCategory},
    error::EngineResult,
    sample::SamplePattern,
    transaction::RawTransaction,
    types::AccountId,
};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub transactions:     Vec<RawTransaction>,
    pub bank_id:          String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_pattern: Option<SamplePattern>,
}

/// The classifier's judgment for one batch.
///
/// Every field is optional on the wire: a missing or null `is_fraud`
/// reads as false, missing or null `flagged_accounts` as empty, and an
/// unknown `fraud_type` as no category. Fields the engine does not use
/// (per-account scores, timings) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_fraud:         bool,
    #[serde(default, deserialize_with = "lenient_category")]
    pub fraud_type:       Option<FraudCategory>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flagged_accounts: Vec<AccountId>,
}

impl Verdict {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn fraud(category: FraudCategory, flagged: &[&str]) -> Self {
        Self {
            is_fraud:         true,
            fraud_type:       Some(category),
            flagged_accounts: flagged.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Response of `POST /demo/generate-sample`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleBatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<RawTransaction>,
    #[serde(default, deserialize_with = "lenient_pattern")]
    pub pattern:      Option<SamplePattern>,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> EngineResult<Verdict>;
}

#[async_trait]
pub trait SampleSource: Send + Sync {
    /// `None` lets the source choose a pattern.
    async fn generate_sample(&self, pattern: Option<SamplePattern>) -> EngineResult<SampleBatch>;
}

/// An explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_pattern<'de, D>(deserializer: D) -> Result<Option<SamplePattern>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SamplePattern::parse))
}
