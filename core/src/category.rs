//! Fraud categories reported by the classifier, and alert severity.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FraudCategory {
    CycleDetected,
    Smurfing,
    GnnFlagged,
    Structuring,
}

impl FraudCategory {
    pub const ALL: [FraudCategory; 4] = [
        Self::CycleDetected,
        Self::Smurfing,
        Self::GnnFlagged,
        Self::Structuring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CycleDetected => "CYCLE_DETECTED",
            Self::Smurfing      => "SMURFING",
            Self::GnnFlagged    => "GNN_FLAGGED",
            Self::Structuring   => "STRUCTURING",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }

    /// Human label used by the patterns panel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CycleDetected => "Cycle Detection",
            Self::Smurfing      => "Smurfing",
            Self::GnnFlagged    => "AI Flagged",
            Self::Structuring   => "Structuring",
        }
    }

    /// Cycles are the only category raised as high severity.
    pub fn severity(&self) -> Severity {
        match self {
            Self::CycleDetected => Severity::High,
            _                   => Severity::Medium,
        }
    }
}

impl fmt::Display for FraudCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

/// Accepts any string (or null) for a category field. Unknown labels
/// become `None` instead of failing the whole verdict.
pub fn lenient_category<'de, D>(deserializer: D) -> Result<Option<FraudCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let parsed = FraudCategory::parse(&s);
        if parsed.is_none() {
            log::warn!("Ignoring unknown fraud category '{s}'");
        }
        parsed
    }))
}
