//! Running dashboard counters.

use serde::{Deserialize, Serialize};

/// Same field names as the classifier's `GET /stats`, so the polling
/// variant can deserialize straight into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_analyses:      u64,
    #[serde(default)]
    pub frauds_detected:     u64,
    /// Counts blacklisting events. The same account flagged twice is
    /// counted twice, so this can exceed the registry size.
    #[serde(default)]
    pub blacklisted_count:   u64,
    #[serde(default)]
    pub current_graph_nodes: u64,
}

impl Stats {
    pub fn record_analysis(&mut self, is_fraud: bool, flagged_count: usize) {
        self.total_analyses += 1;
        if is_fraud {
            self.frauds_detected += 1;
            self.blacklisted_count += flagged_count as u64;
        }
    }

    /// Percentage of analyses that came back fraudulent, rounded. Always in [0, 100].
    pub fn risk_score(&self) -> u32 {
        if self.total_analyses == 0 {
            return 0;
        }
        let ratio = self.frauds_detected.min(self.total_analyses) as f64 / self.total_analyses as f64;
        (ratio * 100.0).round() as u32
    }

    /// Same ratio with one decimal place, for the "% flagged" trend line.
    pub fn detection_rate(&self) -> f64 {
        if self.total_analyses == 0 {
            return 0.0;
        }
        let pct = self.frauds_detected as f64 / self.total_analyses as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

/// Gauge band for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=29  => Self::Low,
            30..=59 => Self::Medium,
            _       => Self::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low    => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High   => "High Risk",
        }
    }
}
