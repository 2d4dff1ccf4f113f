//! Notifications from the engine to the presentation layer.
//!
//! RULE: events are emitted only after the state they describe has been
//! committed. A subscriber that reads a snapshot on receipt always sees
//! that state or a later one.

use crate::{
    alerts::Alert,
    category::FraudCategory,
    sample::SamplePattern,
    stats::Stats,
};
use serde::{Deserialize, Serialize};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    // ── Session lifecycle ──────────────────────────
    SessionStarted {
        username: String,
        restored: bool,
    },
    SessionEnded {
        username: String,
    },
    HistoryCleared {
        username: String,
    },

    // ── Analysis cycle ─────────────────────────────
    AnalysisCommitted {
        batch_size:  usize,
        is_fraud:    bool,
        fraud_type:  Option<FraudCategory>,
        pattern:     Option<SamplePattern>,
        stats:       Stats,
    },
    AlertRaised {
        alert: Alert,
    },
    AnalysisFailed {
        reason: String,
    },

    // ── Persistence ────────────────────────────────
    PersistenceFailed {
        reason: String,
    },
}

impl DashboardEvent {
    /// Stable name, used in log lines and the runner's notice output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }    => "session_started",
            Self::SessionEnded { .. }      => "session_ended",
            Self::HistoryCleared { .. }    => "history_cleared",
            Self::AnalysisCommitted { .. } => "analysis_committed",
            Self::AlertRaised { .. }       => "alert_raised",
            Self::AnalysisFailed { .. }    => "analysis_failed",
            Self::PersistenceFailed { .. } => "persistence_failed",
        }
    }
}
