//! The dashboard engine. One instance per logged-in session.
//!
//! CYCLE ORDER (fixed, documented, never reordered):
//!   1. Single-flight gate: Idle → Requesting, or reject.
//!   2. Fetch a sample batch            (simulation runs only)
//!   3. Classify the batch              (the suspending step)
//!   4. Commit, under one write lock:
//!      a. blacklist + stats + patterns + alert  (fraud verdicts)
//!         or stats only                         (clean verdicts)
//!      b. history.append_batch(enriched)
//!      c. graph rebuild from history + blacklist
//!      d. stats.current_graph_nodes = graph.nodes.len()
//!      e. SessionStore.save(snapshot)
//!   5. Gate back to Idle, then notify subscribers.
//!
//! RULES:
//!   - Readers only ever see committed state. Nothing is written to
//!     the shared state before the verdict arrives.
//!   - A failed request mutates nothing and still returns to Idle.
//!   - No failure in here is fatal. Persistence errors are logged and
//!     surfaced as notices.

use crate::{
    alerts::{Alert, AlertLog},
    blacklist::BlacklistRegistry,
    category::FraudCategory,
    classifier::{AnalyzeRequest, Classifier, SampleSource, Verdict},
    config::DashboardConfig,
    cycle::{CycleGate, CyclePhase, FlightGuard},
    error::{EngineError, EngineResult},
    event::DashboardEvent,
    export,
    graph::GraphModel,
    history::TransactionHistory,
    patterns::PatternCounters,
    sample::SamplePattern,
    session::Session,
    snapshot::SessionSnapshot,
    stats::{RiskLevel, Stats},
    store::SessionStore,
    transaction::{generate_tx_id, RawTransaction, Transaction},
    types::AccountId,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::{path::Path, sync::Arc};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The committed, observable state of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub history:       TransactionHistory,
    pub alerts:        AlertLog,
    pub patterns:      PatternCounters,
    pub pattern_index: u64,
    pub blacklist:     BlacklistRegistry,
    pub stats:         Stats,
    pub graph:         GraphModel,
}

impl DashboardState {
    /// Restore from a snapshot. The graph is rebuilt, and the node count
    /// is taken from the rebuilt graph rather than trusted from disk.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let graph = GraphModel::rebuild(snapshot.transactions.iter(), &snapshot.blacklisted);
        let mut stats = snapshot.stats;
        stats.current_graph_nodes = graph.nodes.len() as u64;
        Self {
            history:       snapshot.transactions,
            alerts:        snapshot.alerts,
            patterns:      snapshot.fraud_patterns,
            pattern_index: snapshot.pattern_index,
            blacklist:     snapshot.blacklisted,
            stats,
            graph,
        }
    }

    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            transactions:   self.history.clone(),
            alerts:         self.alerts.clone(),
            fraud_patterns: self.patterns.clone(),
            pattern_index:  self.pattern_index,
            blacklisted:    self.blacklist.clone(),
            stats:          self.stats,
        }
    }

    pub fn risk_score(&self) -> u32 {
        self.stats.risk_score()
    }
}

/// What one call to start a cycle amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Committed(CycleReport),
    /// Another cycle was in flight. Nothing happened.
    Rejected,
    /// The classifier (or sample source) could not be reached.
    /// Nothing was mutated.
    Failed { reason: String },
}

impl CycleOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Committed(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub batch_size:       usize,
    pub is_fraud:         bool,
    pub fraud_type:       Option<FraudCategory>,
    pub flagged_accounts: Vec<AccountId>,
    pub pattern:          Option<SamplePattern>,
    pub alert:            Option<Alert>,
    pub graph_nodes:      usize,
    pub persisted:        bool,
}

pub struct DashboardEngine {
    session:    Session,
    config:     DashboardConfig,
    store:      Arc<dyn SessionStore>,
    classifier: Arc<dyn Classifier>,
    samples:    Arc<dyn SampleSource>,
    gate:       CycleGate,
    state:      RwLock<DashboardState>,
    events:     broadcast::Sender<DashboardEvent>,
}

impl DashboardEngine {
    /// Log in and build the engine for that identity. A readable prior
    /// snapshot is restored; anything else starts an empty session.
    pub fn login(
        username:   &str,
        config:     DashboardConfig,
        store:      Arc<dyn SessionStore>,
        classifier: Arc<dyn Classifier>,
        samples:    Arc<dyn SampleSource>,
    ) -> EngineResult<Self> {
        let session = Session::login(username)?;

        if let Err(e) = store.record_login(&session) {
            log::warn!("Could not record login for '{}': {e}", session.username);
        }

        let (state, restored) = match store.load(&session.username) {
            Ok(Some(snapshot)) => (DashboardState::from_snapshot(snapshot), true),
            Ok(None) => (DashboardState::default(), false),
            Err(e) => {
                log::warn!("Unreadable snapshot for '{}', starting fresh: {e}", session.username);
                (DashboardState::default(), false)
            }
        };

        log::info!(
            "Session {} started for '{}' ({} transactions restored)",
            session.session_id,
            session.username,
            state.history.len()
        );

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let engine = Self {
            session,
            config,
            store,
            classifier,
            samples,
            gate: CycleGate::new(),
            state: RwLock::new(state),
            events,
        };
        engine.notify(DashboardEvent::SessionStarted {
            username: engine.session.username.clone(),
            restored,
        });
        Ok(engine)
    }

    /// Convenience for a client that is both sample source and classifier.
    pub fn login_with<C>(
        username: &str,
        config:   DashboardConfig,
        store:    Arc<dyn SessionStore>,
        client:   Arc<C>,
    ) -> EngineResult<Self>
    where
        C: Classifier + SampleSource + 'static,
    {
        let classifier: Arc<dyn Classifier> = client.clone();
        let samples: Arc<dyn SampleSource> = client;
        Self::login(username, config, store, classifier, samples)
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn phase(&self) -> CyclePhase {
        self.gate.phase()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Drain everything queued on `rx`. With notifications turned off the
    /// queue is still emptied, but nothing is handed back.
    pub fn take_notices(&self, rx: &mut broadcast::Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
        let mut notices = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => notices.push(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    log::warn!("Dropped {n} notices");
                }
                Err(_) => break,
            }
        }
        if !self.config.notifications {
            notices.clear();
        }
        notices
    }

    /// A copy of the latest committed state.
    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    pub fn stats(&self) -> Stats {
        self.state.read().stats
    }

    pub fn graph(&self) -> GraphModel {
        self.state.read().graph.clone()
    }

    pub fn risk_score(&self) -> u32 {
        self.state.read().risk_score()
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score())
    }

    pub fn detection_rate(&self) -> f64 {
        self.state.read().stats.detection_rate()
    }

    /// Pattern the next rotating simulation run will request.
    pub fn next_pattern(&self) -> SamplePattern {
        SamplePattern::from_index(self.state.read().pattern_index)
    }

    // ── Analysis cycle ─────────────────────────────────────────────

    /// Fetch a sample batch and analyze it, as one single-flight cycle.
    pub async fn run_simulation(&self) -> CycleOutcome {
        let Some(guard) = self.gate.try_begin() else {
            log::debug!("Simulation rejected: cycle already in flight");
            return CycleOutcome::Rejected;
        };

        let requested = self.config.rotate_patterns.then(|| self.next_pattern());
        let sample = match self.samples.generate_sample(requested).await {
            Ok(sample) => sample,
            Err(e) => return self.fail(guard, e),
        };
        let expected = sample.pattern.or(requested);

        self.classify_and_commit(guard, sample.transactions, expected, requested.is_some())
            .await
    }

    /// Analyze a caller-supplied batch.
    pub async fn analyze_batch(
        &self,
        batch:    Vec<RawTransaction>,
        expected: Option<SamplePattern>,
    ) -> CycleOutcome {
        let Some(guard) = self.gate.try_begin() else {
            log::debug!("Analysis rejected: cycle already in flight");
            return CycleOutcome::Rejected;
        };
        self.classify_and_commit(guard, batch, expected, false).await
    }

    async fn classify_and_commit(
        &self,
        guard:           FlightGuard<'_>,
        mut batch:       Vec<RawTransaction>,
        expected:        Option<SamplePattern>,
        advance_pattern: bool,
    ) -> CycleOutcome {
        // Ids are fixed before the request so the classifier and the
        // history agree on them.
        let now = Utc::now();
        for raw in &mut batch {
            if raw.tx_id.is_none() {
                raw.tx_id = Some(generate_tx_id(now));
            }
        }

        let request = AnalyzeRequest {
            transactions:     batch,
            bank_id:          self.config.bank_id.clone(),
            expected_pattern: expected,
        };

        let verdict = match self.classifier.analyze(&request).await {
            Ok(verdict) => verdict,
            Err(e) => return self.fail(guard, e),
        };

        guard.committing();
        let (report, snapshot_stats, save_error) =
            self.commit(request.transactions, verdict, expected, advance_pattern);
        drop(guard);

        if let Some(reason) = save_error {
            self.notify(DashboardEvent::PersistenceFailed { reason });
        }
        if let Some(alert) = &report.alert {
            self.notify(DashboardEvent::AlertRaised { alert: alert.clone() });
        }
        self.notify(DashboardEvent::AnalysisCommitted {
            batch_size: report.batch_size,
            is_fraud:   report.is_fraud,
            fraud_type: report.fraud_type,
            pattern:    report.pattern,
            stats:      snapshot_stats,
        });
        CycleOutcome::Committed(report)
    }

    /// Steps 4a to 4e. Runs entirely under the write lock so observers see
    /// either the previous committed state or this one, nothing between.
    fn commit(
        &self,
        batch:           Vec<RawTransaction>,
        verdict:         Verdict,
        pattern:         Option<SamplePattern>,
        advance_pattern: bool,
    ) -> (CycleReport, Stats, Option<String>) {
        let now = Utc::now();
        let flagged = verdict.flagged_accounts;
        let batch_size = batch.len();
        let mut alert = None;

        let mut state = self.state.write();

        // a. verdict bookkeeping
        if verdict.is_fraud {
            state.blacklist.add(&flagged);
            state.stats.record_analysis(true, flagged.len());
            match verdict.fraud_type {
                Some(category) => {
                    state.patterns.increment(category);
                    if flagged.is_empty() {
                        log::warn!("{category} verdict flagged no accounts; no alert raised");
                    } else {
                        let raised = Alert::for_verdict(category, &flagged, now);
                        state.alerts.push(raised.clone());
                        alert = Some(raised);
                    }
                }
                None => log::warn!("Fraud verdict without a category; no alert raised"),
            }
        } else {
            state.stats.record_analysis(false, 0);
        }

        // b. history
        let enriched = batch
            .into_iter()
            .map(|raw| Transaction::enrich(raw, &flagged, verdict.fraud_type, now))
            .collect();
        state.history.append_batch(enriched);

        // c. graph
        let graph = GraphModel::rebuild(state.history.iter(), &state.blacklist);
        state.graph = graph;

        // d. node count
        state.stats.current_graph_nodes = state.graph.nodes.len() as u64;

        if advance_pattern {
            state.pattern_index += 1;
        }

        // e. persist
        let save_error = self.persist(&state).err();
        let persisted = save_error.is_none();

        log::debug!(
            "Committed batch of {batch_size}: fraud={} nodes={} history={}",
            verdict.is_fraud,
            state.graph.nodes.len(),
            state.history.len()
        );

        let report = CycleReport {
            batch_size,
            is_fraud: verdict.is_fraud,
            fraud_type: verdict.fraud_type,
            flagged_accounts: flagged,
            pattern,
            alert,
            graph_nodes: state.graph.nodes.len(),
            persisted,
        };
        (report, state.stats, save_error)
    }

    /// The failure is logged here; the caller notifies once the lock is released.
    fn persist(&self, state: &DashboardState) -> Result<(), String> {
        self.store
            .save(&self.session.username, &state.to_snapshot())
            .map_err(|e| {
                log::warn!("Could not save session for '{}': {e}", self.session.username);
                e.to_string()
            })
    }

    fn fail(&self, guard: FlightGuard<'_>, error: EngineError) -> CycleOutcome {
        drop(guard);
        let reason = error.to_string();
        log::warn!("Analysis failed, state unchanged: {reason}");
        self.notify(DashboardEvent::AnalysisFailed { reason: reason.clone() });
        CycleOutcome::Failed { reason }
    }

    // ── Clear / logout ─────────────────────────────────────────────

    /// Reset every entity to empty and purge the persisted snapshot.
    pub fn clear(&self) {
        *self.state.write() = DashboardState::default();
        if let Err(e) = self.store.clear(&self.session.username) {
            log::warn!("Could not purge session for '{}': {e}", self.session.username);
            self.notify(DashboardEvent::PersistenceFailed { reason: e.to_string() });
        }
        log::info!("History cleared for '{}'", self.session.username);
        self.notify(DashboardEvent::HistoryCleared {
            username: self.session.username.clone(),
        });
    }

    /// End the session: same reset as `clear`, then the engine is gone.
    pub fn logout(self) {
        self.clear();
        if let Err(e) = self.store.record_logout(&self.session) {
            log::warn!("Could not record logout for '{}': {e}", self.session.username);
        }
        log::info!("Session {} ended", self.session.session_id);
        self.notify(DashboardEvent::SessionEnded {
            username: self.session.username.clone(),
        });
    }

    // ── Export ─────────────────────────────────────────────────────

    pub fn export_csv(&self) -> EngineResult<String> {
        export::history_to_csv(&self.state.read().history)
    }

    /// Returns the number of rows written. Nothing is created when the
    /// history is empty.
    pub fn export_to(&self, path: &Path) -> EngineResult<usize> {
        export::write_history_csv(&self.state.read().history, path)
    }

    fn notify(&self, event: DashboardEvent) {
        log::debug!("event: {}", event.kind());
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
