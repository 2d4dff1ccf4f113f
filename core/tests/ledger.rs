//! Ledger tests: history ordering and caps, alert cap, pattern tally,
//! blacklist monotonicity, and the stats/risk laws.

mod common;

use chrono::Utc;
use common::{engine, tx, Reply, ScriptedClassifier};
use fraudnets_core::{
    alerts::{Alert, AlertLog},
    blacklist::BlacklistRegistry,
    category::FraudCategory,
    classifier::Verdict,
    history::TransactionHistory,
    patterns::PatternCounters,
    stats::{RiskLevel, Stats},
    transaction::{RawTransaction, Transaction},
    types::{AccountId, ALERT_CAPACITY, HISTORY_CAPACITY},
};

fn recorded(sender: &str, amount: f64) -> Transaction {
    Transaction::enrich(RawTransaction::new(sender, "SINK", amount), &[], None, Utc::now())
}

fn ids(accounts: &[&str]) -> Vec<AccountId> {
    accounts.iter().map(|a| a.to_string()).collect()
}

// ── History ───────────────────────────────────────────────────────────

#[test]
fn batch_is_prepended_in_order() {
    let mut history = TransactionHistory::new();
    history.append_batch(vec![recorded("t0", 0.0)]);
    history.append_batch(vec![recorded("t1", 1.0), recorded("t2", 2.0)]);

    let senders: Vec<&str> = history.iter().map(|t| t.sender.as_str()).collect();
    assert_eq!(senders, vec!["t1", "t2", "t0"]);
}

#[test]
fn history_keeps_newest_hundred() {
    let mut history = TransactionHistory::new();
    for i in 0..=HISTORY_CAPACITY {
        history.append_batch(vec![recorded("A", i as f64)]);
    }

    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.newest().unwrap().amount, 100.0);
    assert_eq!(history.oldest().unwrap().amount, 1.0);
}

#[test]
fn oversized_batch_is_truncated_from_its_tail() {
    let mut history = TransactionHistory::new();
    history.append_batch((0..150).map(|i| recorded("A", i as f64)).collect());

    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.newest().unwrap().amount, 0.0);
    assert_eq!(history.oldest().unwrap().amount, 99.0);
}

/// The same law through the engine: 101 single-transfer cycles.
#[tokio::test]
async fn engine_history_evicts_oldest() {
    let engine = engine(ScriptedClassifier::always_clean());
    for i in 0..=HISTORY_CAPACITY {
        assert!(engine.analyze_batch(vec![tx("A", "B", i as f64)], None).await.is_committed());
    }

    let state = engine.state();
    assert_eq!(state.history.len(), HISTORY_CAPACITY);
    assert_eq!(state.history.newest().unwrap().amount, 100.0);
    assert_eq!(state.history.oldest().unwrap().amount, 1.0);
    assert_eq!(state.stats.total_analyses, 101);
    // Parallel edges are kept, so the graph tracks history length.
    assert_eq!(state.graph.edges.len(), HISTORY_CAPACITY);
}

#[test]
fn negative_amounts_are_clamped() {
    let tx = recorded("A", -5.0);
    assert_eq!(tx.amount, 0.0);
}

// ── Alerts ────────────────────────────────────────────────────────────

#[test]
fn alert_log_keeps_newest_ten() {
    let mut log = AlertLog::new();
    for i in 0..15 {
        let alert = Alert::for_verdict(FraudCategory::Smurfing, &ids(&[format!("A{i}").as_str()]), Utc::now());
        log.push(alert);
    }

    assert_eq!(log.len(), ALERT_CAPACITY);
    assert_eq!(log.latest().unwrap().accounts, ids(&["A14"]));
    assert_eq!(log.iter().last().unwrap().accounts, ids(&["A5"]));
}

#[test]
fn alert_ids_are_unique() {
    let flagged = ids(&["A"]);
    let a = Alert::for_verdict(FraudCategory::Structuring, &flagged, Utc::now());
    let b = Alert::for_verdict(FraudCategory::Structuring, &flagged, Utc::now());
    assert_ne!(a.id, b.id);
}

#[test]
fn alert_serializes_category_as_type() {
    let alert = Alert::for_verdict(FraudCategory::CycleDetected, &ids(&["A", "B"]), Utc::now());
    let json = serde_json::to_value(&alert).unwrap();
    assert_eq!(json["type"], "CYCLE_DETECTED");
    assert_eq!(json["severity"], "high");
}

// ── Pattern counters ──────────────────────────────────────────────────

#[test]
fn counters_start_at_zero_for_every_category() {
    let counters = PatternCounters::new();
    assert_eq!(counters.iter().count(), FraudCategory::ALL.len());
    assert_eq!(counters.total(), 0);
    assert_eq!(counters.share(FraudCategory::Smurfing), 0.0);
}

#[test]
fn counters_total_and_share() {
    let mut counters = PatternCounters::new();
    counters.increment(FraudCategory::CycleDetected);
    counters.increment(FraudCategory::CycleDetected);
    counters.increment(FraudCategory::CycleDetected);
    counters.increment(FraudCategory::GnnFlagged);

    assert_eq!(counters.total(), 4);
    assert_eq!(counters.count(FraudCategory::CycleDetected), 3);
    assert_eq!(counters.share(FraudCategory::CycleDetected), 75.0);
    assert_eq!(counters.share(FraudCategory::Structuring), 0.0);
}

#[test]
fn partial_counter_blob_keeps_missing_categories() {
    let counters: PatternCounters = serde_json::from_str(r#"{"SMURFING": 4}"#).unwrap();
    assert_eq!(counters.count(FraudCategory::Smurfing), 4);
    assert_eq!(counters.count(FraudCategory::CycleDetected), 0);
    assert_eq!(counters.iter().count(), FraudCategory::ALL.len());
}

// ── Blacklist ─────────────────────────────────────────────────────────

#[test]
fn registry_add_is_idempotent() {
    let mut registry = BlacklistRegistry::new();
    registry.add(&ids(&["A", "B"]));
    registry.add(&ids(&["B", "A"]));

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.snapshot(), ids(&["A", "B"]));
}

#[test]
fn registry_only_grows() {
    let mut registry = BlacklistRegistry::new();
    let mut previous = Vec::new();
    for batch in [vec!["A"], vec![], vec!["B", "A"], vec!["C"], vec!["C", "B"]] {
        registry.add(&ids(&batch));
        let now = registry.snapshot();
        assert!(previous.iter().all(|a| now.contains(a)));
        assert!(now.len() >= previous.len());
        previous = now;
    }
    assert_eq!(previous, ids(&["A", "B", "C"]));
}

#[test]
fn registry_blob_with_duplicates_loads_as_set() {
    let registry: BlacklistRegistry = serde_json::from_str(r#"["A", "B", "A"]"#).unwrap();
    assert_eq!(registry.snapshot(), ids(&["A", "B"]));
}

// ── Stats and risk ────────────────────────────────────────────────────

#[test]
fn record_analysis_contract() {
    let mut stats = Stats::default();
    stats.record_analysis(false, 0);
    stats.record_analysis(true, 3);
    stats.record_analysis(true, 2);

    assert_eq!(stats.total_analyses, 3);
    assert_eq!(stats.frauds_detected, 2);
    assert_eq!(stats.blacklisted_count, 5);
    assert_eq!(stats.current_graph_nodes, 0);
}

#[test]
fn risk_score_law() {
    assert_eq!(Stats::default().risk_score(), 0);

    for total in 1..=40u64 {
        for frauds in 0..=total {
            let stats = Stats { total_analyses: total, frauds_detected: frauds, ..Stats::default() };
            let expected = (frauds as f64 / total as f64 * 100.0).round() as u32;
            assert_eq!(stats.risk_score(), expected, "{frauds}/{total}");
            assert!(stats.risk_score() <= 100);
        }
    }
}

#[test]
fn risk_score_is_bounded_for_inconsistent_counters() {
    let stats = Stats { total_analyses: 2, frauds_detected: 5, ..Stats::default() };
    assert_eq!(stats.risk_score(), 100);
}

#[test]
fn risk_levels_and_detection_rate() {
    assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(59), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
    assert_eq!(RiskLevel::High.label(), "High Risk");

    let stats = Stats { total_analyses: 3, frauds_detected: 1, ..Stats::default() };
    assert_eq!(stats.detection_rate(), 33.3);
    assert_eq!(stats.risk_score(), 33);
}

/// Engine risk read-outs follow the committed stats.
#[tokio::test]
async fn engine_risk_follows_verdicts() {
    let engine = engine(ScriptedClassifier::new(vec![
        Reply::Verdict(Verdict::clean()),
        Reply::Verdict(Verdict::fraud(FraudCategory::Smurfing, &["M"])),
        Reply::Verdict(Verdict::clean()),
        Reply::Verdict(Verdict::clean()),
    ]));
    assert_eq!(engine.risk_score(), 0);

    for _ in 0..4 {
        engine.analyze_batch(vec![tx("M", "N", 10.0)], None).await;
    }

    assert_eq!(engine.risk_score(), 25);
    assert_eq!(engine.risk_level(), RiskLevel::Low);
    assert_eq!(engine.detection_rate(), 25.0);
    assert_eq!(engine.stats().frauds_detected, 1);
}
