//! dashboard-runner: headless driver for the FraudNets dashboard engine.
//!
//! Usage:
//!   dashboard-runner --user alice --cycles 10 --db fraudnets.db
//!   dashboard-runner --user alice --local-samples --seed 7 --export out.csv
//!   dashboard-runner --user alice --ipc-mode
//!   dashboard-runner --remote-summary --api http://127.0.0.1:8000 [--polls 3]

use anyhow::Result;
use fraudnets_core::{
    alerts::Alert,
    classifier::SampleSource,
    client::HttpClassifier,
    config::DashboardConfig,
    cycle::CyclePhase,
    engine::{CycleOutcome, DashboardEngine},
    error::EngineError,
    event::DashboardEvent,
    export::default_export_filename,
    graph::GraphModel,
    patterns::PatternCounters,
    sample::{SamplePattern, SyntheticSampleSource},
    stats::{RiskLevel, Stats},
    store::SqliteSessionStore,
    transaction::{RawTransaction, Transaction},
    types::AccountId,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Simulate {
        #[serde(default = "one")]
        count: u64,
    },
    Analyze {
        transactions: Vec<RawTransaction>,
        #[serde(default)]
        expected_pattern: Option<SamplePattern>,
    },
    Clear,
    Export {
        #[serde(default)]
        path: Option<String>,
    },
    Logout,
    Quit,
}

fn one() -> u64 {
    1
}

#[derive(serde::Serialize)]
struct UiState {
    username:       String,
    session_id:     String,
    phase:          CyclePhase,
    stats:          Stats,
    risk_score:     u32,
    risk_level:     RiskLevel,
    detection_rate: f64,
    next_pattern:   SamplePattern,
    fraud_patterns: PatternCounters,
    blacklisted:    Vec<AccountId>,
    transactions:   Vec<Transaction>,
    alerts:         Vec<Alert>,
    graph:          GraphModel,
    notices:        Vec<DashboardEvent>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let user = arg_value(&args, "--user").unwrap_or("demo");
    let cycles = parse_arg(&args, "--cycles", 5u64);
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let local_samples = has_flag(&args, "--local-samples");

    let mut config = match arg_value(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => {
            let mut config = DashboardConfig::default();
            config.apply_env();
            config
        }
    };
    if let Some(api) = arg_value(&args, "--api") {
        config.api_url = api.trim_end_matches('/').to_string();
    }
    if let Some(db) = arg_value(&args, "--db") {
        config.db_path = db.to_string();
    }
    if has_flag(&args, "--rotate") {
        config.rotate_patterns = true;
    }

    let client = Arc::new(HttpClassifier::new(&config)?);

    if has_flag(&args, "--remote-summary") {
        let polls = parse_arg(&args, "--polls", 0u64);
        return poll_remote_summary(&client, &config, polls).await;
    }

    if !ipc_mode {
        println!("FraudNets dashboard-runner");
        println!("  user:      {user}");
        println!("  api:       {}", config.api_url);
        println!("  db:        {}", config.db_path);
        println!("  samples:   {}", if local_samples { "local" } else { "remote" });
        println!("  rotation:  {}", config.rotate_patterns);
        println!();
    }

    let store = Arc::new(SqliteSessionStore::open(&config.db_path)?);
    let samples: Arc<dyn SampleSource> = if local_samples {
        Arc::new(SyntheticSampleSource::new(seed))
    } else {
        client.clone()
    };
    let engine = DashboardEngine::login(user, config, store, client, samples)?;

    if ipc_mode {
        run_ipc_loop(engine).await?;
        return Ok(());
    }

    for i in 1..=cycles {
        let outcome = engine.run_simulation().await;
        print_outcome(i, &outcome);
    }
    print_summary(&engine);

    if let Some(path) = arg_value(&args, "--export") {
        export(&engine, Some(path));
    }
    Ok(())
}

async fn run_ipc_loop(engine: DashboardEngine) -> Result<()> {
    let mut notices = engine.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                stdout.write_all(format!("{err_json}\n").as_bytes()).await?;
                stdout.flush().await?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Logout => {
                engine.logout();
                let bye = serde_json::json!({ "logged_out": true });
                stdout.write_all(format!("{bye}\n").as_bytes()).await?;
                stdout.flush().await?;
                return Ok(());
            }
            IpcCommand::GetState => {}
            IpcCommand::Simulate { count } => {
                for _ in 0..count {
                    engine.run_simulation().await;
                }
            }
            IpcCommand::Analyze { transactions, expected_pattern } => {
                engine.analyze_batch(transactions, expected_pattern).await;
            }
            IpcCommand::Clear => engine.clear(),
            IpcCommand::Export { path } => export(&engine, path.as_deref()),
        }

        let state = build_ui_state(&engine, engine.take_notices(&mut notices));
        stdout
            .write_all(format!("{}\n", serde_json::to_string(&state)?).as_bytes())
            .await?;
        stdout.flush().await?;
    }
    Ok(())
}

fn build_ui_state(engine: &DashboardEngine, notices: Vec<DashboardEvent>) -> UiState {
    let state = engine.state();
    let risk_score = state.risk_score();
    UiState {
        username:       engine.session().username.clone(),
        session_id:     engine.session().session_id.clone(),
        phase:          engine.phase(),
        stats:          state.stats,
        risk_score,
        risk_level:     RiskLevel::from_score(risk_score),
        detection_rate: state.stats.detection_rate(),
        next_pattern:   SamplePattern::from_index(state.pattern_index),
        blacklisted:    state.blacklist.snapshot(),
        transactions:   state.history.iter().cloned().collect(),
        alerts:         state.alerts.iter().cloned().collect(),
        fraud_patterns: state.patterns,
        graph:          state.graph,
        notices,
    }
}

fn export(engine: &DashboardEngine, path: Option<&str>) {
    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_export_filename(chrono::Utc::now().date_naive())));
    match engine.export_to(&path) {
        Ok(rows) => log::info!("Exported {rows} transactions to {}", path.display()),
        Err(EngineError::NothingToExport) => log::warn!("Nothing to export"),
        Err(e) => log::warn!("Export failed: {e}"),
    }
}

fn print_outcome(i: u64, outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Committed(r) => {
            let verdict = match (r.is_fraud, r.fraud_type) {
                (true, Some(c)) => format!("FRAUD {c} ({} flagged)", r.flagged_accounts.len()),
                (true, None) => format!("FRAUD ({} flagged)", r.flagged_accounts.len()),
                (false, _) => "clean".to_string(),
            };
            let pattern = r.pattern.map(|p| p.as_str()).unwrap_or("-");
            println!("  #{i:<3} {pattern:<12} {:>2} txns  {verdict}", r.batch_size);
        }
        CycleOutcome::Rejected => println!("  #{i:<3} rejected (cycle in flight)"),
        CycleOutcome::Failed { reason } => println!("  #{i:<3} failed: {reason}"),
    }
}

fn print_summary(engine: &DashboardEngine) {
    let state = engine.state();
    let stats = state.stats;

    println!();
    println!("=== SESSION SUMMARY ===");
    println!("  user:            {}", engine.session().username);
    println!("  analyses:        {}", stats.total_analyses);
    println!("  frauds:          {} ({:.1}% flagged)", stats.frauds_detected, stats.detection_rate());
    println!("  blacklisted:     {} events, {} accounts", stats.blacklisted_count, state.blacklist.len());
    println!("  graph:           {} nodes, {} edges", state.graph.nodes.len(), state.graph.edges.len());
    println!("  history:         {} transactions", state.history.len());
    println!("  risk:            {} ({})", state.risk_score(), RiskLevel::from_score(state.risk_score()).label());

    println!();
    println!("=== FRAUD PATTERNS ({} detected) ===", state.patterns.total());
    for (category, count) in state.patterns.iter() {
        println!("  {:<16} {count:>4}  {:>5.1}%", category.label(), state.patterns.share(category));
    }

    if !state.alerts.is_empty() {
        println!();
        println!("=== RECENT ALERTS ===");
        for alert in state.alerts.iter() {
            println!("  [{:?}] {}  {}", alert.severity, alert.timestamp.format("%H:%M:%S"), alert.message);
        }
    }
}

/// One read when auto-refresh is off. Otherwise re-read every
/// `refresh_interval_secs` until Ctrl-C, or `polls` reads if non-zero.
async fn poll_remote_summary(client: &HttpClassifier, config: &DashboardConfig, polls: u64) -> Result<()> {
    let Some(period) = config.poll_interval() else {
        return print_remote_summary(client).await;
    };

    let mut ticker = tokio::time::interval(period);
    let mut done = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A down service is reported and retried on the next tick.
                if let Err(e) = print_remote_summary(client).await {
                    log::warn!("Remote summary failed: {e}");
                }
                done += 1;
                if polls > 0 && done >= polls {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

async fn print_remote_summary(client: &HttpClassifier) -> Result<()> {
    let stats = client.fetch_stats().await?;
    let graph = client.fetch_graph().await?;
    println!("=== REMOTE STATS ===");
    println!("  analyses:     {}", stats.total_analyses);
    println!("  frauds:       {}", stats.frauds_detected);
    println!("  blacklisted:  {}", stats.blacklisted_count);
    println!("  graph:        {} nodes, {} edges", graph.nodes.len(), graph.edges.len());
    println!("  risk:         {}", stats.risk_score());
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
