//! Shared test doubles for the classifier and session store seams.
#![allow(dead_code)]

use async_trait::async_trait;
use fraudnets_core::{
    classifier::{AnalyzeRequest, Classifier, SampleBatch, SampleSource, Verdict},
    config::DashboardConfig,
    engine::DashboardEngine,
    error::{EngineError, EngineResult},
    sample::{SamplePattern, SyntheticSampleSource},
    session::Session,
    snapshot::SessionSnapshot,
    store::{MemorySessionStore, SessionStore},
    transaction::RawTransaction,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

pub enum Reply {
    Verdict(Verdict),
    Fail(String),
}

/// Answers from a queue; a clean verdict once the queue runs dry.
/// Records every request it receives.
#[derive(Default)]
pub struct ScriptedClassifier {
    replies:      Mutex<VecDeque<Reply>>,
    pub requests: Mutex<Vec<AnalyzeRequest>>,
}

impl ScriptedClassifier {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies:  Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn always_clean() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn analyze(&self, request: &AnalyzeRequest) -> EngineResult<Verdict> {
        self.requests.lock().push(request.clone());
        match self.replies.lock().pop_front() {
            Some(Reply::Verdict(v)) => Ok(v),
            Some(Reply::Fail(reason)) => Err(EngineError::ClassifierUnavailable(reason)),
            None => Ok(Verdict::clean()),
        }
    }
}

/// Parks every request until `release` is notified. `entered` fires
/// as soon as a request arrives, so a test knows the cycle is in flight.
pub struct GatedClassifier {
    pub entered: Notify,
    pub release: Notify,
    verdict:     Verdict,
}

impl GatedClassifier {
    pub fn new(verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
            verdict,
        })
    }
}

#[async_trait]
impl Classifier for GatedClassifier {
    async fn analyze(&self, _request: &AnalyzeRequest) -> EngineResult<Verdict> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.verdict.clone())
    }
}

pub struct DownSampleSource;

#[async_trait]
impl SampleSource for DownSampleSource {
    async fn generate_sample(&self, _pattern: Option<SamplePattern>) -> EngineResult<SampleBatch> {
        Err(EngineError::ClassifierUnavailable("connection refused".into()))
    }
}

/// Loads nothing and fails every write.
pub struct BrokenStore;

impl SessionStore for BrokenStore {
    fn load(&self, _username: &str) -> EngineResult<Option<SessionSnapshot>> {
        Err(EngineError::Other(anyhow::anyhow!("disk unavailable")))
    }

    fn save(&self, _username: &str, _snapshot: &SessionSnapshot) -> EngineResult<()> {
        Err(EngineError::Other(anyhow::anyhow!("disk full")))
    }

    fn clear(&self, _username: &str) -> EngineResult<()> {
        Err(EngineError::Other(anyhow::anyhow!("disk unavailable")))
    }

    fn record_login(&self, _session: &Session) -> EngineResult<()> {
        Err(EngineError::Other(anyhow::anyhow!("disk unavailable")))
    }
}

pub fn tx(sender: &str, receiver: &str, amount: f64) -> RawTransaction {
    RawTransaction::new(sender, receiver, amount)
}

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn login(
    username:   &str,
    classifier: Arc<dyn Classifier>,
    store:      Arc<dyn SessionStore>,
) -> DashboardEngine {
    init_logging();
    DashboardEngine::login(
        username,
        DashboardConfig::default_test(),
        store,
        classifier,
        Arc::new(SyntheticSampleSource::new(0x5EED)),
    )
    .expect("login")
}

pub fn engine(classifier: Arc<dyn Classifier>) -> DashboardEngine {
    login("alice", classifier, Arc::new(MemorySessionStore::new()))
}
