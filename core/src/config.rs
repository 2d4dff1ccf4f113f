use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable that overrides `api_url` after loading.
pub const API_URL_ENV: &str = "FRAUDNETS_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the classification service, without trailing slash.
    pub api_url:               String,
    /// Sent as `bank_id` with every analyze request.
    pub bank_id:               String,
    pub request_timeout_ms:    u64,
    /// SQLite file backing the session store. `:memory:` keeps nothing.
    pub db_path:               String,
    /// Request patterns in rotation instead of letting the source choose.
    pub rotate_patterns:       bool,
    /// Polling settings for a presentation layer using GET /stats and GET /graph.
    pub auto_refresh:          bool,
    pub refresh_interval_secs: u64,
    /// Whether the presentation layer should surface notices.
    pub notifications:         bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url:               "http://127.0.0.1:8000".into(),
            bank_id:               "DEMO_BANK".into(),
            request_timeout_ms:    10_000,
            db_path:               "fraudnets.db".into(),
            rotate_patterns:       false,
            auto_refresh:          true,
            refresh_interval_secs: 5,
            notifications:         true,
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Fields missing from the file keep their
    /// defaults. In tests, use `DashboardConfig::default_test()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let mut config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
    }

    /// Period for re-fetching server stats, or `None` when auto-refresh
    /// is off. Never shorter than one second.
    pub fn poll_interval(&self) -> Option<Duration> {
        self.auto_refresh
            .then(|| Duration::from_secs(self.refresh_interval_secs.max(1)))
    }

    /// Config with an in-memory store and pattern rotation on.
    pub fn default_test() -> Self {
        Self {
            db_path:         ":memory:".into(),
            rotate_patterns: true,
            ..Self::default()
        }
    }
}
