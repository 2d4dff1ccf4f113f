//! HTTP client for the classification service.
//!
//! Implements both `Classifier` (`POST /analyze`) and `SampleSource`
//! (`POST /demo/generate-sample`), plus the read-only polling endpoints.

use crate::{
    classifier::{AnalyzeRequest, Classifier, SampleBatch, SampleSource, Verdict},
    config::DashboardConfig,
    error::{EngineError, EngineResult},
    graph::GraphModel,
    sample::SamplePattern,
    stats::Stats,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct HttpClassifier {
    base_url: String,
    http:     reqwest::Client,
}

impl HttpClassifier {
    pub fn new(config: &DashboardConfig) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Connect failures and timeouts mean the service is down, which the
    /// engine reports differently from a malformed exchange.
    fn send_error(endpoint: &str, error: reqwest::Error) -> EngineError {
        if error.is_connect() || error.is_timeout() {
            EngineError::ClassifierUnavailable(format!("{endpoint}: {error}"))
        } else {
            EngineError::Transport(error)
        }
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, resp: reqwest::Response) -> EngineResult<T> {
        let status = resp.status();
        if !status.is_success() {
            return Err(EngineError::ClassifierStatus {
                endpoint: endpoint.to_string(),
                status:   status.as_u16(),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    /// `GET /stats`, for the polling variant.
    pub async fn fetch_stats(&self) -> EngineResult<Stats> {
        let resp = self
            .http
            .get(self.url("/stats"))
            .send()
            .await
            .map_err(|e| Self::send_error("/stats", e))?;
        Self::decode("/stats", resp).await
    }

    /// `GET /graph`, for the polling variant.
    pub async fn fetch_graph(&self) -> EngineResult<GraphModel> {
        let resp = self
            .http
            .get(self.url("/graph"))
            .send()
            .await
            .map_err(|e| Self::send_error("/graph", e))?;
        Self::decode("/graph", resp).await
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn analyze(&self, request: &AnalyzeRequest) -> EngineResult<Verdict> {
        let resp = self
            .http
            .post(self.url("/analyze"))
            .json(request)
            .send()
            .await
            .map_err(|e| Self::send_error("/analyze", e))?;
        let verdict: Verdict = Self::decode("/analyze", resp).await?;
        log::debug!(
            "Verdict: is_fraud={} type={:?} flagged={}",
            verdict.is_fraud,
            verdict.fraud_type,
            verdict.flagged_accounts.len()
        );
        Ok(verdict)
    }
}

#[async_trait]
impl SampleSource for HttpClassifier {
    async fn generate_sample(&self, pattern: Option<SamplePattern>) -> EngineResult<SampleBatch> {
        let mut req = self.http.post(self.url("/demo/generate-sample"));
        if let Some(p) = pattern {
            req = req.query(&[("pattern", p.as_str())]);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| Self::send_error("/demo/generate-sample", e))?;
        Self::decode("/demo/generate-sample", resp).await
    }
}
