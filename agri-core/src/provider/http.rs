use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::ForwardError,
    model::UpstreamHealth,
    provider::{PredictionProvider, UPSTREAM_UNREADABLE, upstream_detail},
};

/// Forwards predictions to the Python ML service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPredictionProvider {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl HttpPredictionProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for the prediction service")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send_error(&self, source: reqwest::Error) -> ForwardError {
        if source.is_builder() {
            ForwardError::Unexpected(source.to_string())
        } else if source.is_timeout() {
            ForwardError::TimedOut {
                url: self.base_url.clone(),
                timeout: self.timeout,
                source,
            }
        } else {
            ForwardError::Unavailable {
                url: self.base_url.clone(),
                source,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MlHealth {
    model_loaded: Option<bool>,
}

#[async_trait]
impl PredictionProvider for HttpPredictionProvider {
    async fn predict(&self, payload: &Value) -> Result<Value, ForwardError> {
        let url = format!("{}/predict", self.base_url);

        let res = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = res.status();

        if !status.is_success() {
            // The status is passed on even when the body can't be read.
            let detail = match res.bytes().await {
                Ok(body) => {
                    warn!(
                        %status,
                        body = %truncate_body(&String::from_utf8_lossy(&body)),
                        "prediction service request failed"
                    );
                    upstream_detail(&body)
                }
                Err(e) => {
                    warn!(%status, error = %e, "prediction service error body unreadable");
                    UPSTREAM_UNREADABLE.to_string()
                }
            };
            return Err(ForwardError::Upstream { status, detail });
        }

        let body = res.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.send_error(e)
            } else {
                ForwardError::Unexpected(format!("reading response body: {e}"))
            }
        })?;

        debug!(%status, bytes = body.len(), "prediction service responded");

        serde_json::from_slice(&body)
            .map_err(|e| ForwardError::Unexpected(format!("parsing prediction JSON: {e}")))
    }

    async fn health(&self) -> UpstreamHealth {
        let url = format!("{}/health", self.base_url);

        let model_loaded = match self.http.get(&url).send().await {
            Ok(res) if res.status().is_success() => {
                res.json::<MlHealth>().await.ok().and_then(|h| h.model_loaded)
            }
            Ok(res) => {
                debug!(status = %res.status(), "prediction service health check failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "prediction service unreachable");
                return UpstreamHealth {
                    url: self.base_url.clone(),
                    reachable: false,
                    model_loaded: None,
                };
            }
        };

        UpstreamHealth {
            url: self.base_url.clone(),
            reachable: true,
            model_loaded,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
