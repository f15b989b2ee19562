use crate::{
    Config,
    error::{ForwardError, PREDICTION_FAILED},
    model::UpstreamHealth,
    provider::http::HttpPredictionProvider,
};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod http;

/// Message used when the prediction service fails with a body that isn't JSON.
pub const UPSTREAM_UNREADABLE: &str = "ML service error";

/// Anything that can turn a prediction payload into a prediction.
#[async_trait]
pub trait PredictionProvider: Send + Sync + Debug {
    /// Forward `payload` unchanged and return the service's response body unchanged.
    async fn predict(&self, payload: &Value) -> Result<Value, ForwardError>;

    /// Check the service. Never fails; trouble shows up as `reachable: false`.
    async fn health(&self) -> UpstreamHealth;
}

/// Construct the HTTP provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn PredictionProvider>> {
    let provider = HttpPredictionProvider::new(config.ml_base_url(), config.request_timeout())?;
    Ok(Box::new(provider))
}

/// Pick the message to surface from a failed upstream response body.
///
/// FastAPI puts its message in `detail`; validation failures put an array there.
/// Empty, null, `false` and zero details fall back to the generic message.
pub fn upstream_detail(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(detail) if is_blank(detail) => PREDICTION_FAILED.to_string(),
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => PREDICTION_FAILED.to_string(),
        },
        Err(_) => UPSTREAM_UNREADABLE.to_string(),
    }
}

fn is_blank(detail: &Value) -> bool {
    match detail {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}
