//! HTTP routes.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{ApiError, PREDICTION_FAILED, WEATHER_FAILED},
    model::{CitySuggestions, HealthReport, WeatherRequest, WeatherResult},
    provider::PredictionProvider,
    weather::{DEFAULT_SUGGESTION_LIMIT, WeatherResolver, suggest},
};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<WeatherResolver>,
    pub provider: Arc<dyn PredictionProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn PredictionProvider>) -> Self {
        Self {
            resolver: Arc::new(WeatherResolver::default()),
            provider,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/weather", get(weather_by_query).post(weather_by_body))
        .route("/api/predict", post(predict))
        .route("/api/cities", get(cities))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn weather_by_body(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WeatherResult>, ApiError> {
    let request: WeatherRequest = serde_json::from_slice(&body).map_err(|e| ApiError::Malformed {
        message: WEATHER_FAILED,
        reason: e.to_string(),
    })?;

    Ok(Json(state.resolver.resolve_request(request)?))
}

async fn weather_by_query(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<WeatherResult>, ApiError> {
    let request = WeatherRequest {
        city: params.get("city").cloned(),
        latitude: parse_coordinate(&params, "lat")?,
        longitude: parse_coordinate(&params, "lon")?,
    };

    Ok(Json(state.resolver.resolve_request(request)?))
}

fn parse_coordinate(params: &HashMap<String, String>, key: &str) -> Result<Option<f64>, ApiError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse().map(Some).map_err(|_| ApiError::Malformed {
            message: WEATHER_FAILED,
            reason: format!("{key}={raw} is not a number"),
        }),
        None => Ok(None),
    }
}

async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| ApiError::Malformed {
        message: PREDICTION_FAILED,
        reason: e.to_string(),
    })?;

    Ok(Json(state.provider.predict(&payload).await?))
}

async fn cities(Query(params): Query<HashMap<String, String>>) -> Json<CitySuggestions> {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    let limit = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT);

    Json(CitySuggestions {
        cities: suggest(query, limit),
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
        upstream: state.provider.health().await,
    })
}
