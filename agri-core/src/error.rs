//! Error types and their translation into JSON error envelopes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Fallback message when a prediction fails without a usable upstream detail.
pub const PREDICTION_FAILED: &str = "Failed to generate prediction";

/// Message for unexpected failures on the weather endpoint.
pub const WEATHER_FAILED: &str = "Failed to fetch weather data";

/// How to bring the prediction service up when it is unreachable.
pub const START_HINT: &str = "Run: cd ml_service && python main.py";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Either city name or coordinates must be provided")]
    InvalidQuery,
}

#[derive(Debug, Error)]
pub enum ForwardError {
    /// The service could not be reached at all.
    #[error(
        "Prediction service is not available at {url}. Please ensure the ML prediction service is running."
    )]
    Unavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service accepted the connection but did not answer in time.
    #[error("Prediction service at {url} did not respond within {timeout:?}.")]
    TimedOut {
        url: String,
        timeout: std::time::Duration,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{detail}")]
    Upstream { status: StatusCode, detail: String },

    #[error("Failed to generate prediction: {0}")]
    Unexpected(String),
}

/// Wire shape of every error leaving the HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Forward(#[from] ForwardError),

    /// A request body or query string that could not be decoded.
    #[error("{message}: {reason}")]
    Malformed {
        message: &'static str,
        reason: String,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Resolve(ResolveError::InvalidQuery) => StatusCode::BAD_REQUEST,
            ApiError::Forward(ForwardError::Unavailable { .. } | ForwardError::TimedOut { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Forward(ForwardError::Upstream { status, .. }) => *status,
            ApiError::Forward(ForwardError::Unexpected(_)) | ApiError::Malformed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            ApiError::Resolve(e) => ErrorEnvelope {
                error: e.to_string(),
                detail: None,
            },
            ApiError::Forward(e @ ForwardError::Unavailable { .. }) => ErrorEnvelope {
                error: e.to_string(),
                detail: Some(START_HINT.to_string()),
            },
            ApiError::Forward(e @ ForwardError::TimedOut { .. }) => ErrorEnvelope {
                error: e.to_string(),
                detail: None,
            },
            ApiError::Forward(ForwardError::Upstream { detail, .. }) => ErrorEnvelope {
                error: detail.clone(),
                detail: None,
            },
            ApiError::Forward(ForwardError::Unexpected(_)) => ErrorEnvelope {
                error: PREDICTION_FAILED.to_string(),
                detail: None,
            },
            ApiError::Malformed { message, .. } => ErrorEnvelope {
                error: (*message).to_string(),
                detail: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Resolve(_) => {}
            ApiError::Forward(ForwardError::Upstream { .. }) => {
                warn!(%status, error = %self, "prediction service returned an error");
            }
            _ => error!(%status, error = %self, "request failed"),
        }

        (status, Json(self.envelope())).into_response()
    }
}
