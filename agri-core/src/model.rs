use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Tag reported in every [`WeatherResult`].
pub const WEATHER_SOURCE: &str = "Indian City Weather Database";

/// Label echoed back when weather was resolved from coordinates.
pub const CURRENT_LOCATION: &str = "Current Location";

/// Seasonal average conditions for one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityWeatherRecord {
    pub temperature: f64,
    pub rainfall: f64,
    pub humidity: f64,
}

impl CityWeatherRecord {
    pub const fn new(temperature: f64, rainfall: f64, humidity: f64) -> Self {
        Self {
            temperature,
            rainfall,
            humidity,
        }
    }
}

/// Body of `POST /api/weather`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A validated weather lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// Free-text city name, kept exactly as the caller sent it.
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl TryFrom<WeatherRequest> for WeatherQuery {
    type Error = ResolveError;

    fn try_from(value: WeatherRequest) -> Result<Self, Self::Error> {
        if let Some(city) = value.city.filter(|c| !c.trim().is_empty()) {
            return Ok(WeatherQuery::City(city));
        }

        match (value.latitude, value.longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Ok(WeatherQuery::Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(ResolveError::InvalidQuery),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    pub temperature: f64,
    pub rainfall: i64,
    pub humidity: i64,
    pub source: String,
}

impl WeatherResult {
    /// Shape a record for output: one decimal for temperature, whole numbers otherwise.
    pub fn shaped(city: String, record: &CityWeatherRecord) -> Self {
        Self {
            city,
            temperature: (record.temperature * 10.0).round() / 10.0,
            rainfall: record.rainfall.round() as i64,
            humidity: record.humidity.round() as i64,
            source: WEATHER_SOURCE.to_string(),
        }
    }
}

/// What the prediction service returns on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub predicted_yield: f64,
    pub confidence: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySuggestions {
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamHealth {
    pub url: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_loaded: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub upstream: UpstreamHealth,
}
