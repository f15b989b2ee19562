//! Core library for the `agri` crop-yield service.
//!
//! This crate defines:
//! - Configuration and logging setup
//! - Seasonal weather resolution from a bundled city table
//! - Forwarding of prediction requests to the external ML service
//! - The HTTP API that exposes both
//!
//! It is used by `agri-cli`, but can also be embedded in other binaries or services.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod provider;
pub mod server;
pub mod weather;

pub use api::{AppState, router};
pub use config::Config;
pub use error::{ApiError, ForwardError, ResolveError};
pub use model::{PredictionResponse, WeatherQuery, WeatherRequest, WeatherResult};
pub use provider::{PredictionProvider, provider_from_config};
pub use weather::WeatherResolver;
