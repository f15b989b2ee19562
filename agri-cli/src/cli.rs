use agri_core::{
    Config, ForwardError, PredictionResponse, WeatherQuery, WeatherResolver,
    error::START_HINT,
    provider_from_config, server,
    weather::{DEFAULT_SUGGESTION_LIMIT, suggest},
};
use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use std::{fs, path::PathBuf};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "agri", version, about = "Crop-yield prediction front end")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to listen on, e.g. "0.0.0.0:3000".
        #[arg(long)]
        bind: Option<String>,

        /// Base URL of the ML prediction service.
        #[arg(long)]
        ml_service_url: Option<String>,
    },

    /// Write the config file. Values not given as flags are asked for interactively.
    Configure {
        #[arg(long)]
        ml_service_url: Option<String>,

        #[arg(long)]
        bind: Option<String>,

        /// Prediction request timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show seasonal weather for a city or a coordinate pair.
    Weather {
        /// City name.
        city: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List city name suggestions.
    Cities {
        /// Part of a city name.
        query: String,

        #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
    },

    /// Send a prediction payload (JSON file) to the ML service.
    Predict {
        /// Path to a JSON file with crop, soil, weather and season fields.
        payload: PathBuf,
    },
}

impl Cli {
    /// Default log level when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        match self.command {
            Command::Serve { .. } => "info",
            _ => "warn",
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve {
                bind,
                ml_service_url,
            } => {
                let mut config = Config::load_with_env()?;
                if let Some(bind) = bind {
                    config.bind_addr = bind;
                }
                if let Some(url) = ml_service_url {
                    config.ml_service_url = url;
                }

                server::serve(&config).await
            }
            Command::Configure {
                ml_service_url,
                bind,
                timeout,
            } => configure(ml_service_url, bind, timeout),
            Command::Weather { city, lat, lon } => {
                let request = agri_core::WeatherRequest {
                    city,
                    latitude: lat,
                    longitude: lon,
                };
                let query = WeatherQuery::try_from(request)
                    .map_err(|e| anyhow!("{e}.\nHint: pass a city name, or both --lat and --lon."))?;

                let result = WeatherResolver::default().resolve(&query);
                println!("{}", result.city);
                println!("  Temperature: {:.1} °C", result.temperature);
                println!("  Rainfall:    {} mm", result.rainfall);
                println!("  Humidity:    {} %", result.humidity);
                println!("  Source:      {}", result.source);
                Ok(())
            }
            Command::Cities { query, limit } => {
                let cities = suggest(&query, limit);
                if cities.is_empty() {
                    println!("No cities match '{query}'.");
                }
                for city in cities {
                    println!("{city}");
                }
                Ok(())
            }
            Command::Predict { payload } => predict(payload).await,
        }
    }
}

fn configure(
    ml_service_url: Option<String>,
    bind: Option<String>,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.ml_service_url = match ml_service_url {
        Some(url) => url,
        None => Text::new("Prediction service URL:")
            .with_default(&config.ml_service_url)
            .prompt()?,
    };
    config.bind_addr = match bind {
        Some(bind) => bind,
        None => Text::new("Listen address:")
            .with_default(&config.bind_addr)
            .prompt()?,
    };
    config.request_timeout_secs = match timeout {
        Some(secs) => secs,
        None => CustomType::<u64>::new("Prediction timeout (seconds):")
            .with_default(config.request_timeout_secs)
            .with_error_message("Please enter a whole number of seconds")
            .prompt()?,
    };

    // Reject an unusable address before it lands on disk.
    config.socket_addr()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn predict(path: PathBuf) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read payload file: {}", path.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Payload file is not valid JSON: {}", path.display()))?;

    let config = Config::load_with_env()?;
    let provider = provider_from_config(&config)?;

    let body = match provider.predict(&payload).await {
        Ok(body) => body,
        Err(e @ ForwardError::Unavailable { .. }) => {
            return Err(anyhow!("{e}\nHint: {START_HINT}"));
        }
        Err(ForwardError::Upstream { status, detail }) => {
            return Err(anyhow!("Prediction service returned {status}: {detail}"));
        }
        Err(e) => return Err(e.into()),
    };

    let prediction: PredictionResponse = serde_json::from_value(body)
        .context("Prediction service response did not have the expected shape")?;

    println!("Predicted yield: {:.2} tonnes/hectare", prediction.predicted_yield);
    println!("Confidence:      {:.0}%", prediction.confidence);

    if !prediction.recommendations.is_empty() {
        println!("\nRecommendations:");
        for item in &prediction.recommendations {
            println!("  - {item}");
        }
    }
    if !prediction.risk_factors.is_empty() {
        println!("\nRisk factors:");
        for item in &prediction.risk_factors {
            println!("  - {item}");
        }
    }

    Ok(())
}
