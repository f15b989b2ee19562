use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::PathBuf, time::Duration};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_ML_SERVICE_URL: &str = "ML_SERVICE_URL";
pub const ENV_BIND_ADDR: &str = "AGRI_BIND_ADDR";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "AGRI_REQUEST_TIMEOUT_SECS";
pub const ENV_CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";

/// Service configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// bind_addr = "0.0.0.0:3000"
/// ml_service_url = "http://ml:8000"
/// request_timeout_secs = 20
/// cors_allowed_origins = "http://localhost:3000"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,

    /// Base URL of the prediction service; `/predict` and `/health` are appended.
    pub ml_service_url: String,

    pub request_timeout_secs: u64,

    /// `*` or a comma-separated list of origins.
    pub cors_allowed_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            ml_service_url: DEFAULT_ML_SERVICE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load from disk, then apply environment overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Override fields from environment-style lookups. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_ML_SERVICE_URL) {
            self.ml_service_url = url;
        }
        if let Some(addr) = get(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        if let Some(secs) = get(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = secs.trim().parse().with_context(|| {
                format!("{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got '{secs}'")
            })?;
        }
        if let Some(origins) = get(ENV_CORS_ALLOWED_ORIGINS) {
            self.cors_allowed_origins = origins;
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr.parse().with_context(|| {
            format!(
                "Invalid bind address '{}'.\n\
                 Hint: use host:port, e.g. `{DEFAULT_BIND_ADDR}`.",
                self.bind_addr
            )
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Prediction service base URL without a trailing slash.
    pub fn ml_base_url(&self) -> &str {
        self.ml_service_url.trim_end_matches('/')
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "agri", "agri")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
