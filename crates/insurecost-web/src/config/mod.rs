//! Configuration loading for insurecost.
//! Reads insurecost.toml from the current directory or path in INSURECOST_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const CONFIG_ENV: &str = "INSURECOST_CONFIG";
pub const PREDICTOR_URL_ENV: &str = "INSURECOST_PREDICTOR_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String { "127.0.0.1:3000".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_predict_path")]
    pub path: String,
    /// Absent means requests never time out.
    pub timeout_secs: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_predict_path(),
            timeout_secs: None,
        }
    }
}

fn default_base_url()     -> String { "http://127.0.0.1:5000".to_string() }
fn default_predict_path() -> String { "/predict".to_string() }

impl PredictorConfig {
    /// Full URL of the prediction endpoint.
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| anyhow::anyhow!("Invalid predictor endpoint {joined}: {e}"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}


impl Config {
    /// Load configuration from insurecost.toml.
    /// Checks INSURECOST_CONFIG env var first, then current directory.
    /// A missing file falls back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| "insurecost.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&content)?
        } else {
            tracing::warn!(
                "Config file not found: {path}, using defaults. \
                 Copy insurecost.example.toml to insurecost.toml to customise."
            );
            Self::default()
        };

        config.apply_overrides(std::env::var(PREDICTOR_URL_ENV).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply values taken from the environment.
    pub fn apply_overrides(&mut self, predictor_url: Option<String>) {
        if let Some(url) = predictor_url.filter(|u| !u.trim().is_empty()) {
            self.predictor.base_url = url;
        }
    }
}
