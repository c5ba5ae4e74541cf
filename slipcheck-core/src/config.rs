//! Configuration management for slipcheck
//!
//! Loads built-in defaults, optional TOML files and environment variables
//! (after `.env`). Values are read by the binaries and handed explicitly to
//! the provider and the engine.

use crate::apisports::{ApiSportsClient, DEFAULT_BASE_URL};
use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{fmt as log_fmt, EnvFilter};

/// Fallback variable for the provider key
pub const API_KEY_ENV: &str = "API_SPORTS_KEY";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub engine: EngineSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone, Deserialize)]
pub struct ProviderSettings {
    /// API-Sports base URL
    pub base_url: String,
    /// API key sent as `x-apisports-key`
    #[serde(default)]
    pub api_key: Option<String>,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Maximum fixtures fetched at once
    pub max_concurrency: usize,
    /// Per-fixture fetch timeout in seconds
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Listen address of the HTTP server
    pub bind: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    /// Load configuration.
    ///
    /// Sources, lowest priority first: defaults, `config/default`,
    /// `config/local`, `extra_file`, `SLIPCHECK__SECTION__KEY` variables.
    pub fn load(extra_file: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("provider.base_url", DEFAULT_BASE_URL)?
            .set_default("provider.timeout_secs", 15)?
            .set_default("engine.max_concurrency", 4)?
            .set_default("engine.fetch_timeout_secs", 20)?
            .set_default("server.bind", "127.0.0.1:8080")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("SLIPCHECK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        if settings.provider.api_key.as_deref().map_or(true, str::is_empty) {
            settings.provider.api_key = std::env::var(API_KEY_ENV).ok();
        }
        Ok(settings)
    }

    /// Digest of the configuration (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "base_url={} api_key={} max_concurrency={} fetch_timeout={}s bind={}",
            self.provider.base_url,
            if self.provider.api_key.is_some() { "set" } else { "unset" },
            self.engine.max_concurrency,
            self.engine.fetch_timeout_secs,
            self.server.bind
        )
    }
}

impl ProviderSettings {
    /// Copy with per-request overrides applied.
    pub fn with_overrides(&self, base_url: Option<&str>, api_key: Option<&str>) -> Self {
        let mut settings = self.clone();
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            settings.base_url = url.to_string();
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            settings.api_key = Some(key.to_string());
        }
        settings
    }

    /// Build the API-Sports client. Fails without an API key.
    pub fn connect(&self) -> Result<ApiSportsClient> {
        ApiSportsClient::new(
            &self.base_url,
            self.api_key.as_deref().unwrap_or_default(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LoggingSettings {
    /// Initialize the tracing subscriber. Logs go to stderr; `RUST_LOG` wins over `level`.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                log_fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                log_fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
