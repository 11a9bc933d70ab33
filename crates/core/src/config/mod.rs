//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CEP_*)
//! 2. TOML config file (if CEP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which inbound boundary the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// REST endpoint over HTTP.
    #[default]
    Http,
    /// MCP tool server over stdio.
    Stdio,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CEP_*)
/// 2. TOML config file (if CEP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via CEP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL of the ViaCEP service.
    ///
    /// Set via CEP_VIACEP_BASE_URL environment variable.
    #[serde(default = "default_viacep_base_url")]
    pub viacep_base_url: String,

    /// User-Agent string for provider requests.
    ///
    /// Set via CEP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Provider request timeout in milliseconds.
    ///
    /// Set via CEP_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Address the HTTP boundary binds to.
    ///
    /// Set via CEP_HTTP_ADDR environment variable.
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,

    /// Inbound transport, `http` or `stdio`.
    ///
    /// Set via CEP_TRANSPORT environment variable.
    #[serde(default)]
    pub transport: Transport,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./cep-cache.sqlite")
}

fn default_viacep_base_url() -> String {
    "https://viacep.com.br".into()
}

fn default_user_agent() -> String {
    "cep-cache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            viacep_base_url: default_viacep_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            http_addr: default_http_addr(),
            transport: Transport::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment `load` extracts from.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CEP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("CEP_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate configuration from a figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
