pub mod constants;

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::domain::amount::MAX_DECIMALS;
use constants::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Quote form configuration
///
/// Every field has a default, so an empty or missing file yields the
/// built-in WETH/DAI mainnet setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteFormConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub pair: PairConfig,

    /// Quiescence window before a typed amount is quoted
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log file used by the terminal form
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// API key from .env (not in YAML)
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// The single token pair being quoted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    #[serde(default = "default_taker")]
    pub taker_address: String,
    #[serde(default = "default_sell_token")]
    pub sell_token: String,
    #[serde(default = "default_sell_symbol")]
    pub sell_symbol: String,
    #[serde(default = "default_buy_token")]
    pub buy_token: String,
    #[serde(default = "default_buy_symbol")]
    pub buy_symbol: String,
    /// Decimal places shared by both tokens
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            taker_address: default_taker(),
            sell_token: default_sell_token(),
            sell_symbol: default_sell_symbol(),
            buy_token: default_buy_token(),
            buy_symbol: default_buy_symbol(),
            decimals: default_decimals(),
        }
    }
}

impl PairConfig {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("taker_address", &self.taker_address),
            ("sell_token", &self.sell_token),
            ("buy_token", &self.buy_token),
        ] {
            parse_address(name, value)?;
        }

        if self.sell_token.eq_ignore_ascii_case(&self.buy_token) {
            return Err(ConfigError::ValidationError(
                "sell_token and buy_token must differ".to_string(),
            ));
        }

        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::ValidationError(format!(
                "decimals must be at most {}",
                MAX_DECIMALS
            )));
        }

        Ok(())
    }
}

fn parse_address(name: &str, value: &str) -> Result<Address> {
    if !value.starts_with("0x") || value.len() != 42 {
        return Err(ConfigError::ValidationError(format!(
            "{} must be a valid Ethereum address (0x followed by 40 hex characters)",
            name
        )));
    }
    Address::from_str(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid address: {}", name, e)))
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_taker() -> String {
    DEFAULT_TAKER.to_string()
}

fn default_sell_token() -> String {
    WETH_MAINNET.to_string()
}

fn default_sell_symbol() -> String {
    "WETH".to_string()
}

fn default_buy_token() -> String {
    DAI_MAINNET.to_string()
}

fn default_buy_symbol() -> String {
    "DAI".to_string()
}

fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "quote_form.log".to_string()
}

impl Default for QuoteFormConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            pair: PairConfig::default(),
            debounce_ms: default_debounce_ms(),
            log_level: default_log_level(),
            log_file: default_log_file(),
            api_key: None,
        }
    }
}

impl QuoteFormConfig {
    /// Load configuration from a YAML file and .env
    ///
    /// A missing file is not an error: the defaults are used instead.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(config_path)?;

        // Load .env file
        dotenv::dotenv().ok(); // Don't fail if .env doesn't exist

        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    /// Read a YAML file without touching the environment. A missing file yields the defaults.
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let yaml_content = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&yaml_content)
    }

    /// Parse YAML content without touching the environment
    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("ZEROX_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key.trim().to_string());
            }
        }

        if let Ok(url) = std::env::var("ZEROX_API_URL") {
            info!("Overriding API base URL from environment variable");
            self.api.base_url = url;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(
                "api.base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        self.pair.validate()?;

        if self.debounce_ms > 10_000 {
            return Err(ConfigError::ValidationError(
                "debounce_ms must be at most 10000".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(
                format!("log_level must be one of: {}", valid_levels.join(", ")),
            ));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  API base URL: {}", self.api.base_url);
        info!("  API key: {}", if self.api_key.is_some() { "set" } else { "not set" });
        info!("  Request timeout: {} seconds", self.api.request_timeout_secs);
        info!(
            "  Pair: {} ({}) -> {} ({})",
            self.pair.sell_symbol, self.pair.sell_token, self.pair.buy_symbol, self.pair.buy_token
        );
        info!("  Decimals: {}", self.pair.decimals);
        info!("  Debounce: {} ms", self.debounce_ms);
        info!("  Log level: {}", self.log_level);
    }
}
