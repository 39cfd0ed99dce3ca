//! CLI utilities for binaries
//!
//! Resolves which configuration file a binary should read.

use std::path::PathBuf;
use swap_quote::infrastructure::config::{QuoteFormConfig, Result};

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Quote form configuration (config/quote_form.yaml)
    QuoteForm,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::QuoteForm => "config/quote_form.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        "QUOTE_FORM_CONFIG_PATH"
    }
}

/// Load configuration path from environment or use default
///
/// A custom path always wins over the environment.
///
/// # Examples
/// ```
/// use swap_quote_form::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::QuoteForm);
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    if let ConfigType::Custom(path) = &config_type {
        return PathBuf::from(path);
    }

    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Resolve the path and load the configuration
///
/// The first command line argument, if any, is used as a custom path.
pub fn load_config() -> Result<QuoteFormConfig> {
    let config_type = match std::env::args().nth(1) {
        Some(path) => ConfigType::Custom(path),
        None => ConfigType::QuoteForm,
    };

    QuoteFormConfig::load(load_config_from_env(config_type))
}
