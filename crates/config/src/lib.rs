//! Configuration management for the translation agent
//!
//! Supports loading configuration from:
//! - YAML/TOML files
//! - Environment variables (TRANSLATE_AGENT_ prefix)
//! - Runtime overrides
//!
//! Validation strictness follows the runtime environment: development
//! downgrades most problems to warnings, staging and production reject
//! them outright.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, ApiConfig, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    SessionConfig, Settings, SttConfig, TranslationConfig, TtsConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
