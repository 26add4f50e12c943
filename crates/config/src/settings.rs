//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{endpoints, languages, models, sampling, timeouts, voices};
use crate::ConfigError;

/// Runtime environment enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream OpenAI-compatible API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Speech-to-text configuration
    #[serde(default)]
    pub stt: SttConfig,

    /// Text-to-speech configuration
    #[serde(default)]
    pub tts: TtsConfig,

    /// Translation and classification configuration
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Session lifecycle configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Validate all settings sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_api()?;
        self.validate_speech()?;
        self.validate_translation()?;
        self.validate_session()?;
        Ok(())
    }

    /// Validate server configuration
    pub fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        if self.server.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_connections".to_string(),
                message: "must allow at least one connection".to_string(),
            });
        }

        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        if self.server.cors_enabled && self.server.cors_origins.is_empty() {
            if self.environment.is_strict() {
                return Err(ConfigError::InvalidValue {
                    field: "server.cors_origins".to_string(),
                    message: "CORS is enabled but no origins are configured".to_string(),
                });
            }
            tracing::warn!("CORS enabled with no configured origins; allowing any origin");
        }

        Ok(())
    }

    /// Validate upstream API configuration
    pub fn validate_api(&self) -> Result<(), ConfigError> {
        if self.api.endpoint.is_empty() || !self.api.endpoint.starts_with("http") {
            return Err(ConfigError::InvalidValue {
                field: "api.endpoint".to_string(),
                message: format!("expected an http(s) URL, got '{}'", self.api.endpoint),
            });
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        if self.api.api_key.is_empty() {
            if self.environment.is_production() {
                return Err(ConfigError::InvalidValue {
                    field: "api.api_key".to_string(),
                    message: "API key is required in production".to_string(),
                });
            }
            tracing::warn!("API key not configured; upstream calls will fail");
        }

        Ok(())
    }

    /// Validate speech configuration
    pub fn validate_speech(&self) -> Result<(), ConfigError> {
        if self.stt.model.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "stt.model".to_string(),
                message: "model identifier must not be empty".to_string(),
            });
        }

        if self.tts.model.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tts.model".to_string(),
                message: "model identifier must not be empty".to_string(),
            });
        }

        if !matches!(self.tts.format.as_str(), "mp3" | "wav") {
            return Err(ConfigError::InvalidValue {
                field: "tts.format".to_string(),
                message: format!("expected 'mp3' or 'wav', got '{}'", self.tts.format),
            });
        }

        if !voices::CATALOGUE.contains(&self.tts.voice.as_str()) {
            tracing::warn!(
                "Voice '{}' is not in the known catalogue {:?}",
                self.tts.voice,
                voices::CATALOGUE
            );
        }

        Ok(())
    }

    /// Validate translation configuration
    pub fn validate_translation(&self) -> Result<(), ConfigError> {
        if self.translation.model.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "translation.model".to_string(),
                message: "model identifier must not be empty".to_string(),
            });
        }

        for (field, code) in [
            ("translation.default_source", &self.translation.default_source),
            ("translation.default_target", &self.translation.default_target),
        ] {
            if !languages::SUPPORTED.contains(&code.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!(
                        "unsupported language code '{}', expected one of {:?}",
                        code,
                        languages::SUPPORTED
                    ),
                });
            }
        }

        if self.translation.default_source == self.translation.default_target {
            tracing::warn!(
                "Default language pair is the identity ({} -> {}); translation will pass text through",
                self.translation.default_source,
                self.translation.default_target
            );
        }

        Ok(())
    }

    /// Validate session configuration
    pub fn validate_session(&self) -> Result<(), ConfigError> {
        if self.session.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_sessions".to_string(),
                message: "must allow at least one session".to_string(),
            });
        }

        if self.session.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        if self.session.cleanup_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.cleanup_interval_seconds".to_string(),
                message: "cleanup interval must be non-zero".to_string(),
            });
        }

        if self.session.cleanup_interval_seconds > self.session.timeout_seconds {
            tracing::warn!(
                "Cleanup interval ({}s) exceeds session timeout ({}s); expired sessions may linger",
                self.session.cleanup_interval_seconds,
                self.session.timeout_seconds
            );
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum concurrent connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_connections() -> usize {
    1000
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_connections: default_max_connections(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            // Empty by default; origins must be listed explicitly for
            // staging and production
            cors_origins: Vec::new(),
        }
    }
}

/// Upstream OpenAI-compatible API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_endpoint")]
    pub endpoint: String,

    /// API key (falls back to the OPENAI_API_KEY environment variable)
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Optional organization header
    #[serde(default)]
    pub organization: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_endpoint() -> String {
    endpoints::OPENAI_DEFAULT.to_string()
}

fn default_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

fn default_api_timeout() -> u64 {
    timeouts::LLM_REQUEST_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_api_endpoint(),
            api_key: default_api_key(),
            organization: None,
            timeout_seconds: default_api_timeout(),
        }
    }
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Transcription model identifier
    #[serde(default = "default_stt_model")]
    pub model: String,

    /// Transcription request timeout in seconds
    #[serde(default = "default_stt_timeout")]
    pub timeout_seconds: u64,
}

fn default_stt_model() -> String {
    models::STT_DEFAULT.to_string()
}
fn default_stt_timeout() -> u64 {
    timeouts::STT_REQUEST_SECS
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: default_stt_model(),
            timeout_seconds: default_stt_timeout(),
        }
    }
}

/// Text-to-speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Synthesis model identifier
    #[serde(default = "default_tts_model")]
    pub model: String,

    /// Voice used when a request does not name one
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Audio container format, "mp3" or "wav"
    #[serde(default = "default_audio_format")]
    pub format: String,

    /// Synthesis request timeout in seconds
    #[serde(default = "default_tts_timeout")]
    pub timeout_seconds: u64,
}

fn default_tts_model() -> String {
    models::TTS_DEFAULT.to_string()
}
fn default_voice() -> String {
    voices::DEFAULT.to_string()
}
fn default_audio_format() -> String {
    "mp3".to_string()
}
fn default_tts_timeout() -> u64 {
    timeouts::TTS_REQUEST_SECS
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            model: default_tts_model(),
            voice: default_voice(),
            format: default_audio_format(),
            timeout_seconds: default_tts_timeout(),
        }
    }
}

/// Translation and classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Chat model used for classification and translation
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Default source language for new sessions
    #[serde(default = "default_source_language")]
    pub default_source: String,

    /// Default target language for new sessions
    #[serde(default = "default_target_language")]
    pub default_target: String,

    /// Sampling temperature for translation requests
    #[serde(default = "default_translate_temperature")]
    pub temperature: f32,
}

fn default_chat_model() -> String {
    models::CHAT_DEFAULT.to_string()
}
fn default_source_language() -> String {
    "vi".to_string()
}
fn default_target_language() -> String {
    "ja".to_string()
}
fn default_translate_temperature() -> f32 {
    sampling::TRANSLATE_TEMPERATURE
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            default_source: default_source_language(),
            default_target: default_target_language(),
            temperature: default_translate_temperature(),
        }
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of live sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle seconds before a session expires
    #[serde(default = "default_session_timeout")]
    pub timeout_seconds: u64,

    /// Interval between cleanup sweeps in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

fn default_max_sessions() -> usize {
    1000
}
fn default_session_timeout() -> u64 {
    1800
}
fn default_cleanup_interval() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            timeout_seconds: default_session_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (TRANSLATE_AGENT_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("TRANSLATE_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.translation.default_source, "vi");
        assert_eq!(settings.translation.default_target, "ja");
        assert_eq!(settings.translation.model, "gpt-4o-mini");
        assert_eq!(settings.stt.model, "gpt-4o-mini-transcribe");
        assert_eq!(settings.tts.model, "gpt-4o-mini-tts");
        assert_eq!(settings.tts.voice, "alloy");
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();

        // Port cannot be 0
        settings.server.port = 0;
        assert!(settings.validate_server().is_err());
        settings.server.port = 8080;

        // max_connections cannot be 0
        settings.server.max_connections = 0;
        assert!(settings.validate_server().is_err());
        settings.server.max_connections = 1000;

        // timeout cannot be 0
        settings.server.timeout_seconds = 0;
        assert!(settings.validate_server().is_err());
        settings.server.timeout_seconds = 30;

        assert!(settings.validate_server().is_ok());
    }

    #[test]
    fn test_strict_cors_requires_origins() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Staging;
        settings.server.cors_enabled = true;
        settings.server.cors_origins.clear();

        assert!(settings.validate_server().is_err());

        settings
            .server
            .cors_origins
            .push("https://app.example.com".to_string());
        assert!(settings.validate_server().is_ok());
    }

    #[test]
    fn test_production_requires_api_key() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.server.cors_enabled = false;
        settings.api.api_key = String::new();

        assert!(settings.validate_api().is_err());

        settings.api.api_key = "sk-test".to_string();
        assert!(settings.validate_api().is_ok());
    }

    #[test]
    fn test_development_allows_missing_api_key() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Development;
        settings.api.api_key = String::new();

        assert!(settings.validate_api().is_ok());
    }

    #[test]
    fn test_api_endpoint_validation() {
        let mut settings = Settings::default();

        settings.api.endpoint = String::new();
        assert!(settings.validate_api().is_err());

        settings.api.endpoint = "not-a-url".to_string();
        assert!(settings.validate_api().is_err());

        settings.api.endpoint = "http://localhost:11434/v1".to_string();
        assert!(settings.validate_api().is_ok());
    }

    #[test]
    fn test_translation_language_codes() {
        let mut settings = Settings::default();

        settings.translation.default_target = "xx".to_string();
        assert!(settings.validate_translation().is_err());

        settings.translation.default_target = "en".to_string();
        assert!(settings.validate_translation().is_ok());
    }

    #[test]
    fn test_tts_format_validation() {
        let mut settings = Settings::default();

        settings.tts.format = "ogg".to_string();
        assert!(settings.validate_speech().is_err());

        settings.tts.format = "wav".to_string();
        assert!(settings.validate_speech().is_ok());
    }

    #[test]
    fn test_session_validation() {
        let mut settings = Settings::default();

        settings.session.max_sessions = 0;
        assert!(settings.validate_session().is_err());
        settings.session.max_sessions = 1000;

        settings.session.cleanup_interval_seconds = 0;
        assert!(settings.validate_session().is_err());
        settings.session.cleanup_interval_seconds = 60;

        assert!(settings.validate_session().is_ok());
    }

    #[test]
    fn test_environment_strictness() {
        assert!(!RuntimeEnvironment::Development.is_strict());
        assert!(RuntimeEnvironment::Staging.is_strict());
        assert!(RuntimeEnvironment::Production.is_strict());
        assert!(RuntimeEnvironment::Production.is_production());
        assert!(!RuntimeEnvironment::Staging.is_production());
    }
}
