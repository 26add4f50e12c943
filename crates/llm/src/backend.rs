//! Chat backend implementation
//!
//! Talks to any OpenAI-compatible REST API. Requests are non-streaming;
//! the classifier and translator both wait for the full completion before
//! acting on it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use translate_agent_config::constants::{endpoints, models, timeouts};
use translate_agent_config::Settings;
use translate_agent_core::llm_types::{
    FinishReason, GenerateRequest, GenerateResponse, TokenUsage,
};
use translate_agent_core::LanguageModel;

use crate::LlmError;

/// Configuration for the OpenAI-compatible backend
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API endpoint (OpenAI: https://api.openai.com/v1, or any compatible server)
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Model used when a request does not name one
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
    /// Organization ID (OpenAI specific)
    pub organization: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::OPENAI_DEFAULT.to_string(),
            api_key: String::new(),
            model: models::CHAT_DEFAULT.to_string(),
            timeout: Duration::from_secs(timeouts::LLM_REQUEST_SECS),
            organization: None,
        }
    }
}

impl OpenAIConfig {
    /// Create config for OpenAI
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Create config for a local OpenAI-compatible server (vLLM, Ollama, etc.)
    pub fn local(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: "not-needed".to_string(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Build config from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.api.endpoint.clone(),
            api_key: settings.api.api_key.clone(),
            model: settings.translation.model.clone(),
            timeout: Duration::from_secs(settings.api.timeout_seconds),
            organization: settings.api.organization.clone(),
        }
    }
}

/// OpenAI-compatible backend
///
/// Works with:
/// - OpenAI (gpt-4o family)
/// - vLLM
/// - Local servers with OpenAI-compatible APIs
pub struct OpenAIBackend {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIBackend {
    /// Create new backend
    ///
    /// A missing API key is not fatal here; strict environments reject it at
    /// configuration validation, and elsewhere the upstream 401 surfaces on
    /// the first call.
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() && !config.endpoint.starts_with("http://localhost") {
            tracing::warn!(
                endpoint = %config.endpoint,
                "No API key configured; requests will be rejected upstream"
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the full API URL for chat completions
    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    /// Build request headers
    fn build_headers(&self) -> reqwest::header::HeaderMap {
        use reqwest::header::HeaderValue;

        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Bearer {}", self.config.api_key);
        if let Ok(val) = HeaderValue::from_str(&auth_value) {
            headers.insert(reqwest::header::AUTHORIZATION, val);
        }

        if let Some(ref org) = self.config.organization {
            if let Ok(val) = HeaderValue::from_str(org) {
                headers.insert("OpenAI-Organization", val);
            }
        }

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        headers
    }

    /// Run a chat completion and map the wire response
    async fn chat(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let start = std::time::Instant::now();

        let messages: Vec<WireMessage> = request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect();

        let wire = ChatRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: Some(false),
        };

        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers())
            .json(&wire)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(model = %wire.model, latency_ms, "chat completion finished");

        Ok(GenerateResponse {
            text: choice.message.content,
            finish_reason: match choice.finish_reason.as_deref() {
                Some("length") => FinishReason::Length,
                Some("content_filter") => FinishReason::ContentFilter,
                Some("stop") | None => FinishReason::Stop,
                Some(_) => FinishReason::Other,
            },
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            latency_ms,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAIBackend {
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> translate_agent_core::Result<GenerateResponse> {
        self.chat(request).await.map_err(Into::into)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.config.endpoint.trim_end_matches('/'));
        self.client
            .get(&url)
            .headers(self.build_headers())
            .timeout(Duration::from_secs(timeouts::HEALTH_PROBE_SECS))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Wire types for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OpenAIConfig::default();
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_config_openai() {
        let config = OpenAIConfig::openai("sk-xxx", "gpt-4o");
        assert_eq!(config.api_key, "sk-xxx");
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn test_config_local() {
        let config = OpenAIConfig::local("http://localhost:8000/v1", "llama-3");
        assert_eq!(config.endpoint, "http://localhost:8000/v1");
        assert_eq!(config.api_key, "not-needed");
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = Settings::default();
        settings.api.api_key = "sk-test".to_string();
        settings.translation.model = "gpt-4o".to_string();

        let config = OpenAIConfig::from_settings(&settings);
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
    }

    #[test]
    fn test_backend_creation() {
        // Local endpoint works without an API key
        let config = OpenAIConfig::local("http://localhost:8000", "test");
        assert!(OpenAIBackend::new(config).is_ok());

        // Remote endpoint without a key still builds; the upstream rejects
        let config = OpenAIConfig::default();
        assert!(OpenAIBackend::new(config).is_ok());

        // With API key it works
        let config = OpenAIConfig::openai("sk-xxx", "gpt-4o-mini");
        assert!(OpenAIBackend::new(config).is_ok());
    }

    #[test]
    fn test_chat_url() {
        let config = OpenAIConfig::openai("sk-xxx", "gpt-4o-mini");
        let backend = OpenAIBackend::new(config).unwrap();
        assert_eq!(
            backend.chat_url(),
            "https://api.openai.com/v1/chat/completions"
        );

        // Trailing slashes collapse
        let mut config = OpenAIConfig::openai("sk-xxx", "gpt-4o-mini");
        config.endpoint = "https://api.openai.com/v1/".to_string();
        let backend = OpenAIBackend::new(config).unwrap();
        assert_eq!(
            backend.chat_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            max_tokens: Some(100),
            temperature: Some(0.1),
            stream: Some(false),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("gpt-4o-mini"));
        assert!(json.contains("Hello"));
        assert!(json.contains("max_tokens"));
    }

    #[test]
    fn test_request_omits_unset_options() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![],
            max_tokens: None,
            temperature: None,
            stream: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "こんにちは"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25}
        }"#;

        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "こんにちは");
        assert_eq!(parsed.usage.as_ref().unwrap().total_tokens, 25);
    }

    #[test]
    fn test_response_parsing_without_usage() {
        let json = r#"{
            "choices": [{
                "message": {"role": "assistant", "content": "ok"},
                "finish_reason": null
            }]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.usage.is_none());
        assert!(parsed.choices[0].finish_reason.is_none());
    }
}
