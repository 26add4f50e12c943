//! Hosted synthesis backend
//!
//! Sends text to an OpenAI-compatible `/audio/speech` endpoint. Synthesis
//! never fails hard: empty input short-circuits before any upstream call,
//! and upstream failures degrade to empty audio with the degradation
//! recorded in the result's provenance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use translate_agent_config::constants::{endpoints, models, timeouts, voices};
use translate_agent_config::Settings;
use translate_agent_core::outcome::{AudioFormat, Provenance, SpokenAudio};
use translate_agent_core::traits::TextToSpeech;

use crate::PipelineError;

/// Configuration for the hosted speaker
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    /// API endpoint base URL
    pub endpoint: String,
    /// API key for authentication
    pub api_key: String,
    /// Synthesis model identifier
    pub model: String,
    /// Voice used when the caller does not pick one
    pub voice: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::OPENAI_DEFAULT.to_string(),
            api_key: String::new(),
            model: models::TTS_DEFAULT.to_string(),
            voice: voices::DEFAULT.to_string(),
            timeout: Duration::from_secs(timeouts::TTS_REQUEST_SECS),
        }
    }
}

impl SpeakerConfig {
    /// Build from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.api.endpoint.clone(),
            api_key: settings.api.api_key.clone(),
            model: settings.tts.model.clone(),
            voice: settings.tts.voice.clone(),
            timeout: Duration::from_secs(settings.tts.timeout_seconds),
        }
    }
}

/// Text-to-speech client for OpenAI-compatible synthesis endpoints
pub struct OpenAISpeaker {
    config: SpeakerConfig,
    client: reqwest::Client,
}

impl OpenAISpeaker {
    /// Create a new speaker
    pub fn new(config: SpeakerConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PipelineError::Synthesis(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn speech_url(&self) -> String {
        format!(
            "{}/audio/speech",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers
    }

    async fn request_speech(
        &self,
        text: &str,
        voice: &str,
        format: AudioFormat,
    ) -> Result<Vec<u8>, PipelineError> {
        let wire_request = SpeechRequest {
            model: self.config.model.clone(),
            voice: voice.to_string(),
            input: text.to_string(),
            response_format: format.as_str(),
        };

        let response = self
            .client
            .post(self.speech_url())
            .headers(self.build_headers())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| PipelineError::Synthesis(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Synthesis(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::Synthesis(format!("Failed to read audio: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TextToSpeech for OpenAISpeaker {
    async fn synthesize(&self, text: &str, voice: &str, format: AudioFormat) -> SpokenAudio {
        if text.trim().is_empty() {
            return SpokenAudio::empty(Provenance::ShortCircuit);
        }

        match self.request_speech(text, voice, format).await {
            Ok(bytes) => {
                tracing::debug!(
                    model = %self.config.model,
                    voice = %voice,
                    bytes = bytes.len(),
                    "synthesis complete"
                );
                SpokenAudio {
                    bytes,
                    mime: format.mime(),
                    provenance: Provenance::Model,
                }
            }
            Err(e) => {
                tracing::warn!("TTS error: {}", e);
                SpokenAudio::empty(Provenance::Degraded)
            }
        }
    }

    fn available_voices(&self) -> &[&'static str] {
        voices::CATALOGUE
    }

    fn default_voice(&self) -> &str {
        &self.config.voice
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest {
    model: String,
    voice: String,
    input: String,
    response_format: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpeakerConfig::default();
        assert_eq!(config.model, "gpt-4o-mini-tts");
        assert_eq!(config.voice, "alloy");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits() {
        let speaker = OpenAISpeaker::new(SpeakerConfig::default()).unwrap();

        let audio = speaker.synthesize("   ", "alloy", AudioFormat::Mp3).await;

        assert!(audio.is_empty());
        assert_eq!(audio.provenance, Provenance::ShortCircuit);
        assert_eq!(audio.mime, "audio/mp3");
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_empty() {
        let config = SpeakerConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            ..Default::default()
        };
        let speaker = OpenAISpeaker::new(config).unwrap();

        let audio = speaker.synthesize("こんにちは", "alloy", AudioFormat::Mp3).await;

        assert!(audio.is_empty());
        assert_eq!(audio.provenance, Provenance::Degraded);
    }

    #[test]
    fn test_voice_catalogue() {
        let speaker = OpenAISpeaker::new(SpeakerConfig::default()).unwrap();

        assert_eq!(speaker.available_voices(), &["alloy", "verse", "aria", "sage"]);
        assert_eq!(speaker.default_voice(), "alloy");
    }

    #[test]
    fn test_wire_request_shape() {
        let wire_request = SpeechRequest {
            model: "gpt-4o-mini-tts".to_string(),
            voice: "sage".to_string(),
            input: "こんにちは".to_string(),
            response_format: AudioFormat::Wav.as_str(),
        };

        let json = serde_json::to_string(&wire_request).unwrap();
        assert!(json.contains(r#""response_format":"wav""#));
        assert!(json.contains(r#""voice":"sage""#));
    }
}
