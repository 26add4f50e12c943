//! Hosted transcription backend
//!
//! Uploads recorded audio to an OpenAI-compatible `/audio/transcriptions`
//! endpoint. Audio is staged through a scoped temporary file that is removed
//! on every exit path, including upload failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart;
use serde::Deserialize;

use translate_agent_config::constants::{endpoints, models, timeouts};
use translate_agent_config::Settings;
use translate_agent_core::language::Language;
use translate_agent_core::traits::SpeechToText;

use crate::PipelineError;

/// Languages forwarded to the recognizer as explicit hints.
///
/// Hints outside this set are dropped rather than forwarded; the recognizer
/// identifies those languages from acoustic evidence alone.
const HINT_LANGUAGES: &[Language] = &[
    Language::Vietnamese,
    Language::Japanese,
    Language::English,
];

/// Configuration for the hosted transcriber
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    /// API endpoint base URL
    pub endpoint: String,
    /// API key for authentication
    pub api_key: String,
    /// Transcription model identifier
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::OPENAI_DEFAULT.to_string(),
            api_key: String::new(),
            model: models::STT_DEFAULT.to_string(),
            timeout: Duration::from_secs(timeouts::STT_REQUEST_SECS),
        }
    }
}

impl TranscriberConfig {
    /// Build from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.api.endpoint.clone(),
            api_key: settings.api.api_key.clone(),
            model: settings.stt.model.clone(),
            timeout: Duration::from_secs(settings.stt.timeout_seconds),
        }
    }
}

/// Speech-to-text client for OpenAI-compatible transcription endpoints
pub struct OpenAITranscriber {
    config: TranscriberConfig,
    client: reqwest::Client,
}

impl OpenAITranscriber {
    /// Create a new transcriber
    pub fn new(config: TranscriberConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PipelineError::Transcription(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn transcription_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }

    fn hint_code(&self, hint: Option<Language>) -> Option<&'static str> {
        hint.filter(|lang| self.supports_hint(*lang))
            .map(|lang| lang.code())
    }

    async fn request_transcript(
        &self,
        audio: &[u8],
        hint: Option<Language>,
    ) -> Result<String, PipelineError> {
        // Stage the audio through a named .wav file. The guard removes the
        // file when it drops, so failures below still clean up. The upload
        // part reuses the caller's bytes directly.
        let _staged = stage_audio(audio).await?;

        let part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| PipelineError::Transcription(format!("Invalid audio part: {}", e)))?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());

        if let Some(code) = self.hint_code(hint) {
            form = form.text("language", code);
        }

        let response = self
            .client
            .post(self.transcription_url())
            .headers(self.build_headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::Transcription(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Transcription(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: TranscriptionResponse = response.json().await.map_err(|e| {
            PipelineError::Transcription(format!("Failed to parse response: {}", e))
        })?;

        tracing::debug!(
            model = %self.config.model,
            chars = parsed.text.trim().len(),
            "transcription complete"
        );

        Ok(parsed.text.trim().to_string())
    }
}

#[async_trait]
impl SpeechToText for OpenAITranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        hint: Option<Language>,
    ) -> translate_agent_core::Result<String> {
        self.request_transcript(audio, hint).await.map_err(Into::into)
    }

    fn hint_languages(&self) -> &[Language] {
        HINT_LANGUAGES
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Write recorded audio to a scoped `.wav` temp file
///
/// The returned guard deletes the file on drop, so the file survives
/// exactly as long as the caller holds it.
async fn stage_audio(audio: &[u8]) -> Result<tempfile::NamedTempFile, PipelineError> {
    let staged = tempfile::Builder::new()
        .prefix("utterance-")
        .suffix(".wav")
        .tempfile()?;

    tokio::fs::write(staged.path(), audio).await?;
    Ok(staged)
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}
