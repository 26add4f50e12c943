//! Speech processing traits

use async_trait::async_trait;

use crate::error::Result;
use crate::language::Language;
use crate::outcome::{AudioFormat, SpokenAudio};

/// Speech-to-Text interface
///
/// Implementations:
/// - `OpenAITranscriber` - hosted transcription endpoint
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = Arc::new(OpenAITranscriber::new(config)?);
/// let text = stt.transcribe(&wav_bytes, Some(Language::Vietnamese)).await?;
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe recorded audio
    ///
    /// # Arguments
    /// * `audio` - Raw recorded audio bytes
    /// * `hint` - Optional language hint; biases recognition without
    ///   overriding acoustic evidence. Implementations forward only hints
    ///   they accept.
    ///
    /// # Returns
    /// Trimmed transcript text
    async fn transcribe(&self, audio: &[u8], hint: Option<Language>) -> Result<String>;

    /// Languages the backend forwards as explicit hints
    fn hint_languages(&self) -> &[Language];

    /// Get model name for logging
    fn model_name(&self) -> &str;

    /// Check if a language may be passed as a hint
    fn supports_hint(&self, lang: Language) -> bool {
        self.hint_languages().contains(&lang)
    }
}

/// Text-to-Speech interface
///
/// Implementations:
/// - `OpenAISpeaker` - hosted synthesis endpoint
///
/// Synthesis never fails hard: implementations degrade to empty audio and
/// record the degradation in the result's provenance.
#[async_trait]
pub trait TextToSpeech: Send + Sync + 'static {
    /// Synthesize text to audio
    ///
    /// # Arguments
    /// * `text` - Text to synthesize; empty text short-circuits to empty
    ///   audio without an upstream call
    /// * `voice` - Voice identifier
    /// * `format` - Requested container format
    ///
    /// # Returns
    /// Audio bytes with MIME type and provenance
    async fn synthesize(&self, text: &str, voice: &str, format: AudioFormat) -> SpokenAudio;

    /// Get available voice identifiers
    fn available_voices(&self) -> &[&'static str];

    /// Get default voice identifier
    fn default_voice(&self) -> &str;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
