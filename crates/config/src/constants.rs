//! Centralized constants for the translation agent
//!
//! This module provides a single source of truth for endpoints, model
//! identifiers, and sampling parameters shared across crates. Hardcoding
//! these in multiple files invites drift between the classifier, the
//! translator, and the speech clients.

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// OpenAI-compatible API endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";
}

/// Default model identifiers for the OpenAI-compatible API
pub mod models {
    /// Chat model used for both classification and translation
    pub const CHAT_DEFAULT: &str = "gpt-4o-mini";

    /// Speech-to-text model
    pub const STT_DEFAULT: &str = "gpt-4o-mini-transcribe";

    /// Text-to-speech model
    pub const TTS_DEFAULT: &str = "gpt-4o-mini-tts";
}

/// Sampling parameters for the two chat call sites
pub mod sampling {
    /// Classification runs near-deterministic with a small completion cap
    pub const CLASSIFY_TEMPERATURE: f32 = 0.1;

    /// Token cap for the three-label JSON classification reply
    pub const CLASSIFY_MAX_TOKENS: u32 = 100;

    /// Translation tolerates slight variation for natural phrasing
    pub const TRANSLATE_TEMPERATURE: f32 = 0.2;
}

/// Synthesis voice catalogue
pub mod voices {
    /// Voices accepted by the speech endpoint
    pub const CATALOGUE: &[&str] = &["alloy", "verse", "aria", "sage"];

    /// Default voice when a request does not name one
    pub const DEFAULT: &str = "alloy";
}

/// Language codes the agent detects and translates between
pub mod languages {
    /// ISO 639-1 codes, in no particular order
    pub const SUPPORTED: &[&str] = &["vi", "ja", "en", "bn", "id"];
}

/// Timeouts (in seconds unless noted)
pub mod timeouts {
    /// Chat completion request timeout
    pub const LLM_REQUEST_SECS: u64 = 60;

    /// Transcription request timeout
    pub const STT_REQUEST_SECS: u64 = 30;

    /// Synthesis request timeout
    pub const TTS_REQUEST_SECS: u64 = 30;

    /// Availability probe timeout
    pub const HEALTH_PROBE_SECS: u64 = 5;
}
