//! Translation pipeline
//!
//! The stages a single utterance moves through:
//! detect -> classify -> translate, with transcription in front when the
//! input is audio and synthesis at the end when the reply is spoken.
//!
//! Classification, translation, and synthesis degrade to defaults on
//! upstream failure; transcription is the one stage that surfaces errors,
//! since there is nothing sensible to translate without a transcript.

pub mod classify;
pub mod detect;
pub mod stt;
pub mod translate;
pub mod tts;

pub use classify::ContextClassifier;
pub use detect::LanguageDetector;
pub use stt::{OpenAITranscriber, TranscriberConfig};
pub use translate::Translator;
pub use tts::{OpenAISpeaker, SpeakerConfig};

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PipelineError> for translate_agent_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Transcription(m) => translate_agent_core::Error::Stt(m),
            PipelineError::Synthesis(m) => translate_agent_core::Error::Tts(m),
            PipelineError::Io(e) => translate_agent_core::Error::Io(e),
        }
    }
}
