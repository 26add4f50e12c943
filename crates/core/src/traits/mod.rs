//! Core traits for the translation agent
//!
//! All external capabilities sit behind these traits to enable:
//! - Pluggable backends (swap implementations without code changes)
//! - Testing with mocks
//!
//! # Trait Hierarchy
//!
//! ```text
//! Speech Processing:
//!   - SpeechToText: Audio → Text transcription
//!   - TextToSpeech: Text → Audio synthesis
//!
//! Language Models:
//!   - LanguageModel: Chat completions for classification and translation
//! ```

mod llm;
mod speech;

pub use llm::LanguageModel;
pub use speech::{SpeechToText, TextToSpeech};
