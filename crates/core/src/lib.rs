//! Core traits and types for the translation agent
//!
//! This crate provides foundational types used across all other crates:
//! - Core traits for pluggable backends (STT, TTS, LLM)
//! - Language definitions and the turn-direction policy
//! - Style labels steering translation register
//! - Stage outcome types with explicit provenance
//! - Conversation turn types
//! - Error types

pub mod conversation;
pub mod error;
pub mod language;
pub mod llm_types;
pub mod outcome;
pub mod style;
pub mod traits;

pub use conversation::{ConversationTurn, Speaker};
pub use error::{Error, Result};
pub use language::{Language, LanguagePair, Script};
pub use llm_types::{
    FinishReason, GenerateRequest, GenerateResponse, Message, Role, TokenUsage,
};
pub use outcome::{AudioFormat, Provenance, SpokenAudio, StyleAnalysis, Translation};
pub use style::{Formality, SpeechContext, StyleLabels, Tone};

// Trait re-exports
pub use traits::{LanguageModel, SpeechToText, TextToSpeech};
