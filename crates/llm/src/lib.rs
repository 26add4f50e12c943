//! OpenAI-compatible chat integration
//!
//! A single non-streaming backend serves both call sites in the agent:
//! style classification and translation. Per-request model, temperature,
//! and token caps ride in on the request itself, so one client instance
//! is shared across the pipeline.

pub mod backend;

pub use backend::{OpenAIBackend, OpenAIConfig};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for translate_agent_core::Error {
    fn from(err: LlmError) -> Self {
        translate_agent_core::Error::Llm(err.to_string())
    }
}
