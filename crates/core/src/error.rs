//! Shared error taxonomy

use thiserror::Error;

/// Errors surfaced across the translation agent crates
#[derive(Error, Debug)]
pub enum Error {
    #[error("Speech-to-text error: {0}")]
    Stt(String),

    #[error("Text-to-speech error: {0}")]
    Tts(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Stt("upload failed".to_string());
        assert_eq!(err.to_string(), "Speech-to-text error: upload failed");

        let err = Error::UnsupportedLanguage("xx".to_string());
        assert!(err.to_string().contains("xx"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
