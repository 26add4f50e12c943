//! Stage outcome types
//!
//! Every degradable pipeline stage reports how it arrived at its value, so
//! callers can tell a model-backed answer from a local fallback without
//! inspecting the payload.

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::style::StyleLabels;

/// How a pipeline stage arrived at its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// An upstream model call succeeded and produced the value
    Model,
    /// The input made an upstream call unnecessary (same-language
    /// translation, empty text)
    ShortCircuit,
    /// The deterministic keyword fallback produced a complete value
    Fallback,
    /// An upstream failure was absorbed and a placeholder substituted
    Degraded,
}

impl Provenance {
    pub fn is_model_backed(&self) -> bool {
        matches!(self, Self::Model)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded)
    }
}

/// Result of a translation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    /// Effective source after auto-resolution
    pub src: Language,
    pub dst: Language,
    pub provenance: Provenance,
}

/// Result of a style classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleAnalysis {
    pub labels: StyleLabels,
    pub provenance: Provenance,
}

/// Requested synthesis output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mp3",
            Self::Wav => "audio/wav",
        }
    }

    /// Parse from string, `None` for unsupported formats
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            _ => None,
        }
    }
}

/// Result of speech synthesis
///
/// Failed synthesis degrades to empty bytes with the default MIME type
/// rather than surfacing an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenAudio {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub provenance: Provenance,
}

impl SpokenAudio {
    /// Empty audio with the default MIME type
    pub fn empty(provenance: Provenance) -> Self {
        Self {
            bytes: Vec::new(),
            mime: AudioFormat::Mp3.mime(),
            provenance,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_predicates() {
        assert!(Provenance::Model.is_model_backed());
        assert!(!Provenance::Fallback.is_model_backed());
        assert!(Provenance::Degraded.is_degraded());
        assert!(!Provenance::ShortCircuit.is_degraded());
    }

    #[test]
    fn test_provenance_serde() {
        assert_eq!(
            serde_json::to_string(&Provenance::ShortCircuit).unwrap(),
            "\"short_circuit\""
        );
    }

    #[test]
    fn test_audio_format() {
        assert_eq!(AudioFormat::Mp3.mime(), "audio/mp3");
        assert_eq!(AudioFormat::Wav.mime(), "audio/wav");
        assert_eq!(AudioFormat::from_str_loose("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_str_loose("ogg"), None);
    }

    #[test]
    fn test_empty_audio() {
        let audio = SpokenAudio::empty(Provenance::ShortCircuit);
        assert!(audio.is_empty());
        assert_eq!(audio.mime, "audio/mp3");
    }
}
