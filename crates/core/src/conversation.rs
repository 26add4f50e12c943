//! Conversation turns for the session log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Which side of a two-party conversation produced a turn
///
/// Speakers are not authenticated; they alternate by turn parity, which is
/// enough for a shared-device conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    /// Speaker for the nth turn (zero-based): even turns are A, odd are B
    pub fn from_turn_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::A
        } else {
            Self::B
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// One translated utterance in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    /// What was said, as transcribed or typed
    pub transcript: String,
    pub translation: String,
    /// Detected language of the transcript
    pub src: Language,
    /// Target resolved by the turn-direction policy
    pub dst: Language,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        speaker: Speaker,
        transcript: impl Into<String>,
        translation: impl Into<String>,
        src: Language,
        dst: Language,
    ) -> Self {
        Self {
            speaker,
            transcript: transcript.into(),
            translation: translation.into(),
            src,
            dst,
            timestamp: Utc::now(),
        }
    }
}
