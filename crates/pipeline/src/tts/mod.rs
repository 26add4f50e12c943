//! Text-to-speech clients

mod openai;

pub use openai::{OpenAISpeaker, SpeakerConfig};
