//! Speech-to-text clients

mod openai;

pub use openai::{OpenAITranscriber, TranscriberConfig};
