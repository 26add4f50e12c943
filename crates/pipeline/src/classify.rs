//! Formality and context classification
//!
//! Asks the chat model for a strict JSON object labeling formality,
//! context, and tone. Any failure, from the network up to a reply that
//! does not parse, drops to a keyword fallback that always produces a
//! complete set of labels. Callers can rely on this stage never failing.

use std::sync::Arc;

use serde::Deserialize;

use translate_agent_config::constants::sampling;
use translate_agent_core::llm_types::GenerateRequest;
use translate_agent_core::{
    Formality, Language, LanguageModel, Provenance, SpeechContext, StyleAnalysis, StyleLabels,
    Tone,
};

/// Phrases that mark formal register across the supported languages
const FORMAL_INDICATORS: &[&str] = &[
    "please",
    "thank you",
    "sincerely",
    "respectfully",
    "でございます",
    "いたします",
    "xin chào",
    "kính chào",
];

/// Phrases that mark casual register
const CASUAL_INDICATORS: &[&str] = &[
    "hey",
    "yo",
    "だよ",
    "だね",
    "ね",
    "よ",
    "chào bạn",
    "ơi",
];

/// Style classifier backed by the chat model
pub struct ContextClassifier {
    llm: Arc<dyn LanguageModel>,
}

impl ContextClassifier {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Label the text's formality, context, and tone
    ///
    /// Never fails; the provenance on the result records whether the
    /// labels came from the model or the keyword fallback.
    pub async fn classify(&self, text: &str, lang: Language) -> StyleAnalysis {
        let request = GenerateRequest::without_system()
            .with_user_message(analysis_prompt(text, lang))
            .with_temperature(sampling::CLASSIFY_TEMPERATURE)
            .with_max_tokens(sampling::CLASSIFY_MAX_TOKENS);

        match self.llm.generate(request).await {
            Ok(response) => match serde_json::from_str::<RawLabels>(response.text.trim()) {
                Ok(raw) => StyleAnalysis {
                    labels: raw.into_labels(),
                    provenance: Provenance::Model,
                },
                Err(e) => {
                    tracing::debug!("classifier reply was not valid JSON: {}", e);
                    fallback_analysis(text)
                }
            },
            Err(e) => {
                tracing::warn!("classifier call failed: {}", e);
                fallback_analysis(text)
            }
        }
    }
}

/// Build the single-message analysis prompt
fn analysis_prompt(text: &str, lang: Language) -> String {
    format!(
        "Analyze the following text in {} language and determine:\n\
         1. Formality level: casual, neutral, formal, very_formal\n\
         2. Context: personal, business, academic, technical, creative, medical, legal\n\
         3. Tone: friendly, professional, serious, playful, urgent, polite\n\
         \n\
         Text: \"{}\"\n\
         \n\
         Respond with only a JSON object like:\n\
         {{\"formality\": \"formal\", \"context\": \"business\", \"tone\": \"professional\"}}",
        lang.code(),
        text
    )
}

/// Keyword fallback, always complete
fn fallback_analysis(text: &str) -> StyleAnalysis {
    let lower = text.to_lowercase();

    let formality = if FORMAL_INDICATORS.iter().any(|p| lower.contains(p)) {
        Formality::Formal
    } else if CASUAL_INDICATORS.iter().any(|p| lower.contains(p)) {
        Formality::Casual
    } else {
        Formality::Neutral
    };

    StyleAnalysis {
        labels: StyleLabels::new(formality, SpeechContext::Personal, Tone::Friendly),
        provenance: Provenance::Fallback,
    }
}

/// Wire shape of the model's JSON reply
///
/// Fields are optional so a partial reply still counts as model-backed;
/// unknown label values clamp to the defaults.
#[derive(Debug, Deserialize)]
struct RawLabels {
    #[serde(default)]
    formality: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    tone: Option<String>,
}

impl RawLabels {
    fn into_labels(self) -> StyleLabels {
        StyleLabels::new(
            self.formality
                .as_deref()
                .and_then(Formality::from_str_loose)
                .unwrap_or_default(),
            self.context
                .as_deref()
                .and_then(SpeechContext::from_str_loose)
                .unwrap_or_default(),
            self.tone
                .as_deref()
                .and_then(Tone::from_str_loose)
                .unwrap_or_default(),
        )
    }
}
