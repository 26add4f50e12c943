//! Style labels steering translation register and domain
//!
//! The classifier produces one [`StyleLabels`] per utterance; the translator
//! turns each label into a prompt instruction. Unknown values coming back
//! from the model clamp to the defaults (neutral / personal / friendly).

use serde::{Deserialize, Serialize};

/// Register of the utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Casual,
    #[default]
    Neutral,
    Formal,
    VeryFormal,
}

impl Formality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Neutral => "neutral",
            Self::Formal => "formal",
            Self::VeryFormal => "very_formal",
        }
    }

    /// Parse from string, `None` for values outside the vocabulary
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "casual" => Some(Self::Casual),
            "neutral" => Some(Self::Neutral),
            "formal" => Some(Self::Formal),
            "very_formal" => Some(Self::VeryFormal),
            _ => None,
        }
    }

    /// Register instruction embedded in the translation system prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::VeryFormal => "最も丁寧で格式高い表現を使用し、敬語を適切に使い分けてください。",
            Self::Formal => "丁寧で正式な表現を使用し、ビジネス文書や公式な場面に適した翻訳をしてください。",
            Self::Casual => "自然でカジュアルな表現を使用し、日常会話に適した親しみやすい翻訳をしてください。",
            Self::Neutral => "自然で適度に丁寧な表現を使用してください。",
        }
    }
}

/// Domain the utterance belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeechContext {
    #[default]
    Personal,
    Business,
    Academic,
    Technical,
    Creative,
    Medical,
    Legal,
}

impl SpeechContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Business => "business",
            Self::Academic => "academic",
            Self::Technical => "technical",
            Self::Creative => "creative",
            Self::Medical => "medical",
            Self::Legal => "legal",
        }
    }

    /// Parse from string, `None` for values outside the vocabulary
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Some(Self::Personal),
            "business" => Some(Self::Business),
            "academic" => Some(Self::Academic),
            "technical" => Some(Self::Technical),
            "creative" => Some(Self::Creative),
            "medical" => Some(Self::Medical),
            "legal" => Some(Self::Legal),
            _ => None,
        }
    }

    /// Domain instruction embedded in the translation system prompt
    ///
    /// Personal and creative text share the nuance-preserving instruction.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Business => "ビジネス文書として適切な専門用語と表現を使用してください。",
            Self::Academic => "学術的で正確な表現を使用し、専門性を保ってください。",
            Self::Technical => "技術的な内容として正確性を重視し、専門用語を適切に翻訳してください。",
            Self::Medical => "医療用語を正確に翻訳し、専門性と正確性を最優先してください。",
            Self::Legal => "法的文書として正確で曖昧さのない表現を使用してください。",
            Self::Personal | Self::Creative => {
                "感情やニュアンスを大切にし、人間味のある自然な表現を心がけてください。"
            }
        }
    }
}

/// Tone of the utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Serious,
    Playful,
    Urgent,
    Polite,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Professional => "professional",
            Self::Serious => "serious",
            Self::Playful => "playful",
            Self::Urgent => "urgent",
            Self::Polite => "polite",
        }
    }

    /// Parse from string, `None` for values outside the vocabulary
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "friendly" => Some(Self::Friendly),
            "professional" => Some(Self::Professional),
            "serious" => Some(Self::Serious),
            "playful" => Some(Self::Playful),
            "urgent" => Some(Self::Urgent),
            "polite" => Some(Self::Polite),
            _ => None,
        }
    }
}

/// Complete per-utterance style classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StyleLabels {
    pub formality: Formality,
    pub context: SpeechContext,
    pub tone: Tone,
}

impl StyleLabels {
    pub fn new(formality: Formality, context: SpeechContext, tone: Tone) -> Self {
        Self {
            formality,
            context,
            tone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let labels = StyleLabels::default();
        assert_eq!(labels.formality, Formality::Neutral);
        assert_eq!(labels.context, SpeechContext::Personal);
        assert_eq!(labels.tone, Tone::Friendly);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Formality::VeryFormal).unwrap(),
            "\"very_formal\""
        );
        assert_eq!(
            serde_json::to_string(&SpeechContext::Business).unwrap(),
            "\"business\""
        );
        let tone: Tone = serde_json::from_str("\"playful\"").unwrap();
        assert_eq!(tone, Tone::Playful);
    }

    #[test]
    fn test_from_str_loose_clamps_unknown() {
        assert_eq!(Formality::from_str_loose("FORMAL"), Some(Formality::Formal));
        assert_eq!(Formality::from_str_loose("shouty"), None);
        assert_eq!(
            Formality::from_str_loose("shouty").unwrap_or_default(),
            Formality::Neutral
        );
        assert_eq!(SpeechContext::from_str_loose("weird"), None);
        assert_eq!(Tone::from_str_loose(" urgent "), Some(Tone::Urgent));
    }

    #[test]
    fn test_instructions_nonempty() {
        assert!(Formality::VeryFormal.instruction().contains("敬語"));
        assert_eq!(
            SpeechContext::Personal.instruction(),
            SpeechContext::Creative.instruction()
        );
    }
}
