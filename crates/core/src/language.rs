//! Language definitions for the translation agent
//!
//! Covers the five languages the assistant translates between:
//! Vietnamese, Japanese, English, Bengali, and Indonesian.

use serde::{Deserialize, Serialize};

/// Supported languages
///
/// Serializes as the two-letter code (`vi`, `ja`, `en`, `bn`, `id`), which is
/// also the form used in prompts and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "vi")]
    Vietnamese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "id")]
    Indonesian,
}

impl Language {
    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Vietnamese => "vi",
            Self::Japanese => "ja",
            Self::English => "en",
            Self::Bengali => "bn",
            Self::Indonesian => "id",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vietnamese => "Vietnamese",
            Self::Japanese => "Japanese",
            Self::English => "English",
            Self::Bengali => "Bengali",
            Self::Indonesian => "Indonesian",
        }
    }

    /// Get Japanese name, used in the translator's system prompt legend
    pub fn japanese_name(&self) -> &'static str {
        match self {
            Self::Vietnamese => "ベトナム語",
            Self::Japanese => "日本語",
            Self::English => "英語",
            Self::Bengali => "ベンガル語",
            Self::Indonesian => "インドネシア語",
        }
    }

    /// Get scripts used by this language
    pub fn scripts(&self) -> &'static [Script] {
        match self {
            Self::Japanese => &[Script::Kana, Script::Han],
            Self::Bengali => &[Script::Bengali],
            Self::Vietnamese | Self::English | Self::Indonesian => &[Script::Latin],
        }
    }

    /// Parse from string (case-insensitive, accepts codes and names)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "vi" | "vie" | "vietnamese" => Some(Self::Vietnamese),
            "ja" | "jpn" | "japanese" => Some(Self::Japanese),
            "en" | "eng" | "english" => Some(Self::English),
            "bn" | "ben" | "bengali" | "bangla" => Some(Self::Bengali),
            "id" | "ind" | "indonesian" => Some(Self::Indonesian),
            _ => None,
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[
            Self::Vietnamese,
            Self::Japanese,
            Self::English,
            Self::Bengali,
            Self::Indonesian,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Script systems used by the supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    /// Hiragana and katakana blocks
    Kana,
    /// CJK Unified Ideographs block
    Han,
    Bengali,
}

impl Script {
    /// Get Unicode range for this script (first block only)
    pub fn unicode_range(&self) -> (u32, u32) {
        match self {
            Self::Latin => (0x0000, 0x007F),
            Self::Kana => (0x3040, 0x30FF),
            Self::Han => (0x4E00, 0x9FFF),
            Self::Bengali => (0x0980, 0x09FF),
        }
    }

    /// Check if a character belongs to this script
    pub fn contains_char(&self, c: char) -> bool {
        let code = c as u32;
        let (start, end) = self.unicode_range();
        code >= start && code <= end
    }
}

/// A session's configured translation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub src: Language,
    pub dst: Language,
}

impl LanguagePair {
    pub fn new(src: Language, dst: Language) -> Self {
        Self { src, dst }
    }

    /// Exchange source and destination in place
    ///
    /// Both fields change together; callers holding the pair behind a lock
    /// get an atomic swap.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.src, &mut self.dst);
    }

    /// The pair with source and destination exchanged
    pub fn swapped(&self) -> Self {
        Self {
            src: self.dst,
            dst: self.src,
        }
    }

    /// Resolve the translation target for a detected utterance language.
    ///
    /// Detected source maps to the configured destination, detected
    /// destination maps back to the configured source, and anything else
    /// translates to the configured destination. Re-evaluated per utterance
    /// so a two-party conversation alternates direction without manual
    /// re-selection.
    pub fn resolve_target(&self, detected: Language) -> Language {
        if detected == self.src {
            self.dst
        } else if detected == self.dst {
            self.src
        } else {
            self.dst
        }
    }

    /// The effective direction for one utterance: from the detected language
    /// to the target resolved by [`resolve_target`](Self::resolve_target).
    pub fn resolve_turn(&self, detected: Language) -> LanguagePair {
        LanguagePair {
            src: detected,
            dst: self.resolve_target(detected),
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            src: Language::Vietnamese,
            dst: Language::Japanese,
        }
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.src, self.dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(Language::Vietnamese.code(), "vi");
        assert_eq!(Language::Japanese.code(), "ja");
        assert_eq!(Language::Bengali.code(), "bn");
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::from_str_loose("vi"), Some(Language::Vietnamese));
        assert_eq!(Language::from_str_loose("Japanese"), Some(Language::Japanese));
        assert_eq!(Language::from_str_loose("BANGLA"), Some(Language::Bengali));
        assert_eq!(Language::from_str_loose("id"), Some(Language::Indonesian));
        assert_eq!(Language::from_str_loose("unknown"), None);
    }

    #[test]
    fn test_language_serde_codes() {
        let json = serde_json::to_string(&Language::Japanese).unwrap();
        assert_eq!(json, "\"ja\"");
        let lang: Language = serde_json::from_str("\"bn\"").unwrap();
        assert_eq!(lang, Language::Bengali);
    }

    #[test]
    fn test_scripts() {
        assert_eq!(Language::Japanese.scripts(), &[Script::Kana, Script::Han]);
        assert!(Script::Kana.contains_char('あ'));
        assert!(Script::Han.contains_char('日'));
        assert!(Script::Bengali.contains_char('ক'));
        assert!(!Script::Bengali.contains_char('a'));
    }

    #[test]
    fn test_all_languages() {
        assert_eq!(Language::all().len(), 5);
    }

    #[test]
    fn test_pair_swap() {
        let mut pair = LanguagePair::default();
        assert_eq!(pair.src, Language::Vietnamese);
        assert_eq!(pair.dst, Language::Japanese);

        pair.swap();
        assert_eq!(pair.src, Language::Japanese);
        assert_eq!(pair.dst, Language::Vietnamese);

        assert_eq!(pair.swapped(), LanguagePair::default());
    }

    #[test]
    fn test_resolve_target() {
        let pair = LanguagePair::new(Language::Vietnamese, Language::Japanese);
        // Detected source goes to destination
        assert_eq!(pair.resolve_target(Language::Vietnamese), Language::Japanese);
        // Detected destination flips back to source
        assert_eq!(pair.resolve_target(Language::Japanese), Language::Vietnamese);
        // Unmatched language defaults to destination
        assert_eq!(pair.resolve_target(Language::English), Language::Japanese);
    }

    #[test]
    fn test_resolve_turn() {
        let pair = LanguagePair::new(Language::Vietnamese, Language::Japanese);
        let turn = pair.resolve_turn(Language::English);
        assert_eq!(turn.src, Language::English);
        assert_eq!(turn.dst, Language::Japanese);
    }
}
