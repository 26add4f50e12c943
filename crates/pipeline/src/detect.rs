//! Language detection heuristic
//!
//! Script inspection runs before the statistical detector because short
//! utterances skew statistical models: a lone kana particle is Japanese
//! no matter what the trigram profile says. Vietnamese diacritics are
//! treated the same way, so that mixed text like "chào the weather" still
//! resolves to Vietnamese. Keyword lists break the remaining ties for
//! plain-ASCII input the detector cannot place.

use translate_agent_core::{Language, Script};
use whatlang::Lang;

/// Diacritics particular to Vietnamese orthography
const VIETNAMESE_DIACRITICS: &[char] = &[
    'ă', 'â', 'đ', 'ê', 'ô', 'ơ', 'ư', 'á', 'à', 'ả', 'ã', 'ạ',
];

/// English function words, matched as substrings of lowercased input
const ENGLISH_WORDS: &[&str] = &[
    "the", "and", "is", "are", "was", "were", "have", "has", "will", "would", "can", "could",
];

/// Indonesian function words
const INDONESIAN_WORDS: &[&str] = &[
    "yang", "dan", "ini", "itu", "dengan", "dari", "untuk", "pada", "dalam", "tidak",
];

/// Heuristic language detector
///
/// Stateless; a single instance is shared across the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the language of `text`
    ///
    /// Always returns one of the supported languages. Precedence:
    /// 1. Japanese kana/kanji code points
    /// 2. Bengali script code points
    /// 3. Vietnamese diacritics
    /// 4. Statistical detection, accepted only for supported languages
    /// 5. Keyword lists for ASCII text (Indonesian, then English)
    /// 6. Vietnamese for unmatched ASCII, Japanese otherwise
    pub fn detect(&self, text: &str) -> Language {
        if text
            .chars()
            .any(|c| Script::Kana.contains_char(c) || Script::Han.contains_char(c))
        {
            return Language::Japanese;
        }

        if text.chars().any(|c| Script::Bengali.contains_char(c)) {
            return Language::Bengali;
        }

        let lower = text.to_lowercase();
        if lower.chars().any(|c| VIETNAMESE_DIACRITICS.contains(&c)) {
            return Language::Vietnamese;
        }

        if let Some(info) = whatlang::detect(text) {
            if let Some(lang) = map_detected(info.lang()) {
                return lang;
            }
        }

        if lower.is_ascii() {
            if INDONESIAN_WORDS.iter().any(|w| lower.contains(w)) {
                return Language::Indonesian;
            }
            if ENGLISH_WORDS.iter().any(|w| lower.contains(w)) {
                return Language::English;
            }
            return Language::Vietnamese;
        }

        Language::Japanese
    }
}

/// Map the statistical detector's output into the supported set
fn map_detected(lang: Lang) -> Option<Language> {
    match lang {
        Lang::Vie => Some(Language::Vietnamese),
        Lang::Jpn => Some(Language::Japanese),
        Lang::Eng => Some(Language::English),
        Lang::Ben => Some(Language::Bengali),
        Lang::Ind => Some(Language::Indonesian),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kana_detects_japanese() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("こんにちは"), Language::Japanese);
        assert_eq!(detector.detect("カタカナです"), Language::Japanese);
    }

    #[test]
    fn test_kanji_detects_japanese() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("日本語"), Language::Japanese);
    }

    #[test]
    fn test_kana_overrides_ascii_context() {
        // A single kana particle wins even in mostly-ASCII text
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("OK だよ"), Language::Japanese);
    }

    #[test]
    fn test_bengali_script() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("আমার নাম"), Language::Bengali);
    }

    #[test]
    fn test_vietnamese_diacritics_beat_english_keywords() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("chào the weather is nice"), Language::Vietnamese);
    }

    #[test]
    fn test_vietnamese_greeting() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("Xin chào"), Language::Vietnamese);
    }

    #[test]
    fn test_english_keywords() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("the meeting was moved"), Language::English);
    }

    #[test]
    fn test_indonesian_keywords() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("yang ini dengan itu"), Language::Indonesian);
    }

    #[test]
    fn test_unmatched_ascii_defaults_vietnamese() {
        // Digits carry no trigram signal, so the statistical stage abstains
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("12345 67890"), Language::Vietnamese);
    }

    #[test]
    fn test_empty_text_defaults_vietnamese() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect(""), Language::Vietnamese);
    }

    #[test]
    fn test_unsupported_script_defaults_japanese() {
        // Hangul is outside the supported set and outside ASCII
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("안녕하세요"), Language::Japanese);
    }
}
