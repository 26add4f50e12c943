//! Application state
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use translate_agent_config::Settings;
use translate_agent_core::language::{Language, LanguagePair};
use translate_agent_core::traits::{LanguageModel, SpeechToText, TextToSpeech};
use translate_agent_pipeline::{ContextClassifier, LanguageDetector, Translator};

use crate::session::SessionManager;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub settings: Arc<Settings>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Chat backend, probed directly by the readiness check
    pub llm: Arc<dyn LanguageModel>,
    /// Speech-to-text backend
    pub stt: Arc<dyn SpeechToText>,
    /// Text-to-speech backend
    pub tts: Arc<dyn TextToSpeech>,
    /// Translator (owns the chat backend and the classifier)
    pub translator: Arc<Translator>,
    /// Standalone classifier for the /classify route
    pub classifier: Arc<ContextClassifier>,
    /// Language detection heuristic
    pub detector: LanguageDetector,
}

impl AppState {
    /// Create application state from loaded settings and wired backends
    pub fn new(
        settings: Settings,
        llm: Arc<dyn LanguageModel>,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
    ) -> Self {
        let sessions = Arc::new(SessionManager::with_config(
            settings.session.max_sessions,
            Duration::from_secs(settings.session.timeout_seconds),
            Duration::from_secs(settings.session.cleanup_interval_seconds),
        ));

        let translator = Arc::new(
            Translator::new(llm.clone()).with_temperature(settings.translation.temperature),
        );
        let classifier = Arc::new(ContextClassifier::new(llm.clone()));

        Self {
            settings: Arc::new(settings),
            sessions,
            llm,
            stt,
            tts,
            translator,
            classifier,
            detector: LanguageDetector::new(),
        }
    }

    /// Default language pair for new sessions, from configuration
    pub fn default_pair(&self) -> LanguagePair {
        let src = Language::from_str_loose(&self.settings.translation.default_source)
            .unwrap_or(Language::Vietnamese);
        let dst = Language::from_str_loose(&self.settings.translation.default_target)
            .unwrap_or(Language::Japanese);
        LanguagePair::new(src, dst)
    }
}
