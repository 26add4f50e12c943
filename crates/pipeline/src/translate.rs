//! Style-conditioned translation
//!
//! Classification feeds translation: the labels from the style classifier
//! are folded into the system prompt before the chat call. Translation
//! never surfaces an error to the caller; upstream failures become a
//! placeholder string with degraded provenance.

use std::sync::Arc;

use translate_agent_config::constants::sampling;
use translate_agent_core::llm_types::GenerateRequest;
use translate_agent_core::{Language, LanguageModel, Provenance, StyleLabels, Translation};

use crate::classify::ContextClassifier;
use crate::detect::LanguageDetector;

/// Translator backed by the chat model
pub struct Translator {
    llm: Arc<dyn LanguageModel>,
    classifier: ContextClassifier,
    detector: LanguageDetector,
    temperature: f32,
}

impl Translator {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            classifier: ContextClassifier::new(llm.clone()),
            llm,
            detector: LanguageDetector::new(),
            temperature: sampling::TRANSLATE_TEMPERATURE,
        }
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Translate `text` into `dst`
    ///
    /// A missing source language is resolved by detection. When source and
    /// destination match the input is returned unchanged without any
    /// upstream call.
    pub async fn translate(
        &self,
        text: &str,
        src: Option<Language>,
        dst: Language,
    ) -> Translation {
        let src = src.unwrap_or_else(|| self.detector.detect(text));

        if src == dst {
            return Translation {
                text: text.to_string(),
                src,
                dst,
                provenance: Provenance::ShortCircuit,
            };
        }

        let analysis = self.classifier.classify(text, src).await;

        let request = GenerateRequest::new(system_prompt(&analysis.labels))
            .with_user_message(format!("[SRC={}] [DST={}]\n{}", src.code(), dst.code(), text))
            .with_temperature(self.temperature);

        match self.llm.generate(request).await {
            Ok(response) => {
                let trimmed = response.text.trim();
                if trimmed.is_empty() {
                    Translation {
                        text: "Translation failed".to_string(),
                        src,
                        dst,
                        provenance: Provenance::Degraded,
                    }
                } else {
                    Translation {
                        text: trimmed.to_string(),
                        src,
                        dst,
                        provenance: Provenance::Model,
                    }
                }
            }
            Err(e) => {
                tracing::warn!("translation call failed: {}", e);
                Translation {
                    text: format!("Translation error: {}", e),
                    src,
                    dst,
                    provenance: Provenance::Degraded,
                }
            }
        }
    }
}

/// Assemble the style-conditioned system prompt
fn system_prompt(labels: &StyleLabels) -> String {
    let legend = Language::all()
        .iter()
        .map(|l| format!("'{}'={}", l.code(), l.japanese_name()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "あなたはプロの翻訳者です。\n\
         \n\
         翻訳スタイル: {style}\n\
         文脈考慮: {domain}\n\
         \n\
         - ソース言語: {legend}\n\
         - ターゲット言語: {legend}\n\
         - 検出された調子: {tone}\n\
         - 文脈: {context}\n\
         - 丁寧度: {formality}\n\
         \n\
         元のテキストの調子と文脈を保ちながら、上記スタイルで翻訳してください。\n\
         数字や名前はそのまま保持し、説明は追加せず翻訳文のみ出力してください。",
        style = labels.formality.instruction(),
        domain = labels.context.instruction(),
        legend = legend,
        tone = labels.tone.as_str(),
        context = labels.context.as_str(),
        formality = labels.formality.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use translate_agent_core::llm_types::{GenerateResponse, Role};
    use translate_agent_core::{Error, Formality, Result, SpeechContext, Tone};

    /// Test double that records every request it receives
    struct CapturingLlm {
        reply: Option<&'static str>,
        calls: AtomicUsize,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl CapturingLlm {
        fn new(reply: Option<&'static str>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for CapturingLlm {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            match self.reply {
                Some(text) => Ok(GenerateResponse::text(text)),
                None => Err(Error::Llm("forced failure".to_string())),
            }
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "capturing"
        }
    }

    #[tokio::test]
    async fn test_same_language_short_circuits() {
        let llm = Arc::new(CapturingLlm::new(Some("unused")));
        let translator = Translator::new(llm.clone());

        let result = translator
            .translate("Xin chào", Some(Language::Vietnamese), Language::Vietnamese)
            .await;

        assert_eq!(result.text, "Xin chào");
        assert_eq!(result.provenance, Provenance::ShortCircuit);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auto_source_matching_destination_short_circuits() {
        let llm = Arc::new(CapturingLlm::new(Some("unused")));
        let translator = Translator::new(llm.clone());

        let result = translator
            .translate("こんにちは", None, Language::Japanese)
            .await;

        assert_eq!(result.text, "こんにちは");
        assert_eq!(result.src, Language::Japanese);
        assert_eq!(result.provenance, Provenance::ShortCircuit);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_translation() {
        let llm = Arc::new(CapturingLlm::new(Some("こんにちは、お元気ですか。")));
        let translator = Translator::new(llm.clone());

        let result = translator
            .translate("Xin chào, bạn khỏe không?", Some(Language::Vietnamese), Language::Japanese)
            .await;

        assert_eq!(result.text, "こんにちは、お元気ですか。");
        assert_eq!(result.src, Language::Vietnamese);
        assert_eq!(result.dst, Language::Japanese);
        assert!(result.provenance.is_model_backed());
        // One classification call, one translation call
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prompt_carries_markers_and_legend() {
        let llm = Arc::new(CapturingLlm::new(Some("ok")));
        let translator = Translator::new(llm.clone());

        translator
            .translate("Hello", Some(Language::English), Language::Japanese)
            .await;

        let requests = llm.requests.lock().unwrap();
        let translation_request = requests.last().unwrap();

        let system = &translation_request.messages[0];
        assert_eq!(system.role, Role::System);
        assert!(system.content.contains("あなたはプロの翻訳者です。"));
        assert!(system.content.contains("'vi'=ベトナム語"));
        assert!(system.content.contains("'bn'=ベンガル語"));

        let user = &translation_request.messages[1];
        assert_eq!(user.role, Role::User);
        assert!(user.content.starts_with("[SRC=en] [DST=ja]\nHello"));

        assert_eq!(translation_request.temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_classification_request_precedes_translation() {
        let llm = Arc::new(CapturingLlm::new(Some("ok")));
        let translator = Translator::new(llm.clone());

        translator
            .translate("Hello", Some(Language::English), Language::Vietnamese)
            .await;

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        // Classifier sends a single user message with a tight token cap
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].max_tokens, Some(100));
        assert_eq!(requests[0].temperature, Some(0.1));
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades() {
        let llm = Arc::new(CapturingLlm::new(None));
        let translator = Translator::new(llm);

        let result = translator
            .translate("Hello", Some(Language::English), Language::Japanese)
            .await;

        assert!(result.text.starts_with("Translation error:"));
        assert!(result.provenance.is_degraded());
    }

    #[tokio::test]
    async fn test_empty_reply_degrades() {
        let llm = Arc::new(CapturingLlm::new(Some("   ")));
        let translator = Translator::new(llm);

        let result = translator
            .translate("Hello", Some(Language::English), Language::Japanese)
            .await;

        assert_eq!(result.text, "Translation failed");
        assert!(result.provenance.is_degraded());
    }

    #[tokio::test]
    async fn test_style_labels_steer_prompt() {
        let labels = StyleLabels::new(Formality::Formal, SpeechContext::Business, Tone::Professional);
        let prompt = system_prompt(&labels);

        assert!(prompt.contains("丁寧で正式な表現を使用し、ビジネス文書や公式な場面に適した翻訳をしてください。"));
        assert!(prompt.contains("ビジネス文書として適切な専門用語と表現を使用してください。"));
        assert!(prompt.contains("丁寧度: formal"));
        assert!(prompt.contains("調子: professional"));
    }
}
