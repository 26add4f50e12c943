//! Language Model trait

use async_trait::async_trait;

use crate::error::Result;
use crate::llm_types::{GenerateRequest, GenerateResponse};

/// Language Model interface
///
/// Implementations:
/// - `OpenAIBackend` - OpenAI-compatible chat completions
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LanguageModel> = Arc::new(OpenAIBackend::new(config)?);
/// let request = GenerateRequest::new("You are a professional translator")
///     .with_user_message("[SRC=vi] [DST=ja]\nXin chào");
/// let response = llm.generate(request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate a completion
    ///
    /// # Arguments
    /// * `request` - Generation request with messages and parameters
    ///
    /// # Returns
    /// Generated response with text and metadata
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Check if the backend is reachable
    async fn is_available(&self) -> bool;

    /// Get model name for logging
    fn model_name(&self) -> &str;

    /// Estimate token count for text
    ///
    /// Rough heuristic; implementations may use actual tokenizers.
    fn estimate_tokens(&self, text: &str) -> usize {
        text.chars().count() / 3
    }
}
