use async_trait::async_trait;

use crate::errors::GeminiResult;
use crate::types::Turn;

/// Text generation over a caller-supplied conversation.
///
/// Implementations are stateless per call: all conversational memory is passed
/// in through `turns`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate a reply to `turns` under the given system instruction
    async fn generate(&self, turns: &[Turn], system_instruction: &str) -> GeminiResult<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

/// Text to vector embedding with a fixed model.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed a single query text
    async fn embed(&self, text: &str) -> GeminiResult<Vec<f32>>;

    /// The embedding model identifier. Must match the model the index was built with.
    fn model_name(&self) -> &str;
}
