use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanguageModelError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Model error: {0}")]
    ApiError(String),
    #[error("Empty completion from model {0}")]
    EmptyCompletion(String),
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LanguageModelError>;

    fn endpoint(&self) -> &str;
}
