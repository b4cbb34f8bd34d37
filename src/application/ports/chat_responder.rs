use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::ChatSession;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid chat configuration: {0}")]
    InvalidConfig(String),
    #[error("Question is empty")]
    EmptyQuery,
    #[error("Embedding failed: {0}")]
    Embedding(String),
    #[error("Retrieval failed: {0}")]
    Retrieval(String),
    #[error("Inference failed: {0}")]
    Inference(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub embedding_model_id: String,
    pub device: String,
    pub normalize_embeddings: bool,
    pub llm_model_id: String,
    pub llm_temperature: f32,
    pub store_endpoint: String,
    pub collection_name: String,
    pub top_k: usize,
}

impl ChatConfig {
    pub fn for_collection(&self, collection_name: &str) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            ..self.clone()
        }
    }
}

/// Answers questions against an indexed collection. Each `ask` stands alone:
/// no conversation history is sent.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn initialize(&self, config: &ChatConfig) -> Result<ChatSession, ChatError>;

    async fn ask(&self, session: &ChatSession, query: &str) -> Result<String, ChatError>;
}
