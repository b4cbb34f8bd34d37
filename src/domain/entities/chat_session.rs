use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to answer a question against one indexed collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    llm_model_id: String,
    inference_endpoint: String,
    temperature: f32,
    embedding_model_id: String,
    device: String,
    normalize_embeddings: bool,
    collection_name: String,
    top_k: usize,
    created_at: DateTime<Utc>,
}

impl ChatSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        llm_model_id: String,
        inference_endpoint: String,
        temperature: f32,
        embedding_model_id: String,
        device: String,
        normalize_embeddings: bool,
        collection_name: String,
        top_k: usize,
    ) -> Self {
        Self {
            llm_model_id,
            inference_endpoint,
            temperature,
            embedding_model_id,
            device,
            normalize_embeddings,
            collection_name,
            top_k,
            created_at: Utc::now(),
        }
    }

    pub fn llm_model_id(&self) -> &str {
        &self.llm_model_id
    }

    pub fn inference_endpoint(&self) -> &str {
        &self.inference_endpoint
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn embedding_model_id(&self) -> &str {
        &self.embedding_model_id
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn normalize_embeddings(&self) -> bool {
        self.normalize_embeddings
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
