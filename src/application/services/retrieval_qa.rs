use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{
    ChatResponder, EmbeddingProvider, LanguageModel, VectorStore,
    chat_responder::{ChatConfig, ChatError},
    embedding_provider::{EmbeddingModel, EmbeddingRequest},
    language_model::GenerationRequest,
    vector_store::ScoredChunk,
};
use crate::domain::entities::ChatSession;

pub const QA_PROMPT_TEMPLATE: &str = "Use the following pieces of information to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.

Context: {context}
Question: {question}

Only return the helpful answer. Answer must be detailed and well explained.
Helpful answer:";

/// Fills the QA template with every retrieved chunk ("stuff" strategy).
pub fn build_prompt(context: &[ScoredChunk], question: &str) -> String {
    let context = context
        .iter()
        .map(|chunk| chunk.payload.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    fill_template(QA_PROMPT_TEMPLATE, &context, question)
}

/// Single left-to-right pass, so placeholder text inside the document or the
/// question is copied through untouched.
fn fill_template(template: &str, context: &str, question: &str) -> String {
    let mut prompt = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        prompt.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{context}") {
            prompt.push_str(context);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{question}") {
            prompt.push_str(question);
            rest = after;
        } else {
            prompt.push('{');
            rest = &tail[1..];
        }
    }

    prompt.push_str(rest);
    prompt
}

/// Embed the question, fetch the closest chunks, let the model answer.
pub struct RetrievalQaResponder {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    language_model: Arc<dyn LanguageModel>,
}

impl RetrievalQaResponder {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        language_model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            embedding_provider,
            vector_store,
            language_model,
        }
    }

    fn validate(config: &ChatConfig) -> Result<(), ChatError> {
        if config.llm_model_id.trim().is_empty() {
            return Err(ChatError::InvalidConfig("llm_model_id is empty".to_string()));
        }
        if config.embedding_model_id.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "embedding_model_id is empty".to_string(),
            ));
        }
        if config.collection_name.trim().is_empty() {
            return Err(ChatError::InvalidConfig("collection_name is empty".to_string()));
        }
        if !(0.0..=2.0).contains(&config.llm_temperature) {
            return Err(ChatError::InvalidConfig(format!(
                "llm_temperature {} is outside [0, 2]",
                config.llm_temperature
            )));
        }
        if config.top_k == 0 {
            return Err(ChatError::InvalidConfig("top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatResponder for RetrievalQaResponder {
    async fn initialize(&self, config: &ChatConfig) -> Result<ChatSession, ChatError> {
        Self::validate(config)?;

        Ok(ChatSession::new(
            config.llm_model_id.clone(),
            self.language_model.endpoint().to_string(),
            config.llm_temperature,
            config.embedding_model_id.clone(),
            config.device.clone(),
            config.normalize_embeddings,
            config.collection_name.clone(),
            config.top_k,
        ))
    }

    async fn ask(&self, session: &ChatSession, query: &str) -> Result<String, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let embedding = self
            .embedding_provider
            .generate_embedding(EmbeddingRequest {
                text: query.to_string(),
                model: EmbeddingModel {
                    model_id: session.embedding_model_id().to_string(),
                    device: session.device().to_string(),
                    normalize: session.normalize_embeddings(),
                },
            })
            .await
            .map_err(|e| ChatError::Embedding(e.to_string()))?;

        let context = self
            .vector_store
            .search(session.collection_name(), &embedding.embedding, session.top_k())
            .await
            .map_err(|e| ChatError::Retrieval(e.to_string()))?;

        tracing::debug!(
            collection = session.collection_name(),
            retrieved = context.len(),
            "retrieved context for question"
        );

        let answer = self
            .language_model
            .generate(GenerationRequest {
                model: session.llm_model_id().to_string(),
                prompt: build_prompt(&context, query),
                temperature: session.temperature(),
            })
            .await
            .map_err(|e| ChatError::Inference(e.to_string()))?;

        Ok(answer.trim().to_string())
    }
}
