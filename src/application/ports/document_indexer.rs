use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{DocumentReference, EmbeddingSession};

#[derive(Debug, Error)]
pub enum IndexingError {
    #[error("Could not read document: {0}")]
    Extraction(String),
    #[error("Document contains no extractable text")]
    EmptyDocument,
    #[error("Embedding failed: {0}")]
    Embedding(String),
    #[error("Vector store failed: {0}")]
    VectorStore(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexingConfig {
    pub embedding_model_id: String,
    pub device: String,
    pub normalize_embeddings: bool,
    pub store_endpoint: String,
    pub collection_name: String,
}

impl IndexingConfig {
    pub fn for_collection(&self, collection_name: &str) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            ..self.clone()
        }
    }
}

/// Turns a stored document into a populated vector store collection.
///
/// One call does the whole job (parse, chunk, embed, upsert) and either
/// returns a handle to the collection or a single error. Implementations
/// do not retry.
#[async_trait]
pub trait DocumentIndexer: Send + Sync {
    async fn index(
        &self,
        document: &DocumentReference,
        config: &IndexingConfig,
    ) -> Result<EmbeddingSession, IndexingError>;
}
