use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ContentHash;

/// Handle to a populated vector store collection. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSession {
    model_id: String,
    collection_name: String,
    store_endpoint: String,
    document_hash: ContentHash,
    chunk_count: usize,
    dimension: usize,
    created_at: DateTime<Utc>,
}

impl EmbeddingSession {
    pub fn new(
        model_id: String,
        collection_name: String,
        store_endpoint: String,
        document_hash: ContentHash,
        chunk_count: usize,
        dimension: usize,
    ) -> Self {
        Self {
            model_id,
            collection_name,
            store_endpoint,
            document_hash,
            chunk_count,
            dimension,
            created_at: Utc::now(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn store_endpoint(&self) -> &str {
        &self.store_endpoint
    }

    /// Hash of the document the collection was populated from.
    pub fn document_hash(&self) -> &ContentHash {
        &self.document_hash
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
