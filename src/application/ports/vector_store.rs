use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Vector store rejected request: {0}")]
    ApiError(String),
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// What gets stored next to each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub text: String,
    pub chunk_index: usize,
    pub source: String,
    pub document_hash: String,
}

#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub score: f32,
    pub payload: ChunkPayload,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Drops `collection` if present and creates it empty for vectors of `dimension`.
    async fn recreate_collection(
        &self,
        collection: &str,
        dimension: usize,
    ) -> Result<(), VectorStoreError>;

    async fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> Result<usize, VectorStoreError>;

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError>;

    fn endpoint(&self) -> &str;
}
