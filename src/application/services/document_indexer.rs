use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::application::ports::{
    DocumentExtractor, DocumentIndexer, EmbeddingProvider, VectorStore,
    document_indexer::{IndexingConfig, IndexingError},
    embedding_provider::{BatchEmbeddingRequest, EmbeddingModel},
    vector_store::{ChunkPayload, VectorPoint},
};
use crate::application::services::text_splitter::{RecursiveTextSplitter, TextSplitter};
use crate::domain::entities::{DocumentReference, EmbeddingSession};

const EMBEDDING_BATCH_SIZE: usize = 16;
const UPSERT_BATCH_SIZE: usize = 64;

/// Parse → chunk → embed → upsert, against a collection that is emptied first.
pub struct RagDocumentIndexer {
    document_extractor: Arc<dyn DocumentExtractor>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    splitter: RecursiveTextSplitter,
}

impl RagDocumentIndexer {
    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        splitter: RecursiveTextSplitter,
    ) -> Self {
        Self {
            document_extractor,
            embedding_provider,
            vector_store,
            splitter,
        }
    }

    async fn embed_chunks(
        &self,
        chunks: &[String],
        model: &EmbeddingModel,
    ) -> Result<Vec<Vec<f32>>, IndexingError> {
        let mut vectors = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(EMBEDDING_BATCH_SIZE) {
            let response = self
                .embedding_provider
                .generate_embeddings(BatchEmbeddingRequest {
                    texts: batch.to_vec(),
                    model: model.clone(),
                })
                .await
                .map_err(|e| IndexingError::Embedding(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(IndexingError::Embedding(format!(
                    "expected {} vectors, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            vectors.extend(response.embeddings);
        }

        Ok(vectors)
    }
}

#[async_trait]
impl DocumentIndexer for RagDocumentIndexer {
    async fn index(
        &self,
        document: &DocumentReference,
        config: &IndexingConfig,
    ) -> Result<EmbeddingSession, IndexingError> {
        let started = Instant::now();

        let extracted = self
            .document_extractor
            .extract_text(Path::new(document.path()))
            .await
            .map_err(|e| IndexingError::Extraction(e.to_string()))?;

        for warning in &extracted.warnings {
            tracing::warn!(document = document.file_name(), "{}", warning);
        }

        let chunks = self.splitter.split_text(&extracted.text);
        if chunks.is_empty() {
            return Err(IndexingError::EmptyDocument);
        }

        let model = EmbeddingModel {
            model_id: config.embedding_model_id.clone(),
            device: config.device.clone(),
            normalize: config.normalize_embeddings,
        };
        let vectors = self.embed_chunks(&chunks, &model).await?;

        let dimension = vectors[0].len();
        if dimension == 0 || vectors.iter().any(|v| v.len() != dimension) {
            return Err(IndexingError::Embedding(
                "embedding service returned vectors of inconsistent size".to_string(),
            ));
        }

        self.vector_store
            .recreate_collection(&config.collection_name, dimension)
            .await
            .map_err(|e| IndexingError::VectorStore(e.to_string()))?;

        let chunk_count = chunks.len();
        let points: Vec<VectorPoint> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(chunk_index, (text, vector))| VectorPoint {
                id: Uuid::new_v4(),
                vector,
                payload: ChunkPayload {
                    text,
                    chunk_index,
                    source: document.file_name().to_string(),
                    document_hash: document.content_hash().to_string(),
                },
            })
            .collect();

        for batch in points.chunks(UPSERT_BATCH_SIZE) {
            self.vector_store
                .upsert(&config.collection_name, batch.to_vec())
                .await
                .map_err(|e| IndexingError::VectorStore(e.to_string()))?;
        }

        tracing::info!(
            document = document.file_name(),
            pages = extracted.page_count,
            chunks = chunk_count,
            dimension,
            collection = %config.collection_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "document indexed"
        );

        Ok(EmbeddingSession::new(
            config.embedding_model_id.clone(),
            config.collection_name.clone(),
            config.store_endpoint.clone(),
            document.content_hash().clone(),
            chunk_count,
            dimension,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        document_extractor::{DocumentExtractionError, ExtractedContent},
        embedding_provider::{
            BatchEmbeddingResponse, EmbeddingProviderError, EmbeddingRequest, EmbeddingResponse,
        },
        vector_store::{ScoredChunk, VectorStoreError},
    };
    use crate::domain::value_objects::ContentHash;
    use std::sync::Mutex;

    struct StaticExtractor(String);

    #[async_trait]
    impl DocumentExtractor for StaticExtractor {
        async fn extract_text(
            &self,
            _file_path: &Path,
        ) -> Result<ExtractedContent, DocumentExtractionError> {
            Ok(ExtractedContent {
                text: self.0.clone(),
                page_count: 1,
                warnings: Vec::new(),
            })
        }
    }

    struct LengthEmbedder;

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        async fn generate_embedding(
            &self,
            request: EmbeddingRequest,
        ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
            Ok(EmbeddingResponse {
                embedding: vec![request.text.len() as f32, 1.0, 0.0],
                model_id: request.model.model_id,
            })
        }

        async fn generate_embeddings(
            &self,
            request: BatchEmbeddingRequest,
        ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
            Ok(BatchEmbeddingResponse {
                embeddings: request
                    .texts
                    .iter()
                    .map(|t| vec![t.len() as f32, 1.0, 0.0])
                    .collect(),
                model_id: request.model.model_id,
            })
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        recreated: Mutex<Vec<(String, usize)>>,
        points: Mutex<Vec<VectorPoint>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn recreate_collection(
            &self,
            collection: &str,
            dimension: usize,
        ) -> Result<(), VectorStoreError> {
            self.recreated
                .lock()
                .unwrap()
                .push((collection.to_string(), dimension));
            Ok(())
        }

        async fn upsert(
            &self,
            _collection: &str,
            points: Vec<VectorPoint>,
        ) -> Result<usize, VectorStoreError> {
            let count = points.len();
            self.points.lock().unwrap().extend(points);
            Ok(count)
        }

        async fn search(
            &self,
            _collection: &str,
            _vector: &[f32],
            _limit: usize,
        ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
            Ok(Vec::new())
        }

        fn endpoint(&self) -> &str {
            "http://localhost:6333"
        }
    }

    fn config() -> IndexingConfig {
        IndexingConfig {
            embedding_model_id: "BAAI/bge-small-en".to_string(),
            device: "cpu".to_string(),
            normalize_embeddings: true,
            store_endpoint: "http://localhost:6333".to_string(),
            collection_name: "vector_db".to_string(),
        }
    }

    fn document() -> DocumentReference {
        DocumentReference::new(
            "temp.pdf".to_string(),
            "farm.pdf".to_string(),
            2000,
            ContentHash::of(b"farm report"),
        )
    }

    #[tokio::test]
    async fn test_index_populates_collection() {
        let store = Arc::new(RecordingStore::default());
        let indexer = RagDocumentIndexer::new(
            Arc::new(StaticExtractor(
                "Soil moisture is 45 percent.\n\nWater level is 80 percent.".to_string(),
            )),
            Arc::new(LengthEmbedder),
            store.clone(),
            RecursiveTextSplitter::new(30, 0),
        );

        let session = indexer.index(&document(), &config()).await.unwrap();

        assert_eq!(session.chunk_count(), 2);
        assert_eq!(session.dimension(), 3);
        assert_eq!(session.collection_name(), "vector_db");
        assert_eq!(session.document_hash(), &ContentHash::of(b"farm report"));
        assert_eq!(
            *store.recreated.lock().unwrap(),
            vec![("vector_db".to_string(), 3)]
        );

        let points = store.points.lock().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].payload.chunk_index, 0);
        assert_eq!(points[1].payload.source, "farm.pdf");
        assert_eq!(points[1].payload.text, "Water level is 80 percent.");
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected_before_touching_store() {
        let store = Arc::new(RecordingStore::default());
        let indexer = RagDocumentIndexer::new(
            Arc::new(StaticExtractor("  \n ".to_string())),
            Arc::new(LengthEmbedder),
            store.clone(),
            RecursiveTextSplitter::default(),
        );

        let result = indexer.index(&document(), &config()).await;

        assert!(matches!(result, Err(IndexingError::EmptyDocument)));
        assert!(store.recreated.lock().unwrap().is_empty());
    }
}
