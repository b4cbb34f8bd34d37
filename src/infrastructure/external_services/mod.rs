pub mod document_extractors;
pub mod inference_client;
pub mod ollama_client;
pub mod qdrant_client;

pub use inference_client::{InferenceClient, InferenceEmbeddingProvider};
pub use ollama_client::OllamaLanguageModel;
pub use qdrant_client::QdrantVectorStore;
