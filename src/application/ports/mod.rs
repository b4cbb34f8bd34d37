pub mod chat_responder;
pub mod document_extractor;
pub mod document_indexer;
pub mod document_store;
pub mod embedding_provider;
pub mod language_model;
pub mod vector_store;

pub use chat_responder::ChatResponder;
pub use document_extractor::DocumentExtractor;
pub use document_indexer::DocumentIndexer;
pub use document_store::DocumentStore;
pub use embedding_provider::EmbeddingProvider;
pub use language_model::LanguageModel;
pub use vector_store::VectorStore;
