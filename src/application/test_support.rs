//! In-process stand-ins for the document store and both collaborators.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{
    ChatResponder, DocumentIndexer, DocumentStore,
    chat_responder::{ChatConfig, ChatError},
    document_indexer::{IndexingConfig, IndexingError},
    document_store::DocumentStoreError,
};
use crate::application::services::SessionOrchestrator;
use crate::domain::entities::{ChatSession, DocumentReference, EmbeddingSession};
use crate::domain::value_objects::{ContentHash, SessionScope};

#[derive(Default)]
pub(crate) struct MemoryStore {
    pub(crate) slots: Mutex<HashMap<String, Vec<u8>>>,
    pub(crate) fail_writes: AtomicBool,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn store(
        &self,
        scope: &SessionScope,
        data: &[u8],
        file_name: &str,
    ) -> Result<DocumentReference, DocumentStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::IoError("read-only file system".to_string()));
        }
        self.slots
            .lock()
            .unwrap()
            .insert(scope.document_slot().to_string(), data.to_vec());
        Ok(DocumentReference::new(
            scope.document_slot().to_string(),
            file_name.to_string(),
            data.len() as u64,
            ContentHash::of(data),
        ))
    }

    async fn release(&self, scope: &SessionScope) -> Result<bool, DocumentStoreError> {
        Ok(self
            .slots
            .lock()
            .unwrap()
            .remove(scope.document_slot())
            .is_some())
    }
}

#[derive(Default)]
pub(crate) struct CountingIndexer {
    pub(crate) calls: AtomicUsize,
    pub(crate) fail: AtomicBool,
}

#[async_trait]
impl DocumentIndexer for CountingIndexer {
    async fn index(
        &self,
        document: &DocumentReference,
        config: &IndexingConfig,
    ) -> Result<EmbeddingSession, IndexingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(IndexingError::VectorStore(
                "Network error: connection refused".to_string(),
            ));
        }
        Ok(EmbeddingSession::new(
            config.embedding_model_id.clone(),
            config.collection_name.clone(),
            config.store_endpoint.clone(),
            document.content_hash().clone(),
            4,
            384,
        ))
    }
}

#[derive(Default)]
pub(crate) struct ScriptedResponder {
    pub(crate) asked: AtomicUsize,
    pub(crate) fail_next: AtomicBool,
    pub(crate) fail_initialize: AtomicBool,
}

#[async_trait]
impl ChatResponder for ScriptedResponder {
    async fn initialize(&self, config: &ChatConfig) -> Result<ChatSession, ChatError> {
        if self.fail_initialize.load(Ordering::SeqCst) {
            return Err(ChatError::InvalidConfig("unknown model llama3.2:3b".to_string()));
        }
        Ok(ChatSession::new(
            config.llm_model_id.clone(),
            "http://localhost:11434".to_string(),
            config.llm_temperature,
            config.embedding_model_id.clone(),
            config.device.clone(),
            config.normalize_embeddings,
            config.collection_name.clone(),
            config.top_k,
        ))
    }

    async fn ask(&self, _session: &ChatSession, query: &str) -> Result<String, ChatError> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ChatError::Inference("model not loaded".to_string()));
        }
        Ok(format!("Answer to: {}", query))
    }
}

pub(crate) fn indexing_config() -> IndexingConfig {
    IndexingConfig {
        embedding_model_id: "BAAI/bge-small-en".to_string(),
        device: "cpu".to_string(),
        normalize_embeddings: true,
        store_endpoint: "http://localhost:6333".to_string(),
        collection_name: "vector_db".to_string(),
    }
}

pub(crate) fn chat_config() -> ChatConfig {
    ChatConfig {
        embedding_model_id: "BAAI/bge-small-en".to_string(),
        device: "cpu".to_string(),
        normalize_embeddings: true,
        llm_model_id: "llama3.2:3b".to_string(),
        llm_temperature: 0.7,
        store_endpoint: "http://localhost:6333".to_string(),
        collection_name: "vector_db".to_string(),
        top_k: 1,
    }
}

pub(crate) struct Harness {
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) indexer: Arc<CountingIndexer>,
    pub(crate) responder: Arc<ScriptedResponder>,
    pub(crate) orchestrator: Arc<SessionOrchestrator>,
}

pub(crate) fn harness() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let indexer = Arc::new(CountingIndexer::default());
    let responder = Arc::new(ScriptedResponder::default());
    let orchestrator = Arc::new(SessionOrchestrator::new(
        store.clone(),
        indexer.clone(),
        responder.clone(),
        indexing_config(),
        chat_config(),
    ));
    Harness {
        store,
        indexer,
        responder,
        orchestrator,
    }
}

pub(crate) fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(len, b'x');
    data
}
