use std::sync::Arc;
use std::time::Duration;

use crate::{
    application::{
        ports::{ChatResponder, DocumentExtractor, DocumentIndexer, DocumentStore, EmbeddingProvider, LanguageModel, VectorStore},
        services::{RagDocumentIndexer, RecursiveTextSplitter, RetrievalQaResponder, SessionOrchestrator},
        use_cases::{
            AskQuestionUseCase, CloseSessionUseCase, CreateSessionUseCase, EvictIdleSessionsUseCase,
            GetSessionUseCase, ListMessagesUseCase, ProcessDocumentUseCase, ScopePolicy, UploadDocumentUseCase,
        },
    },
    domain::repositories::SessionRepository,
    infrastructure::{
        background::SessionReaper,
        config::AppConfig,
        external_services::{
            InferenceClient, InferenceEmbeddingProvider, OllamaLanguageModel, QdrantVectorStore,
            document_extractors::PdfExtractor,
        },
        file_system::LocalTempDocumentStore,
        memory::InMemorySessionRepository,
    },
    presentation::http::{HttpServer, handlers::SessionHandler},
};

pub struct AppContainer {
    // Repositories
    pub session_repository: Arc<dyn SessionRepository>,

    // External Services
    pub document_store: Arc<dyn DocumentStore>,
    pub document_extractor: Arc<dyn DocumentExtractor>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub vector_store: Arc<dyn VectorStore>,
    pub language_model: Arc<dyn LanguageModel>,

    // Application Services
    pub document_indexer: Arc<dyn DocumentIndexer>,
    pub chat_responder: Arc<dyn ChatResponder>,
    pub orchestrator: Arc<SessionOrchestrator>,

    // Background Tasks
    pub session_reaper: Option<Arc<SessionReaper>>,

    // HTTP Handlers
    pub session_handler: Arc<SessionHandler>,

    port: u16,
    max_upload_bytes: usize,
}

impl AppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        // Repositories
        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(InMemorySessionRepository::new(config.storage.max_sessions));

        // External Services
        let document_store: Arc<dyn DocumentStore> =
            Arc::new(LocalTempDocumentStore::new(config.storage.upload_dir.clone()));
        let document_extractor: Arc<dyn DocumentExtractor> = Arc::new(PdfExtractor::new());

        let inference_client = InferenceClient::new(config.embeddings_service.clone())?;
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(InferenceEmbeddingProvider::new(inference_client));

        let vector_store: Arc<dyn VectorStore> = Arc::new(QdrantVectorStore::new(
            &config.indexing.store_endpoint,
            config.embeddings_service.timeout_secs,
        )?);
        let language_model: Arc<dyn LanguageModel> =
            Arc::new(OllamaLanguageModel::new(&config.language_model)?);

        // Application Services
        let document_indexer: Arc<dyn DocumentIndexer> = Arc::new(RagDocumentIndexer::new(
            document_extractor.clone(),
            embedding_provider.clone(),
            vector_store.clone(),
            RecursiveTextSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap),
        ));
        let chat_responder: Arc<dyn ChatResponder> = Arc::new(RetrievalQaResponder::new(
            embedding_provider.clone(),
            vector_store.clone(),
            language_model.clone(),
        ));
        let orchestrator = Arc::new(SessionOrchestrator::new(
            document_store.clone(),
            document_indexer.clone(),
            chat_responder.clone(),
            config.indexing.clone(),
            config.chat.clone(),
        ));

        // Use Cases
        let scope_policy = ScopePolicy {
            isolate_sessions: config.storage.isolate_sessions,
            document_file_name: config.storage.document_file_name.clone(),
            collection_name: config.indexing.collection_name.clone(),
        };
        let create_session_use_case = Arc::new(CreateSessionUseCase::new(
            session_repository.clone(),
            scope_policy,
        ));
        let get_session_use_case = Arc::new(GetSessionUseCase::new(session_repository.clone()));
        let close_session_use_case = Arc::new(CloseSessionUseCase::new(
            session_repository.clone(),
            orchestrator.clone(),
        ));
        let upload_document_use_case = Arc::new(UploadDocumentUseCase::new(
            session_repository.clone(),
            orchestrator.clone(),
        ));
        let process_document_use_case = Arc::new(ProcessDocumentUseCase::new(
            session_repository.clone(),
            orchestrator.clone(),
        ));
        let ask_question_use_case = Arc::new(AskQuestionUseCase::new(
            session_repository.clone(),
            orchestrator.clone(),
        ));
        let list_messages_use_case =
            Arc::new(ListMessagesUseCase::new(session_repository.clone()));

        // Background Tasks
        let session_reaper = (config.storage.session_idle_timeout_secs > 0).then(|| {
            let evict_idle_sessions_use_case = Arc::new(EvictIdleSessionsUseCase::new(
                session_repository.clone(),
                orchestrator.clone(),
                Duration::from_secs(config.storage.session_idle_timeout_secs),
            ));
            Arc::new(SessionReaper::new(
                evict_idle_sessions_use_case,
                Duration::from_secs(config.storage.session_sweep_interval_secs),
            ))
        });

        // HTTP Handlers
        let session_handler = Arc::new(SessionHandler::new(
            create_session_use_case,
            get_session_use_case,
            close_session_use_case,
            upload_document_use_case,
            process_document_use_case,
            ask_question_use_case,
            list_messages_use_case,
        ));

        Ok(Self {
            session_repository,
            document_store,
            document_extractor,
            embedding_provider,
            vector_store,
            language_model,
            document_indexer,
            chat_responder,
            orchestrator,
            session_reaper,
            session_handler,
            port: config.server.port,
            max_upload_bytes: config.server.max_upload_bytes,
        })
    }

    pub fn http_server(&self) -> HttpServer {
        let server = HttpServer::new(self.session_handler.clone(), self.port, self.max_upload_bytes);
        match &self.session_reaper {
            Some(reaper) => server.with_session_reaper(reaper.clone()),
            None => server,
        }
    }
}
