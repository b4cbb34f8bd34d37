use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::{
    ChatResponder, DocumentIndexer, DocumentStore,
    chat_responder::ChatConfig,
    document_indexer::IndexingConfig,
    document_store::DocumentStoreError,
};
use crate::domain::entities::{ChatSession, DocumentReference, EmbeddingSession, SessionContext, Turn};
use crate::domain::value_objects::SessionStage;

pub const UPLOAD_FIRST_WARNING: &str = "Please upload a document first.";
pub const CHAT_GUIDANCE: &str = "Please upload a document and process it to start chatting.";
pub const EMPTY_QUESTION_GUIDANCE: &str = "Please enter a question about your document.";
pub const INDEXED_NOTICE: &str = "Vector DB successfully created and stored in Qdrant!";
pub const ALREADY_INDEXED_NOTICE: &str = "Document is already processed and ready for questions.";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(#[from] DocumentStoreError),
    #[error("Session error: {0}")]
    InvalidState(String),
}

#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// Nothing uploaded yet. No state change.
    NoDocument { warning: String },
    /// Index and chat handle already exist and are returned as-is.
    AlreadyReady { chat: Arc<ChatSession> },
    Indexed {
        notice: String,
        embedding: Arc<EmbeddingSession>,
        chat: Arc<ChatSession>,
    },
    /// Session is back in `DocumentReady`; processing may be retried.
    Failed { message: String },
}

impl ProcessOutcome {
    pub fn message(&self) -> &str {
        match self {
            ProcessOutcome::NoDocument { warning } => warning,
            ProcessOutcome::AlreadyReady { .. } => ALREADY_INDEXED_NOTICE,
            ProcessOutcome::Indexed { notice, .. } => notice,
            ProcessOutcome::Failed { message } => message,
        }
    }

    pub fn chat_session(&self) -> Option<&Arc<ChatSession>> {
        match self {
            ProcessOutcome::AlreadyReady { chat } | ProcessOutcome::Indexed { chat, .. } => {
                Some(chat)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AskOutcome {
    /// The question was not sent and the log is untouched.
    Guidance(String),
    Answered(Turn),
    /// The assistant turn carries the error text.
    Failed(Turn),
}

/// Sequences upload → process → ask for one session at a time.
///
/// Holds no session state itself; every operation works on the context it is
/// handed, and the caller is expected to hold that context's lock for the
/// whole call.
pub struct SessionOrchestrator {
    document_store: Arc<dyn DocumentStore>,
    indexer: Arc<dyn DocumentIndexer>,
    responder: Arc<dyn ChatResponder>,
    indexing_config: IndexingConfig,
    chat_config: ChatConfig,
}

impl SessionOrchestrator {
    pub fn new(
        document_store: Arc<dyn DocumentStore>,
        indexer: Arc<dyn DocumentIndexer>,
        responder: Arc<dyn ChatResponder>,
        indexing_config: IndexingConfig,
        chat_config: ChatConfig,
    ) -> Self {
        Self {
            document_store,
            indexer,
            responder,
            indexing_config,
            chat_config,
        }
    }

    pub async fn upload(
        &self,
        ctx: &mut SessionContext,
        data: &[u8],
        file_name: &str,
    ) -> Result<DocumentReference, UploadError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(UploadError::Validation("File name cannot be empty".to_string()));
        }
        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(UploadError::Validation(format!(
                "Only PDF documents are accepted, got {}",
                file_name
            )));
        }
        if data.is_empty() {
            return Err(UploadError::Validation("File data cannot be empty".to_string()));
        }

        let reference = self
            .document_store
            .store(ctx.scope(), data, file_name)
            .await
            .inspect_err(|e| {
                tracing::error!(session = %ctx.id(), error = %e, "document upload failed")
            })?;

        let replaced = ctx.stage().is_chat_ready();
        ctx.attach_document(reference.clone())
            .map_err(UploadError::InvalidState)?;

        tracing::info!(
            session = %ctx.id(),
            file_name = reference.file_name(),
            size = reference.size(),
            hash = reference.content_hash().short(),
            replaced_index = replaced,
            "document uploaded"
        );

        Ok(reference)
    }

    pub async fn process(&self, ctx: &mut SessionContext) -> ProcessOutcome {
        match ctx.stage() {
            SessionStage::Empty => {
                tracing::warn!(session = %ctx.id(), "processing requested before upload");
                return ProcessOutcome::NoDocument {
                    warning: UPLOAD_FIRST_WARNING.to_string(),
                };
            }
            SessionStage::ChatReady => {
                if let Some(chat) = ctx.chat_session() {
                    tracing::debug!(session = %ctx.id(), "document already indexed");
                    return ProcessOutcome::AlreadyReady { chat: chat.clone() };
                }
            }
            SessionStage::Indexing => {
                // Only reachable when an earlier run died while holding the lock.
                tracing::warn!(session = %ctx.id(), "resetting interrupted indexing run");
                if let Err(e) = ctx.abort_indexing() {
                    return ProcessOutcome::Failed { message: e };
                }
            }
            SessionStage::DocumentReady => {}
        }

        let Some(document) = ctx.document().cloned() else {
            return ProcessOutcome::NoDocument {
                warning: UPLOAD_FIRST_WARNING.to_string(),
            };
        };

        if let Err(e) = ctx.begin_indexing() {
            return ProcessOutcome::Failed { message: e };
        }

        let collection = ctx.scope().collection_name().to_string();
        let indexing_config = self.indexing_config.for_collection(&collection);

        tracing::info!(
            session = %ctx.id(),
            file_name = document.file_name(),
            collection = %collection,
            "indexing document"
        );

        let embedding = match self.indexer.index(&document, &indexing_config).await {
            Ok(embedding) => Arc::new(embedding),
            Err(e) => return self.roll_back(ctx, e.to_string()),
        };

        let chat_config = self.chat_config.for_collection(&collection);
        let chat = match self.responder.initialize(&chat_config).await {
            Ok(chat) => Arc::new(chat),
            Err(e) => return self.roll_back(ctx, e.to_string()),
        };

        if let Err(e) = ctx.activate_chat(embedding.clone(), chat.clone()) {
            return self.roll_back(ctx, e);
        }

        tracing::info!(
            session = %ctx.id(),
            chunks = embedding.chunk_count(),
            "chat session ready"
        );

        ProcessOutcome::Indexed {
            notice: INDEXED_NOTICE.to_string(),
            embedding,
            chat,
        }
    }

    pub async fn ask(&self, ctx: &mut SessionContext, query: &str) -> AskOutcome {
        let chat = match (ctx.stage(), ctx.chat_session()) {
            (SessionStage::ChatReady, Some(chat)) => chat.clone(),
            _ => return AskOutcome::Guidance(CHAT_GUIDANCE.to_string()),
        };

        let query = query.trim();
        if query.is_empty() {
            return AskOutcome::Guidance(EMPTY_QUESTION_GUIDANCE.to_string());
        }

        ctx.record(Turn::user(query));

        match self.responder.ask(&chat, query).await {
            Ok(answer) => {
                let turn = Turn::assistant(answer);
                ctx.record(turn.clone());
                AskOutcome::Answered(turn)
            }
            Err(e) => {
                tracing::error!(session = %ctx.id(), error = %e, "question failed");
                let turn = Turn::assistant(format!(
                    "An error occurred while answering your question: {}",
                    e
                ));
                ctx.record(turn.clone());
                AskOutcome::Failed(turn)
            }
        }
    }

    /// Session end. Returns whether a stored file was removed.
    pub async fn release(&self, ctx: &mut SessionContext) -> Result<bool, DocumentStoreError> {
        if ctx.release_document().is_none() {
            return Ok(false);
        }
        self.document_store.release(ctx.scope()).await
    }

    fn roll_back(&self, ctx: &mut SessionContext, cause: String) -> ProcessOutcome {
        tracing::error!(session = %ctx.id(), error = %cause, "document processing failed");
        if let Err(e) = ctx.abort_indexing() {
            tracing::warn!(session = %ctx.id(), "{}", e);
        }
        ProcessOutcome::Failed {
            message: format!("An error occurred: {}", cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{Harness, harness, pdf_bytes};
    use crate::domain::entities::Role;
    use crate::domain::value_objects::{ContentHash, SessionScope};
    use std::sync::atomic::Ordering;
    use uuid::Uuid;

    fn context() -> SessionContext {
        SessionContext::new(Uuid::new_v4(), SessionScope::shared("temp.pdf", "vector_db"))
    }

    async fn ready_context(h: &Harness) -> SessionContext {
        let mut ctx = context();
        h.orchestrator
            .upload(&mut ctx, &pdf_bytes(2000), "farm.pdf")
            .await
            .unwrap();
        assert!(matches!(
            h.orchestrator.process(&mut ctx).await,
            ProcessOutcome::Indexed { .. }
        ));
        ctx
    }

    #[tokio::test]
    async fn test_scenario_a_upload_process_ask() {
        let h = harness();
        let mut ctx = context();

        let reference = h
            .orchestrator
            .upload(&mut ctx, &pdf_bytes(2000), "farm.pdf")
            .await
            .unwrap();
        assert_eq!(reference.size(), 2000);
        assert_eq!(ctx.stage(), SessionStage::DocumentReady);

        let outcome = h.orchestrator.process(&mut ctx).await;
        assert_eq!(outcome.message(), INDEXED_NOTICE);
        assert!(outcome.chat_session().is_some());
        assert_eq!(ctx.stage(), SessionStage::ChatReady);

        let answer = h
            .orchestrator
            .ask(&mut ctx, "What is the soil moisture?")
            .await;
        assert!(matches!(answer, AskOutcome::Answered(_)));

        let log = ctx.messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log.all()[0].role(), Role::User);
        assert_eq!(log.all()[0].text(), "What is the soil moisture?");
        assert_eq!(log.last().unwrap().role(), Role::Assistant);
        assert_eq!(
            log.last().unwrap().text(),
            "Answer to: What is the soil moisture?"
        );
    }

    #[tokio::test]
    async fn test_scenario_b_process_without_upload() {
        let h = harness();
        let mut ctx = context();

        let outcome = h.orchestrator.process(&mut ctx).await;

        assert!(matches!(outcome, ProcessOutcome::NoDocument { .. }));
        assert_eq!(outcome.message(), UPLOAD_FIRST_WARNING);
        assert_eq!(ctx.stage(), SessionStage::Empty);
        assert!(ctx.messages().is_empty());
        assert_eq!(h.indexer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scenario_c_indexing_failure_keeps_document_ready() {
        let h = harness();
        h.indexer.fail.store(true, Ordering::SeqCst);
        let mut ctx = context();
        h.orchestrator
            .upload(&mut ctx, &pdf_bytes(2000), "farm.pdf")
            .await
            .unwrap();

        let outcome = h.orchestrator.process(&mut ctx).await;

        match &outcome {
            ProcessOutcome::Failed { message } => assert!(message.contains("connection refused")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(ctx.stage(), SessionStage::DocumentReady);
        assert!(ctx.embedding_session().is_none());
        assert!(ctx.chat_session().is_none());

        let reply = h.orchestrator.ask(&mut ctx, "Anything?").await;
        assert!(matches!(reply, AskOutcome::Guidance(_)));
        assert_eq!(h.responder.asked.load(Ordering::SeqCst), 0);

        // Retry succeeds once the collaborator recovers.
        h.indexer.fail.store(false, Ordering::SeqCst);
        let retry = h.orchestrator.process(&mut ctx).await;
        assert!(matches!(retry, ProcessOutcome::Indexed { .. }));
        assert_eq!(ctx.stage(), SessionStage::ChatReady);
    }

    #[tokio::test]
    async fn test_chat_initialize_failure_rolls_back_fresh_index() {
        let h = harness();
        h.responder.fail_initialize.store(true, Ordering::SeqCst);
        let mut ctx = context();
        h.orchestrator
            .upload(&mut ctx, &pdf_bytes(2000), "farm.pdf")
            .await
            .unwrap();

        let outcome = h.orchestrator.process(&mut ctx).await;

        match &outcome {
            ProcessOutcome::Failed { message } => assert!(message.contains("unknown model")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(h.indexer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.stage(), SessionStage::DocumentReady);
        assert!(ctx.embedding_session().is_none());
        assert!(ctx.chat_session().is_none());
        assert!(ctx.document().is_some());

        h.responder.fail_initialize.store(false, Ordering::SeqCst);
        let retry = h.orchestrator.process(&mut ctx).await;
        assert!(matches!(retry, ProcessOutcome::Indexed { .. }));
        assert_eq!(ctx.stage(), SessionStage::ChatReady);
        assert!(ctx.embedding_session().is_some());
    }

    #[tokio::test]
    async fn test_interrupted_indexing_run_can_be_retried() {
        let h = harness();
        let mut ctx = context();
        h.orchestrator
            .upload(&mut ctx, &pdf_bytes(2000), "farm.pdf")
            .await
            .unwrap();
        ctx.begin_indexing().unwrap();
        assert_eq!(ctx.stage(), SessionStage::Indexing);

        let outcome = h.orchestrator.process(&mut ctx).await;

        assert!(matches!(outcome, ProcessOutcome::Indexed { .. }));
        assert_eq!(ctx.stage(), SessionStage::ChatReady);
        assert_eq!(h.indexer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scenario_d_chat_failure_is_logged_as_answer() {
        let h = harness();
        let mut ctx = ready_context(&h).await;
        h.responder.fail_next.store(true, Ordering::SeqCst);

        let outcome = h.orchestrator.ask(&mut ctx, "What is the pH?").await;

        match outcome {
            AskOutcome::Failed(turn) => {
                assert_eq!(turn.role(), Role::Assistant);
                assert!(turn.text().contains("model not loaded"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(ctx.messages().len(), 2);
        assert_eq!(ctx.stage(), SessionStage::ChatReady);

        let next = h.orchestrator.ask(&mut ctx, "And the moisture?").await;
        assert!(matches!(next, AskOutcome::Answered(_)));
        assert_eq!(ctx.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_processing_twice_indexes_once() {
        let h = harness();
        let mut ctx = ready_context(&h).await;
        let first = ctx.chat_session().cloned().unwrap();

        let again = h.orchestrator.process(&mut ctx).await;

        match again {
            ProcessOutcome::AlreadyReady { chat } => assert!(Arc::ptr_eq(&chat, &first)),
            other => panic!("expected already ready, got {:?}", other),
        }
        assert_eq!(h.indexer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_questions_before_ready_never_reach_responder() {
        let h = harness();
        let mut ctx = context();

        assert!(matches!(
            h.orchestrator.ask(&mut ctx, "hello?").await,
            AskOutcome::Guidance(_)
        ));

        h.orchestrator
            .upload(&mut ctx, &pdf_bytes(100), "farm.pdf")
            .await
            .unwrap();
        assert!(matches!(
            h.orchestrator.ask(&mut ctx, "hello?").await,
            AskOutcome::Guidance(_)
        ));

        assert!(ctx.messages().is_empty());
        assert_eq!(h.responder.asked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_log_grows_by_two_per_cycle() {
        let h = harness();
        let mut ctx = ready_context(&h).await;

        for k in 1..=5 {
            if k % 2 == 0 {
                h.responder.fail_next.store(true, Ordering::SeqCst);
            }
            h.orchestrator.ask(&mut ctx, &format!("question {}", k)).await;
            assert_eq!(ctx.messages().len(), 2 * k);
        }
    }

    #[tokio::test]
    async fn test_new_upload_overwrites_and_resets() {
        let h = harness();
        let mut ctx = ready_context(&h).await;
        h.orchestrator.ask(&mut ctx, "first question").await;

        for n in 1..=3u8 {
            let data = vec![b'%', b'P', b'D', b'F', n];
            h.orchestrator
                .upload(&mut ctx, &data, "report.pdf")
                .await
                .unwrap();

            assert_eq!(ctx.stage(), SessionStage::DocumentReady);
            assert!(ctx.embedding_session().is_none());
            assert!(ctx.chat_session().is_none());
            assert_eq!(ctx.document().unwrap().content_hash(), &ContentHash::of(&data));
            assert_eq!(h.store.slots.lock().unwrap()["temp.pdf"], data);
        }
        assert_eq!(ctx.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_question_is_ignored() {
        let h = harness();
        let mut ctx = ready_context(&h).await;

        let outcome = h.orchestrator.ask(&mut ctx, "  \n").await;
        assert!(matches!(outcome, AskOutcome::Guidance(_)));
        assert!(ctx.messages().is_empty());
    }

    #[tokio::test]
    async fn test_upload_validation_and_io_failure_leave_session_unchanged() {
        let h = harness();
        let mut ctx = ready_context(&h).await;

        let empty = h.orchestrator.upload(&mut ctx, &[], "farm.pdf").await;
        assert!(matches!(empty, Err(UploadError::Validation(_))));

        let wrong_type = h
            .orchestrator
            .upload(&mut ctx, b"hello", "notes.txt")
            .await;
        assert!(matches!(wrong_type, Err(UploadError::Validation(_))));

        h.store.fail_writes.store(true, Ordering::SeqCst);
        let io = h
            .orchestrator
            .upload(&mut ctx, &pdf_bytes(10), "farm.pdf")
            .await;
        assert!(matches!(io, Err(UploadError::Storage(_))));

        assert_eq!(ctx.stage(), SessionStage::ChatReady);
        assert!(ctx.chat_session().is_some());
    }

    #[tokio::test]
    async fn test_release_drops_document() {
        let h = harness();
        let mut ctx = ready_context(&h).await;

        assert!(h.orchestrator.release(&mut ctx).await.unwrap());
        assert_eq!(ctx.stage(), SessionStage::Empty);
        assert!(ctx.document().is_none());
        assert!(!h.orchestrator.release(&mut ctx).await.unwrap());
    }
}
