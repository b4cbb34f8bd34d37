use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{ChatSession, DocumentReference, EmbeddingSession, MessageLog, Turn};
use crate::domain::value_objects::{SessionScope, SessionStage};

/// All state belonging to one assistant session.
///
/// Invariants held by the transition methods:
/// - `document` is present in every stage except `Empty`;
/// - `embedding` and `chat` are present together, and only in `ChatReady`;
/// - the embedding session was built from the current document.
#[derive(Debug)]
pub struct SessionContext {
    id: Uuid,
    scope: SessionScope,
    stage: SessionStage,
    document: Option<DocumentReference>,
    embedding: Option<Arc<EmbeddingSession>>,
    chat: Option<Arc<ChatSession>>,
    messages: MessageLog,
    created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(id: Uuid, scope: SessionScope) -> Self {
        Self {
            id,
            scope,
            stage: SessionStage::Empty,
            document: None,
            embedding: None,
            chat: None,
            messages: MessageLog::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scope(&self) -> &SessionScope {
        &self.scope
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    pub fn document(&self) -> Option<&DocumentReference> {
        self.document.as_ref()
    }

    pub fn embedding_session(&self) -> Option<&Arc<EmbeddingSession>> {
        self.embedding.as_ref()
    }

    pub fn chat_session(&self) -> Option<&Arc<ChatSession>> {
        self.chat.as_ref()
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// A new document invalidates whatever was indexed before it.
    pub fn attach_document(&mut self, document: DocumentReference) -> Result<(), String> {
        self.transition(SessionStage::DocumentReady)?;
        self.document = Some(document);
        self.embedding = None;
        self.chat = None;
        Ok(())
    }

    pub fn begin_indexing(&mut self) -> Result<(), String> {
        if self.document.is_none() {
            return Err("No document has been uploaded".to_string());
        }
        self.transition(SessionStage::Indexing)
    }

    pub fn activate_chat(
        &mut self,
        embedding: Arc<EmbeddingSession>,
        chat: Arc<ChatSession>,
    ) -> Result<(), String> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| "No document has been uploaded".to_string())?;

        if embedding.document_hash() != document.content_hash() {
            return Err(format!(
                "Index was built from document {} but the current document is {}",
                embedding.document_hash().short(),
                document.content_hash().short()
            ));
        }

        self.transition(SessionStage::ChatReady)?;
        self.embedding = Some(embedding);
        self.chat = Some(chat);
        Ok(())
    }

    /// Back to `DocumentReady` after a failed indexing run.
    pub fn abort_indexing(&mut self) -> Result<(), String> {
        if !self.stage.is_indexing() {
            return Err(format!("Session is not indexing (stage {})", self.stage));
        }
        self.stage = SessionStage::DocumentReady;
        self.embedding = None;
        self.chat = None;
        Ok(())
    }

    pub fn record(&mut self, turn: Turn) {
        self.messages.append(turn);
    }

    /// Drops the document and both handles at session end. The message log
    /// is kept for whoever still holds the context.
    pub fn release_document(&mut self) -> Option<DocumentReference> {
        self.embedding = None;
        self.chat = None;
        self.stage = SessionStage::Empty;
        self.document.take()
    }

    fn transition(&mut self, next: SessionStage) -> Result<(), String> {
        if !self.stage.can_transition_to(&next) {
            return Err(format!(
                "Cannot move session from {} to {}",
                self.stage, next
            ));
        }
        self.stage = next;
        Ok(())
    }
}
