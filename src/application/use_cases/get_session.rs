use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::session_error::{SessionUseCaseError, find_session};
use crate::domain::entities::{DocumentReference, SessionContext};
use crate::domain::repositories::SessionRepository;
use crate::domain::value_objects::SessionStage;

/// Point-in-time view of a session.
///
/// While an upload, processing run or question holds the session, only `id`
/// and `busy` are known; every other field is left empty.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: Uuid,
    pub busy: bool,
    pub stage: Option<SessionStage>,
    pub document: Option<DocumentReference>,
    pub chunk_count: Option<usize>,
    pub collection_name: Option<String>,
    pub llm_model_id: Option<String>,
    pub message_count: Option<usize>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    pub fn of(ctx: &SessionContext) -> Self {
        Self {
            id: ctx.id(),
            busy: false,
            stage: Some(ctx.stage()),
            document: ctx.document().cloned(),
            chunk_count: ctx.embedding_session().map(|e| e.chunk_count()),
            collection_name: Some(ctx.scope().collection_name().to_string()),
            llm_model_id: ctx.chat_session().map(|c| c.llm_model_id().to_string()),
            message_count: Some(ctx.messages().len()),
            created_at: Some(ctx.created_at()),
        }
    }

    pub fn busy(id: Uuid) -> Self {
        Self {
            id,
            busy: true,
            stage: None,
            document: None,
            chunk_count: None,
            collection_name: None,
            llm_model_id: None,
            message_count: None,
            created_at: None,
        }
    }
}

pub struct GetSessionUseCase {
    session_repository: Arc<dyn SessionRepository>,
}

impl GetSessionUseCase {
    pub fn new(session_repository: Arc<dyn SessionRepository>) -> Self {
        Self { session_repository }
    }

    pub async fn execute(&self, session_id: Uuid) -> Result<SessionSummary, SessionUseCaseError> {
        let session = find_session(self.session_repository.as_ref(), session_id).await?;

        let summary = match session.try_lock() {
            Ok(ctx) => SessionSummary::of(&ctx),
            Err(_) => SessionSummary::busy(session_id),
        };
        Ok(summary)
    }
}
