use std::sync::Arc;
use uuid::Uuid;

use super::session_error::{SessionUseCaseError, find_session};
use crate::application::services::{ProcessOutcome, SessionOrchestrator};
use crate::domain::repositories::SessionRepository;
use crate::domain::value_objects::SessionStage;

#[derive(Debug, Clone)]
pub struct ProcessDocumentResponse {
    pub outcome: ProcessOutcome,
    pub stage: SessionStage,
}

pub struct ProcessDocumentUseCase {
    session_repository: Arc<dyn SessionRepository>,
    orchestrator: Arc<SessionOrchestrator>,
}

impl ProcessDocumentUseCase {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        orchestrator: Arc<SessionOrchestrator>,
    ) -> Self {
        Self {
            session_repository,
            orchestrator,
        }
    }

    /// Indexes the session's document and opens the chat. Collaborator
    /// failures come back as `ProcessOutcome::Failed`, not as `Err`.
    pub async fn execute(
        &self,
        session_id: Uuid,
    ) -> Result<ProcessDocumentResponse, SessionUseCaseError> {
        let session = find_session(self.session_repository.as_ref(), session_id).await?;
        let orchestrator = Arc::clone(&self.orchestrator);

        // The session must never be left in INDEXING because a client went away.
        let response = tokio::spawn(async move {
            let mut ctx = session.lock_owned().await;
            let outcome = orchestrator.process(&mut ctx).await;
            ProcessDocumentResponse {
                outcome,
                stage: ctx.stage(),
            }
        })
        .await?;

        Ok(response)
    }
}
