use std::sync::Arc;
use uuid::Uuid;

use super::session_error::{SessionUseCaseError, find_session};
use crate::application::services::{AskOutcome, SessionOrchestrator};
use crate::domain::repositories::SessionRepository;

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub session_id: Uuid,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct AskQuestionResponse {
    pub outcome: AskOutcome,
    pub message_count: usize,
}

pub struct AskQuestionUseCase {
    session_repository: Arc<dyn SessionRepository>,
    orchestrator: Arc<SessionOrchestrator>,
}

impl AskQuestionUseCase {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        orchestrator: Arc<SessionOrchestrator>,
    ) -> Self {
        Self {
            session_repository,
            orchestrator,
        }
    }

    pub async fn execute(
        &self,
        request: AskQuestionRequest,
    ) -> Result<AskQuestionResponse, SessionUseCaseError> {
        let session = find_session(self.session_repository.as_ref(), request.session_id).await?;
        let orchestrator = Arc::clone(&self.orchestrator);

        // Detached: a user turn is never logged without its answer.
        let response = tokio::spawn(async move {
            let mut ctx = session.lock_owned().await;
            let outcome = orchestrator.ask(&mut ctx, &request.query).await;
            AskQuestionResponse {
                outcome,
                message_count: ctx.messages().len(),
            }
        })
        .await?;

        Ok(response)
    }
}
