use std::sync::Arc;
use uuid::Uuid;

use super::session_error::{SessionUseCaseError, find_session};
use crate::application::services::SessionOrchestrator;
use crate::domain::entities::DocumentReference;
use crate::domain::repositories::SessionRepository;
use crate::domain::value_objects::SessionStage;

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub session_id: Uuid,
    pub file_name: String,
    pub file_data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub document: DocumentReference,
    pub stage: SessionStage,
}

pub struct UploadDocumentUseCase {
    session_repository: Arc<dyn SessionRepository>,
    orchestrator: Arc<SessionOrchestrator>,
}

impl UploadDocumentUseCase {
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
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, SessionUseCaseError> {
        let session = find_session(self.session_repository.as_ref(), request.session_id).await?;
        let orchestrator = Arc::clone(&self.orchestrator);

        // Detached: a dropped request must not abandon the write half way.
        tokio::spawn(async move {
            let mut ctx = session.lock_owned().await;
            let document = orchestrator
                .upload(&mut ctx, &request.file_data, &request.file_name)
                .await?;
            Ok::<_, SessionUseCaseError>(UploadDocumentResponse {
                document,
                stage: ctx.stage(),
            })
        })
        .await?
    }
}
