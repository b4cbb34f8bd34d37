use std::sync::Arc;
use uuid::Uuid;

use super::session_error::SessionUseCaseError;
use crate::application::services::SessionOrchestrator;
use crate::domain::repositories::SessionRepository;

pub struct CloseSessionUseCase {
    session_repository: Arc<dyn SessionRepository>,
    orchestrator: Arc<SessionOrchestrator>,
}

impl CloseSessionUseCase {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        orchestrator: Arc<SessionOrchestrator>,
    ) -> Self {
        Self {
            session_repository,
            orchestrator,
        }
    }

    /// Forgets the session and releases its document once any in-flight
    /// call has finished. Returns whether a stored file was deleted.
    pub async fn execute(&self, session_id: Uuid) -> Result<bool, SessionUseCaseError> {
        let session = self
            .session_repository
            .remove(session_id)
            .await?
            .ok_or(SessionUseCaseError::SessionNotFound(session_id))?;
        let orchestrator = Arc::clone(&self.orchestrator);

        let removed = tokio::spawn(async move {
            let mut ctx = session.lock_owned().await;
            orchestrator.release(&mut ctx).await
        })
        .await?
        .map_err(|e| SessionUseCaseError::Storage(e.to_string()))?;

        tracing::info!(session = %session_id, file_removed = removed, "session closed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{harness, pdf_bytes};
    use crate::domain::entities::SessionContext;
    use crate::domain::value_objects::SessionScope;
    use crate::infrastructure::memory::InMemorySessionRepository;

    #[tokio::test]
    async fn test_close_releases_document_and_forgets_session() {
        let h = harness();
        let repo = Arc::new(InMemorySessionRepository::new(10));
        let id = Uuid::new_v4();
        let shared = repo
            .insert(SessionContext::new(id, SessionScope::isolated(id, "temp.pdf", "vector_db")))
            .await
            .unwrap();
        h.orchestrator
            .upload(&mut *shared.lock().await, &pdf_bytes(64), "farm.pdf")
            .await
            .unwrap();
        let use_case = CloseSessionUseCase::new(repo.clone(), h.orchestrator.clone());

        assert!(use_case.execute(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(h.store.slots.lock().unwrap().is_empty());

        let again = use_case.execute(id).await;
        assert!(matches!(again, Err(SessionUseCaseError::SessionNotFound(_))));
    }
}
