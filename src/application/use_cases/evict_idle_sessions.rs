use std::sync::Arc;
use std::time::Duration;

use super::session_error::SessionUseCaseError;
use crate::application::services::SessionOrchestrator;
use crate::domain::repositories::SessionRepository;

/// Ends sessions nobody has touched for `idle_timeout` and releases their
/// documents, the same way an explicit close does.
pub struct EvictIdleSessionsUseCase {
    session_repository: Arc<dyn SessionRepository>,
    orchestrator: Arc<SessionOrchestrator>,
    idle_timeout: Duration,
}

impl EvictIdleSessionsUseCase {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        orchestrator: Arc<SessionOrchestrator>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            session_repository,
            orchestrator,
            idle_timeout,
        }
    }

    /// Returns how many sessions were evicted.
    pub async fn execute(&self) -> Result<usize, SessionUseCaseError> {
        let evicted = self
            .session_repository
            .evict_idle(self.idle_timeout)
            .await?;
        if evicted.is_empty() {
            return Ok(0);
        }

        let count = evicted.len();
        for (session_id, session) in evicted {
            let orchestrator = Arc::clone(&self.orchestrator);
            let released = tokio::spawn(async move {
                let mut ctx = session.lock_owned().await;
                orchestrator.release(&mut ctx).await
            })
            .await?;

            match released {
                Ok(file_removed) => {
                    tracing::info!(session = %session_id, file_removed, "idle session evicted")
                }
                Err(e) => {
                    tracing::warn!(session = %session_id, "evicted session kept its document: {}", e)
                }
            }
        }

        let remaining = self.session_repository.count().await?;
        tracing::info!(evicted = count, remaining, "idle session sweep finished");
        Ok(count)
    }
}
