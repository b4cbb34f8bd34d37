use std::sync::Arc;
use uuid::Uuid;

use super::get_session::SessionSummary;
use super::session_error::SessionUseCaseError;
use crate::domain::entities::SessionContext;
use crate::domain::repositories::SessionRepository;
use crate::domain::value_objects::SessionScope;

/// Decides where a new session keeps its document and vectors.
#[derive(Debug, Clone)]
pub struct ScopePolicy {
    pub isolate_sessions: bool,
    pub document_file_name: String,
    pub collection_name: String,
}

impl ScopePolicy {
    pub fn scope_for(&self, session_id: Uuid) -> SessionScope {
        if self.isolate_sessions {
            SessionScope::isolated(session_id, &self.document_file_name, &self.collection_name)
        } else {
            SessionScope::shared(&self.document_file_name, &self.collection_name)
        }
    }
}

pub struct CreateSessionUseCase {
    session_repository: Arc<dyn SessionRepository>,
    scope_policy: ScopePolicy,
}

impl CreateSessionUseCase {
    pub fn new(session_repository: Arc<dyn SessionRepository>, scope_policy: ScopePolicy) -> Self {
        Self {
            session_repository,
            scope_policy,
        }
    }

    pub async fn execute(&self) -> Result<SessionSummary, SessionUseCaseError> {
        let id = Uuid::new_v4();
        let context = SessionContext::new(id, self.scope_policy.scope_for(id));
        let summary = SessionSummary::of(&context);

        self.session_repository.insert(context).await?;
        tracing::info!(session = %id, isolated = self.scope_policy.isolate_sessions, "session created");

        Ok(summary)
    }
}
