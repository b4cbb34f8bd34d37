use thiserror::Error;
use uuid::Uuid;

use crate::application::services::UploadError;
use crate::domain::repositories::{SessionRepository, SharedSession, session_repository::SessionRepositoryError};

#[derive(Debug, Error)]
pub enum SessionUseCaseError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Repository error: {0}")]
    Repository(String),
    #[error("Session limit reached: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionRepositoryError> for SessionUseCaseError {
    fn from(error: SessionRepositoryError) -> Self {
        match error {
            SessionRepositoryError::CapacityExceeded(max) => {
                SessionUseCaseError::Unavailable(format!("at most {} sessions", max))
            }
            other => SessionUseCaseError::Repository(other.to_string()),
        }
    }
}

impl From<UploadError> for SessionUseCaseError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::Validation(msg) => SessionUseCaseError::Validation(msg),
            UploadError::Storage(e) => SessionUseCaseError::Storage(e.to_string()),
            UploadError::InvalidState(msg) => SessionUseCaseError::Internal(msg),
        }
    }
}

impl From<tokio::task::JoinError> for SessionUseCaseError {
    fn from(error: tokio::task::JoinError) -> Self {
        SessionUseCaseError::Internal(format!("Task join error: {}", error))
    }
}

pub(crate) async fn find_session(
    repository: &dyn SessionRepository,
    session_id: Uuid,
) -> Result<SharedSession, SessionUseCaseError> {
    repository
        .find_by_id(session_id)
        .await?
        .ok_or(SessionUseCaseError::SessionNotFound(session_id))
}
