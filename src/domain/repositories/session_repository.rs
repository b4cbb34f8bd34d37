use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::SessionContext;

/// A session context behind its own lock. Holding the lock is what makes
/// operations on one session strictly sequential.
pub type SharedSession = Arc<Mutex<SessionContext>>;

#[derive(Debug, Error)]
pub enum SessionRepositoryError {
    #[error("Session already exists: {0}")]
    Duplicate(Uuid),
    #[error("Session limit reached ({0})")]
    CapacityExceeded(usize),
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, context: SessionContext) -> Result<SharedSession, SessionRepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SharedSession>, SessionRepositoryError>;
    async fn remove(&self, id: Uuid) -> Result<Option<SharedSession>, SessionRepositoryError>;
    async fn count(&self) -> Result<usize, SessionRepositoryError>;
    /// Removes and returns every session not looked up for at least
    /// `idle_for`. Sessions whose lock is currently held are kept.
    async fn evict_idle(
        &self,
        idle_for: Duration,
    ) -> Result<Vec<(Uuid, SharedSession)>, SessionRepositoryError>;
}
