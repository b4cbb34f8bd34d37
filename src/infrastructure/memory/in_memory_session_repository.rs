use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::entities::SessionContext;
use crate::domain::repositories::{
    SessionRepository, SharedSession, session_repository::SessionRepositoryError,
};

struct SessionEntry {
    session: SharedSession,
    // Milliseconds since the repository's epoch.
    last_used: AtomicU64,
}

/// Process-local session table. Contexts live until removed, evicted as idle,
/// or the process exits.
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    max_sessions: usize,
    epoch: Instant,
}

impl InMemorySessionRepository {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            epoch: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, context: SessionContext) -> Result<SharedSession, SessionRepositoryError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&context.id()) {
            return Err(SessionRepositoryError::Duplicate(context.id()));
        }
        if sessions.len() >= self.max_sessions {
            return Err(SessionRepositoryError::CapacityExceeded(self.max_sessions));
        }

        let id = context.id();
        let shared = Arc::new(Mutex::new(context));
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::clone(&shared),
                last_used: AtomicU64::new(self.now_ms()),
            },
        );
        Ok(shared)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SharedSession>, SessionRepositoryError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id).map(|entry| {
            entry.last_used.store(self.now_ms(), Ordering::Relaxed);
            Arc::clone(&entry.session)
        }))
    }

    async fn remove(&self, id: Uuid) -> Result<Option<SharedSession>, SessionRepositoryError> {
        Ok(self.sessions.write().await.remove(&id).map(|entry| entry.session))
    }

    async fn count(&self) -> Result<usize, SessionRepositoryError> {
        Ok(self.sessions.read().await.len())
    }

    async fn evict_idle(
        &self,
        idle_for: Duration,
    ) -> Result<Vec<(Uuid, SharedSession)>, SessionRepositoryError> {
        let now = self.now_ms();
        let idle_ms = idle_for.as_millis() as u64;
        let mut sessions = self.sessions.write().await;

        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, entry)| {
                now.saturating_sub(entry.last_used.load(Ordering::Relaxed)) >= idle_ms
                    && entry.session.try_lock().is_ok()
            })
            .map(|(id, _)| *id)
            .collect();

        Ok(expired
            .into_iter()
            .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry.session)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::SessionScope;

    fn context() -> SessionContext {
        SessionContext::new(Uuid::new_v4(), SessionScope::shared("temp.pdf", "vector_db"))
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemorySessionRepository::new(10);
        let ctx = context();
        let id = ctx.id();

        let inserted = repo.insert(ctx).await.unwrap();
        let found = repo.find_by_id(id).await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&inserted, &found));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = InMemorySessionRepository::new(10);
        let id = Uuid::new_v4();
        let scope = SessionScope::shared("temp.pdf", "vector_db");

        repo.insert(SessionContext::new(id, scope.clone())).await.unwrap();
        let result = repo.insert(SessionContext::new(id, scope)).await;

        assert!(matches!(result, Err(SessionRepositoryError::Duplicate(d)) if d == id));
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let repo = InMemorySessionRepository::new(2);
        repo.insert(context()).await.unwrap();
        repo.insert(context()).await.unwrap();

        let result = repo.insert(context()).await;
        assert!(matches!(result, Err(SessionRepositoryError::CapacityExceeded(2))));
    }

    #[tokio::test]
    async fn test_remove_frees_capacity() {
        let repo = InMemorySessionRepository::new(1);
        let ctx = context();
        let id = ctx.id();
        repo.insert(ctx).await.unwrap();

        assert!(repo.remove(id).await.unwrap().is_some());
        assert!(repo.remove(id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
        repo.insert(context()).await.unwrap();
    }

    #[tokio::test]
    async fn test_evicting_idle_sessions_frees_capacity() {
        let repo = InMemorySessionRepository::new(2);
        let stale = context();
        let stale_id = stale.id();
        repo.insert(stale).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        let fresh = context();
        let fresh_id = fresh.id();
        repo.insert(fresh).await.unwrap();

        let evicted = repo.evict_idle(Duration::from_millis(50)).await.unwrap();

        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].0, stale_id);
        assert!(repo.find_by_id(stale_id).await.unwrap().is_none());
        assert!(repo.find_by_id(fresh_id).await.unwrap().is_some());
        repo.insert(context()).await.unwrap();
    }

    #[tokio::test]
    async fn test_lookup_keeps_session_alive() {
        let repo = InMemorySessionRepository::new(10);
        let ctx = context();
        let id = ctx.id();
        repo.insert(ctx).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        repo.find_by_id(id).await.unwrap();

        assert!(repo.evict_idle(Duration::from_millis(50)).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_locked_session_is_not_evicted() {
        let repo = InMemorySessionRepository::new(10);
        let shared = repo.insert(context()).await.unwrap();
        let _guard = shared.lock().await;

        assert!(repo.evict_idle(Duration::ZERO).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
