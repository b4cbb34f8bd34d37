use std::sync::Arc;
use uuid::Uuid;

use super::session_error::{SessionUseCaseError, find_session};
use crate::domain::entities::Turn;
use crate::domain::repositories::SessionRepository;

#[derive(Debug, Clone)]
pub struct MessagePage {
    pub turns: Vec<Turn>,
    pub offset: usize,
    pub total: usize,
}

pub struct ListMessagesUseCase {
    session_repository: Arc<dyn SessionRepository>,
}

impl ListMessagesUseCase {
    pub fn new(session_repository: Arc<dyn SessionRepository>) -> Self {
        Self { session_repository }
    }

    /// Turns appended at or after `since`, oldest first.
    pub async fn execute(
        &self,
        session_id: Uuid,
        since: usize,
    ) -> Result<MessagePage, SessionUseCaseError> {
        let session = find_session(self.session_repository.as_ref(), session_id).await?;
        let ctx = session.lock().await;
        let log = ctx.messages();

        Ok(MessagePage {
            turns: log.since(since).to_vec(),
            offset: since.min(log.len()),
            total: log.len(),
        })
    }
}
