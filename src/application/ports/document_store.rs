use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::DocumentReference;
use crate::domain::value_objects::SessionScope;

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Single-slot storage for the document a session is working on.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `data` into the scope's slot, replacing whatever was there.
    async fn store(
        &self,
        scope: &SessionScope,
        data: &[u8],
        file_name: &str,
    ) -> Result<DocumentReference, DocumentStoreError>;

    /// Returns whether a file was removed. Shared slots are left in place.
    async fn release(&self, scope: &SessionScope) -> Result<bool, DocumentStoreError>;
}
