use async_trait::async_trait;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::application::ports::document_store::{DocumentStore, DocumentStoreError};
use crate::domain::entities::DocumentReference;
use crate::domain::value_objects::{ContentHash, SessionScope};

/// Keeps each session's document at `<base_path>/<slot>`, overwriting on
/// every upload.
pub struct LocalTempDocumentStore {
    base_path: PathBuf,
}

impl LocalTempDocumentStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf, DocumentStoreError> {
        let relative = Path::new(slot);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));

        if slot.is_empty() || escapes {
            return Err(DocumentStoreError::InvalidPath(slot.to_string()));
        }

        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl DocumentStore for LocalTempDocumentStore {
    async fn store(
        &self,
        scope: &SessionScope,
        data: &[u8],
        file_name: &str,
    ) -> Result<DocumentReference, DocumentStoreError> {
        let path = self.slot_path(scope.document_slot())?;

        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_path.clone());
        fs::create_dir_all(&parent)
            .await
            .map_err(|e| DocumentStoreError::IoError(e.to_string()))?;

        // Stage through a uniquely named file beside the slot, then rename over it.
        let target = path.clone();
        let bytes = data.to_vec();

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut staged = tempfile::Builder::new()
                .prefix(".upload-")
                .suffix(".part")
                .tempfile_in(&parent)?;
            staged.write_all(&bytes)?;
            staged.as_file().sync_all()?;
            staged.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| DocumentStoreError::IoError(e.to_string()))?
        .map_err(|e| DocumentStoreError::IoError(e.to_string()))?;

        Ok(DocumentReference::new(
            path.to_string_lossy().to_string(),
            file_name.to_string(),
            data.len() as u64,
            ContentHash::of(data),
        ))
    }

    async fn release(&self, scope: &SessionScope) -> Result<bool, DocumentStoreError> {
        if !scope.is_isolated() {
            return Ok(false);
        }

        let path = self.slot_path(scope.document_slot())?;
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(DocumentStoreError::IoError(e.to_string())),
        }

        // Drop the now-empty per-session directory.
        if let Some(parent) = path.parent() {
            if parent != self.base_path.as_path() {
                let _ = fs::remove_dir(parent).await;
            }
        }

        Ok(true)
    }
}
