use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentExtractionError {
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("IO error: {0}")]
    IoError(String),
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    pub text: String,
    pub page_count: usize,
    /// Pages that failed to extract, with the reason.
    pub warnings: Vec<String>,
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, file_path: &Path) -> Result<ExtractedContent, DocumentExtractionError>;
}
