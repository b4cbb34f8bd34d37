use serde::Serialize;
use uuid::Uuid;

use crate::application::services::ProcessOutcome;
use crate::application::use_cases::{ProcessDocumentResponse, SessionSummary, UploadDocumentResponse};
use crate::domain::entities::DocumentReference;
use crate::domain::value_objects::SessionStage;
use crate::presentation::http::dto::OutcomeKind;

#[derive(Debug, Serialize)]
pub struct DocumentDto {
    pub file_name: String,
    pub size: u64,
    pub content_hash: String,
    pub stored_at: String,
}

impl From<&DocumentReference> for DocumentDto {
    fn from(document: &DocumentReference) -> Self {
        Self {
            file_name: document.file_name().to_string(),
            size: document.size(),
            content_hash: document.content_hash().to_string(),
            stored_at: document.stored_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponseDto {
    pub id: Uuid,
    pub busy: bool,
    pub stage: Option<SessionStage>,
    pub document: Option<DocumentDto>,
    pub chunk_count: Option<usize>,
    pub collection_name: Option<String>,
    pub llm_model_id: Option<String>,
    pub message_count: Option<usize>,
    pub created_at: Option<String>,
}

impl From<SessionSummary> for SessionResponseDto {
    fn from(summary: SessionSummary) -> Self {
        Self {
            id: summary.id,
            busy: summary.busy,
            stage: summary.stage,
            document: summary.document.as_ref().map(DocumentDto::from),
            chunk_count: summary.chunk_count,
            collection_name: summary.collection_name,
            llm_model_id: summary.llm_model_id,
            message_count: summary.message_count,
            created_at: summary.created_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub file_name: String,
    pub size: u64,
    pub content_hash: String,
    pub stage: SessionStage,
}

impl From<UploadDocumentResponse> for UploadResponseDto {
    fn from(response: UploadDocumentResponse) -> Self {
        Self {
            file_name: response.document.file_name().to_string(),
            size: response.document.size(),
            content_hash: response.document.content_hash().to_string(),
            stage: response.stage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProcessResponseDto {
    pub kind: OutcomeKind,
    pub message: String,
    pub stage: SessionStage,
    pub chunk_count: Option<usize>,
    pub llm_model_id: Option<String>,
}

impl From<ProcessDocumentResponse> for ProcessResponseDto {
    fn from(response: ProcessDocumentResponse) -> Self {
        let kind = match &response.outcome {
            ProcessOutcome::NoDocument { .. } => OutcomeKind::Warning,
            ProcessOutcome::AlreadyReady { .. } | ProcessOutcome::Indexed { .. } => {
                OutcomeKind::Success
            }
            ProcessOutcome::Failed { .. } => OutcomeKind::Error,
        };
        let chunk_count = match &response.outcome {
            ProcessOutcome::Indexed { embedding, .. } => Some(embedding.chunk_count()),
            _ => None,
        };

        Self {
            kind,
            message: response.outcome.message().to_string(),
            stage: response.stage,
            chunk_count,
            llm_model_id: response
                .outcome
                .chat_session()
                .map(|c| c.llm_model_id().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponseDto {
    pub id: Uuid,
    pub document_removed: bool,
}
