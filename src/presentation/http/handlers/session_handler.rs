use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    AskQuestionRequest, AskQuestionUseCase, CloseSessionUseCase, CreateSessionUseCase,
    GetSessionUseCase, ListMessagesUseCase, ProcessDocumentUseCase, SessionUseCaseError,
    UploadDocumentRequest, UploadDocumentUseCase,
};
use crate::presentation::http::dto::{
    ApiResponse, AskRequestDto, AskResponseDto, CloseSessionResponseDto, MessageListResponseDto,
    ProcessResponseDto, SessionResponseDto, SinceQueryDto, UploadResponseDto,
};

pub struct SessionHandler {
    create_session_use_case: Arc<CreateSessionUseCase>,
    get_session_use_case: Arc<GetSessionUseCase>,
    close_session_use_case: Arc<CloseSessionUseCase>,
    upload_document_use_case: Arc<UploadDocumentUseCase>,
    process_document_use_case: Arc<ProcessDocumentUseCase>,
    ask_question_use_case: Arc<AskQuestionUseCase>,
    list_messages_use_case: Arc<ListMessagesUseCase>,
}

impl SessionHandler {
    pub fn new(
        create_session_use_case: Arc<CreateSessionUseCase>,
        get_session_use_case: Arc<GetSessionUseCase>,
        close_session_use_case: Arc<CloseSessionUseCase>,
        upload_document_use_case: Arc<UploadDocumentUseCase>,
        process_document_use_case: Arc<ProcessDocumentUseCase>,
        ask_question_use_case: Arc<AskQuestionUseCase>,
        list_messages_use_case: Arc<ListMessagesUseCase>,
    ) -> Self {
        Self {
            create_session_use_case,
            get_session_use_case,
            close_session_use_case,
            upload_document_use_case,
            process_document_use_case,
            ask_question_use_case,
            list_messages_use_case,
        }
    }

    pub async fn create_session(State(handler): State<Arc<SessionHandler>>) -> Response {
        match handler.create_session_use_case.execute().await {
            Ok(summary) => (
                StatusCode::CREATED,
                Json(ApiResponse::success(SessionResponseDto::from(summary))),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    pub async fn get_session(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Response {
        match handler.get_session_use_case.execute(session_id).await {
            Ok(summary) => (
                StatusCode::OK,
                Json(ApiResponse::success(SessionResponseDto::from(summary))),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    pub async fn close_session(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Response {
        match handler.close_session_use_case.execute(session_id).await {
            Ok(document_removed) => (
                StatusCode::OK,
                Json(ApiResponse::success(CloseSessionResponseDto {
                    id: session_id,
                    document_removed,
                })),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    pub async fn upload_document(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
        mut multipart: Multipart,
    ) -> Response {
        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return bad_request("INVALID_MULTIPART", e.to_string()),
            };

            if field.name() != Some("file") {
                continue;
            }

            let file_name = field.file_name().unwrap_or_default().to_string();
            let file_data = match field.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => return bad_request("INVALID_MULTIPART", e.to_string()),
            };

            let request = UploadDocumentRequest {
                session_id,
                file_name,
                file_data,
            };

            return match handler.upload_document_use_case.execute(request).await {
                Ok(response) => (
                    StatusCode::OK,
                    Json(ApiResponse::success(UploadResponseDto::from(response))),
                )
                    .into_response(),
                Err(e) => error_response(e),
            };
        }

        bad_request(
            "NO_FILE_PROVIDED",
            "No file provided in the request".to_string(),
        )
    }

    pub async fn process_document(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Response {
        match handler.process_document_use_case.execute(session_id).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(ProcessResponseDto::from(response))),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    pub async fn ask_question(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
        Json(body): Json<AskRequestDto>,
    ) -> Response {
        let request = AskQuestionRequest {
            session_id,
            query: body.query,
        };

        match handler.ask_question_use_case.execute(request).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(AskResponseDto::from(response))),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    pub async fn list_messages(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
        Query(query): Query<SinceQueryDto>,
    ) -> Response {
        match handler
            .list_messages_use_case
            .execute(session_id, query.since)
            .await
        {
            Ok(page) => (
                StatusCode::OK,
                Json(ApiResponse::success(MessageListResponseDto::from(page))),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }
}

fn bad_request(code: &str, message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(code.to_string(), message, None)),
    )
        .into_response()
}

fn error_response(error: SessionUseCaseError) -> Response {
    let (status, code) = match &error {
        SessionUseCaseError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
        SessionUseCaseError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        SessionUseCaseError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILED"),
        SessionUseCaseError::Unavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "SESSION_LIMIT_REACHED")
        }
        SessionUseCaseError::Repository(_) | SessionUseCaseError::Internal(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    if status.is_server_error() {
        tracing::error!("{}", error);
    }

    (
        status,
        Json(ApiResponse::<()>::error(code.to_string(), error.to_string(), None)),
    )
        .into_response()
}
