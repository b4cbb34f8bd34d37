pub mod ask_question;
pub mod close_session;
pub mod create_session;
pub mod evict_idle_sessions;
pub mod get_session;
pub mod list_messages;
pub mod process_document;
pub mod session_error;
pub mod upload_document;

pub use ask_question::{AskQuestionRequest, AskQuestionResponse, AskQuestionUseCase};
pub use close_session::CloseSessionUseCase;
pub use create_session::{CreateSessionUseCase, ScopePolicy};
pub use evict_idle_sessions::EvictIdleSessionsUseCase;
pub use get_session::{GetSessionUseCase, SessionSummary};
pub use list_messages::{ListMessagesUseCase, MessagePage};
pub use process_document::{ProcessDocumentResponse, ProcessDocumentUseCase};
pub use session_error::SessionUseCaseError;
pub use upload_document::{UploadDocumentRequest, UploadDocumentResponse, UploadDocumentUseCase};
