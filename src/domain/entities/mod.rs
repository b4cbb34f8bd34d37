pub mod chat_session;
pub mod document_reference;
pub mod embedding_session;
pub mod message_log;
pub mod session_context;
pub mod turn;

pub use chat_session::ChatSession;
pub use document_reference::DocumentReference;
pub use embedding_session::EmbeddingSession;
pub use message_log::MessageLog;
pub use session_context::SessionContext;
pub use turn::{Role, Turn};
