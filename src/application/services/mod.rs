pub mod document_indexer;
pub mod retrieval_qa;
pub mod session_orchestrator;
pub mod text_splitter;

pub use document_indexer::RagDocumentIndexer;
pub use retrieval_qa::RetrievalQaResponder;
pub use session_orchestrator::{
    ALREADY_INDEXED_NOTICE, AskOutcome, CHAT_GUIDANCE, EMPTY_QUESTION_GUIDANCE, INDEXED_NOTICE,
    ProcessOutcome, SessionOrchestrator, UPLOAD_FIRST_WARNING, UploadError,
};
pub use text_splitter::{RecursiveTextSplitter, TextSplitter};
