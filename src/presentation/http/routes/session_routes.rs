use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::SessionHandler;

pub fn session_routes(session_handler: Arc<SessionHandler>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/sessions", post(SessionHandler::create_session))
        .route(
            "/sessions/{session_id}",
            get(SessionHandler::get_session).delete(SessionHandler::close_session),
        )
        .route(
            "/sessions/{session_id}/document",
            post(SessionHandler::upload_document)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/sessions/{session_id}/process", post(SessionHandler::process_document))
        .route(
            "/sessions/{session_id}/messages",
            get(SessionHandler::list_messages).post(SessionHandler::ask_question),
        )
        .with_state(session_handler)
}
