use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::background::SessionReaper;
use crate::presentation::http::{
    handlers::SessionHandler,
    routes::{health_routes, page_routes, session_routes},
};

pub struct HttpServer {
    session_handler: Arc<SessionHandler>,
    port: u16,
    max_upload_bytes: usize,
    session_reaper: Option<Arc<SessionReaper>>,
}

impl HttpServer {
    pub fn new(session_handler: Arc<SessionHandler>, port: u16, max_upload_bytes: usize) -> Self {
        Self {
            session_handler,
            port,
            max_upload_bytes,
            session_reaper: None,
        }
    }

    pub fn with_session_reaper(mut self, reaper: Arc<SessionReaper>) -> Self {
        self.session_reaper = Some(reaper);
        self
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(page_routes())
            .merge(health_routes())
            .merge(session_routes(
                self.session_handler.clone(),
                self.max_upload_bytes,
            ))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(self.max_upload_bytes))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        // Start idle session reaper
        if let Some(reaper) = self.session_reaper.clone() {
            tokio::spawn(async move {
                reaper.start().await;
            });
        }

        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::harness;
    use crate::application::use_cases::{
        AskQuestionUseCase, CloseSessionUseCase, CreateSessionUseCase, GetSessionUseCase,
        ListMessagesUseCase, ProcessDocumentUseCase, ScopePolicy, UploadDocumentUseCase,
    };
    use crate::domain::repositories::SessionRepository;
    use crate::infrastructure::memory::InMemorySessionRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let h = harness();
        let repo: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new(10));
        let handler = SessionHandler::new(
            Arc::new(CreateSessionUseCase::new(
                repo.clone(),
                ScopePolicy {
                    isolate_sessions: false,
                    document_file_name: "temp.pdf".to_string(),
                    collection_name: "vector_db".to_string(),
                },
            )),
            Arc::new(GetSessionUseCase::new(repo.clone())),
            Arc::new(CloseSessionUseCase::new(repo.clone(), h.orchestrator.clone())),
            Arc::new(UploadDocumentUseCase::new(repo.clone(), h.orchestrator.clone())),
            Arc::new(ProcessDocumentUseCase::new(repo.clone(), h.orchestrator.clone())),
            Arc::new(AskQuestionUseCase::new(repo.clone(), h.orchestrator.clone())),
            Arc::new(ListMessagesUseCase::new(repo)),
        );
        HttpServer::new(Arc::new(handler), 0, 1024 * 1024)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_upload(uri: &str, file_name: &str, data: &[u8]) -> Request<Body> {
        let boundary = "X-DOCCHAT-BOUNDARY";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_session_over_http() {
        let app = server().router();

        let (status, created) = send(&app, Request::post("/sessions").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["stage"], "EMPTY");
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, early) = send(&app, post_json(&format!("/sessions/{id}/messages"), serde_json::json!({"query": "hi"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(early["data"]["kind"], "guidance");

        let (status, warned) = send(&app, Request::post(format!("/sessions/{id}/process")).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(warned["data"]["kind"], "warning");

        let (status, uploaded) = send(&app, multipart_upload(&format!("/sessions/{id}/document"), "farm.pdf", b"%PDF-1.4 soil")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(uploaded["data"]["file_name"], "farm.pdf");
        assert_eq!(uploaded["data"]["stage"], "DOCUMENT_READY");

        let (_, processed) = send(&app, Request::post(format!("/sessions/{id}/process")).body(Body::empty()).unwrap()).await;
        assert_eq!(processed["data"]["kind"], "success");
        assert_eq!(processed["data"]["stage"], "CHAT_READY");

        let (_, answered) = send(&app, post_json(&format!("/sessions/{id}/messages"), serde_json::json!({"query": "Which crops?"}))).await;
        assert_eq!(answered["data"]["kind"], "success");
        assert_eq!(answered["data"]["answer"]["text"], "Answer to: Which crops?");

        let (_, log) = send(&app, Request::get(format!("/sessions/{id}/messages?since=1")).body(Body::empty()).unwrap()).await;
        assert_eq!(log["data"]["total"], 2);
        assert_eq!(log["data"]["messages"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Request::delete(format!("/sessions/{id}")).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, gone) = send(&app, Request::get(format!("/sessions/{id}")).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(gone["error"]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upload_validation_is_bad_request() {
        let app = server().router();
        let (_, created) = send(&app, Request::post("/sessions").body(Body::empty()).unwrap()).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, multipart_upload(&format!("/sessions/{id}/document"), "notes.txt", b"hello")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_static_pages_and_health() {
        let app = server().router();

        let home = app.clone().oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(home.status(), StatusCode::OK);
        let html = to_bytes(home.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("BAZAFARM"));

        let contact = app.clone().oneshot(Request::get("/contact").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(contact.status(), StatusCode::OK);

        let (status, health) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["data"]["status"], "healthy");
    }
}
