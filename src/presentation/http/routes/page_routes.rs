use axum::{Router, routing::get};

use crate::presentation::http::handlers::page_handler::{contact_page, home_page};

pub fn page_routes() -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/contact", get(contact_page))
}
