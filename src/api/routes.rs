use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Documents
        .route(
            "/api/documents",
            get(handlers::list_documents).post(handlers::create_document),
        )
        .route(
            "/api/documents/:id",
            put(handlers::update_document).delete(handlers::delete_document),
        )
        // Files (uploads are read whole, with no size cap)
        .route(
            "/api/documents/:id/upload",
            post(handlers::upload_document_file).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/api/documents/:id/download",
            get(handlers::download_document_file),
        )
        // Diagnostics
        .route("/", get(handlers::root))
        .route("/test", get(handlers::diagnostics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
