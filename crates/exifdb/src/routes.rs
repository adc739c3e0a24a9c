//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info))
        .route("/upload-exif", post(handlers::upload_exif))
        .route("/get-exif/{document_id}", get(handlers::get_exif))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
