//! Liveness/info page.

use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;

/// GET /
pub async fn info(State(state): State<AppState>) -> Html<String> {
    let hostname = gethostname::gethostname();
    Html(format!(
        "<h1>exifdb is running</h1>\
         <h2>{}</h2><br>\
         Running exifdb: {}<br>\
         Store backend: {}<br>\
         Hostname: {}",
        state.config.server.environment,
        exifdb_core::VERSION,
        state.service.backend(),
        hostname.to_string_lossy(),
    ))
}
