//! HTTP surface for exifdb.
//!
//! - `POST /upload-exif`: fetch an image URL, store its sanitized EXIF tags
//! - `GET /get-exif/{document_id}`: return a stored record
//! - `GET /`: environment/runtime info page

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
