//! EXIF upload and lookup endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use exifdb_core::MetadataRecord;
use serde::Serialize;
use serde_json::Value;

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Identifier of the stored record.
    pub inserted_id: String,
}

/// Pull a string `file_url` out of the request body.
fn file_url(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<String> {
    let Json(body) = payload.map_err(|e| ApiError::Validation(format!("invalid JSON body: {e}")))?;
    match body.get("file_url") {
        Some(Value::String(url)) if !url.trim().is_empty() => Ok(url.clone()),
        Some(_) => Err(ApiError::Validation(
            "'file_url' must be a non-empty string".to_string(),
        )),
        None => Err(ApiError::Validation(
            "Missing 'file_url' in request body".to_string(),
        )),
    }
}

/// POST /upload-exif
pub async fn upload_exif(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let url = file_url(payload)?;
    let id = state.service.upload(&url).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            inserted_id: id.to_string(),
        }),
    ))
}

/// GET /get-exif/{document_id}
pub async fn get_exif(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> ApiResult<Json<MetadataRecord>> {
    let record = state
        .service
        .lookup(&document_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_url_extraction() {
        assert_eq!(
            file_url(Ok(Json(json!({"file_url": "http://x/a.jpg"})))).unwrap(),
            "http://x/a.jpg"
        );
        assert!(matches!(
            file_url(Ok(Json(json!({"url": "http://x/a.jpg"})))),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            file_url(Ok(Json(json!({"file_url": 42})))),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            file_url(Ok(Json(json!(["file_url"])))),
            Err(ApiError::Validation(_))
        ));
    }
}
