use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    error::ApiError,
    models::UploadResponse,
    storage::{StorageState, UploadOutcome},
};

/// Largest accepted upload body (images and short clips for the portfolio).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const DEFAULT_FOLDER: &str = "uploads";

/// upload_asset
///
/// [Admin Route] Multipart upload: a `file` part and an optional `folder` part naming
/// the bucket prefix (`blogs`, `work`, `testimonials`, ...). The storage client never
/// fails loudly, so its outcome is checked here; a failure is logged with the store's
/// message and reported to the caller as a generic 500.
#[utoipa::path(
    post,
    path = "/api/intellsys/upload",
    tag = "admin",
    responses(
        (status = 200, description = "Stored", body = UploadResponse),
        (status = 400, description = "No file part"),
        (status = 500, description = "Object store rejected the upload")
    )
)]
pub async fn upload_asset(
    State(storage): State<StorageState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart?;
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder = DEFAULT_FOLDER.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("folder") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                if !text.trim().is_empty() {
                    folder = text.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| ApiError::Validation("No file provided".into()))?;

    match storage.upload(data, &filename, &folder).await {
        UploadOutcome::Uploaded { url, key } => Ok(Json(UploadResponse { url, key }).into_response()),
        UploadOutcome::Failed { error } => {
            tracing::error!(%filename, %folder, %error, "upload failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Upload failed" })),
            )
                .into_response())
        }
    }
}
