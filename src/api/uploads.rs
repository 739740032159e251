//! Cover image upload endpoint

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Multipart form accepted by `/upload-file`
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Generated name to pass as `filename` to `/upload-metadata`
    pub filename: String,
}

/// Upload a cover image (multipart field `file`)
#[utoipa::path(
    post,
    path = "/upload-file",
    tag = "books",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part, empty name or disallowed type")
    )
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let filename = state.services.uploads.store(&original, &data).await?;
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            filename,
        }));
    }

    tracing::info!("Upload request without a file part");
    Err(AppError::Validation("No file part".to_string()))
}
