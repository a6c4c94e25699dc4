//! Handler for custom decorative element uploads.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vitrine_core::naming;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// File extensions accepted for uploaded decorative elements.
const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

/// Public location of a stored asset.
#[derive(Debug, Serialize)]
pub struct UploadedAsset {
    pub url: String,
    pub key: String,
}

/// POST /api/v1/assets/elements
///
/// Accepts a multipart form with a required `file` field and stores the
/// image under a collision-free object key. The returned URL goes into
/// a slide's `custom` decorative element.
pub async fn upload_element(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedAsset>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("element.png").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image format '.{ext}'. Supported: .png, .jpg, .jpeg, .webp, .gif"
        )));
    }
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let key = naming::element_asset_key(&filename);
    let stored = state.storage.store(data, &key).await?;
    tracing::info!(key = %stored.key, "Stored decorative element");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadedAsset {
                url: stored.url,
                key: stored.key,
            },
        }),
    ))
}
