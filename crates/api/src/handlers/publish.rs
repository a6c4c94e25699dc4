//! Handler for `POST /posts/{id}/publish`.

use axum::extract::{Path, State};
use axum::Json;
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::post::PostResponse;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/posts/{id}/publish
///
/// Runs the full publish flow. On platform rejection the draft keeps
/// its uploaded image URLs, so a retry skips straight to the publish
/// call.
pub async fn publish_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostResponse>>> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    let published = state.publisher.publish(&post).await?;

    Ok(Json(DataResponse {
        data: PostResponse::from_post(published),
    }))
}
