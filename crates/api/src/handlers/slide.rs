//! Handlers for the slide sub-resource of `/posts/{id}`.
//!
//! All mutations are draft-only; the count and ordering invariants are
//! checked here before the repository touches the rows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use vitrine_core::caption::{self, ContactHandles};
use vitrine_core::composition::{self, SlideContent};
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::models::slide::{CreateSlide, Slide, UpdateSlide};
use vitrine_db::repositories::{PostRepo, SlideRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::post::require_draft;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PUT /posts/{id}/slides/reorder`: the post's slide IDs in
/// their new display order.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub slide_ids: Vec<DbId>,
}

/// POST /api/v1/posts/{id}/slides
pub async fn create(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateSlide>,
) -> AppResult<(StatusCode, Json<DataResponse<Slide>>)> {
    require_draft(&state, post_id).await?;

    if let Some(opacity) = input.element_opacity {
        composition::validate_opacity(opacity)?;
    }

    let count = SlideRepo::count_for_post(&state.pool, post_id).await?;
    composition::can_add_slide(count as usize)?;

    let slide = SlideRepo::create(&state.pool, post_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: slide })))
}

/// PUT /api/v1/posts/{id}/slides/{slide_id}
///
/// A watched-field edit on slide 1 regenerates the post caption and
/// silently overwrites any manual override.
pub async fn update(
    State(state): State<AppState>,
    Path((post_id, slide_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateSlide>,
) -> AppResult<Json<DataResponse<Slide>>> {
    require_draft(&state, post_id).await?;

    if let Some(opacity) = input.element_opacity {
        composition::validate_opacity(opacity)?;
    }

    let before = SlideRepo::find_for_post(&state.pool, post_id, slide_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Slide",
            id: slide_id,
        }))?;
    let before_content = before.content()?;

    let slide = SlideRepo::update(&state.pool, post_id, slide_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Slide",
            id: slide_id,
        }))?;

    if let Some(new_caption) = recomputed_caption(
        slide.sort_order,
        &before_content,
        &slide.content()?,
        &state.config.contact_handles(),
    ) {
        PostRepo::set_caption(&state.pool, post_id, &new_caption).await?;
        tracing::debug!(post_id, slide_id, "Caption regenerated after slide edit");
    }

    Ok(Json(DataResponse { data: slide }))
}

/// DELETE /api/v1/posts/{id}/slides/{slide_id}
///
/// Removing the only slide is rejected; survivors are renumbered
/// contiguously from 1.
pub async fn remove(
    State(state): State<AppState>,
    Path((post_id, slide_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_draft(&state, post_id).await?;

    let count = SlideRepo::count_for_post(&state.pool, post_id).await?;
    composition::can_remove_slide(count as usize)?;

    SlideRepo::remove_and_renumber(&state.pool, post_id, slide_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Slide",
            id: slide_id,
        }))?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/posts/{id}/slides/reorder
///
/// The request must be a permutation of the post's slide IDs; position
/// in the list becomes the new 1-based sort order.
pub async fn reorder(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Slide>>>> {
    require_draft(&state, post_id).await?;

    let existing: Vec<DbId> = SlideRepo::list_by_post(&state.pool, post_id)
        .await?
        .iter()
        .map(|s| s.id)
        .collect();
    composition::validate_reorder(&existing, &input.slide_ids)?;

    let slides = SlideRepo::reorder(&state.pool, post_id, &input.slide_ids).await?;
    Ok(Json(DataResponse { data: slides }))
}

/// New caption when a slide edit invalidates the stored one.
///
/// Only watched fields of slide 1 feed the caption; edits anywhere else
/// leave a manual override in place.
fn recomputed_caption(
    sort_order: i32,
    before: &SlideContent,
    after: &SlideContent,
    contacts: &ContactHandles,
) -> Option<String> {
    if sort_order == 1 && caption::caption_fields_changed(before, after) {
        Some(caption::build_caption(after, contacts))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::caption::HASHTAG_BLOCK;

    fn content(title: &str) -> SlideContent {
        SlideContent {
            title: Some(title.to_string()),
            ..SlideContent::default()
        }
    }

    #[test]
    fn watched_edit_on_slide_one_discards_the_override() {
        let caption = recomputed_caption(
            1,
            &content("Antes"),
            &content("Depois"),
            &ContactHandles::default(),
        )
        .expect("watched change must regenerate the caption");

        assert!(caption.starts_with("Depois"));
        assert!(caption.ends_with(HASHTAG_BLOCK));
    }

    #[test]
    fn unwatched_edit_keeps_a_manual_override() {
        let before = content("Mesmo título");
        let mut after = before.clone();
        after.cta_text = Some("Inscreva-se".to_string());
        after.element_opacity = 40;

        assert_eq!(
            recomputed_caption(1, &before, &after, &ContactHandles::default()),
            None
        );
    }

    #[test]
    fn edits_on_later_slides_never_touch_the_caption() {
        assert_eq!(
            recomputed_caption(2, &content("A"), &content("B"), &ContactHandles::default()),
            None
        );
    }
}
