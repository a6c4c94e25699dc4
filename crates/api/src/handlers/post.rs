//! Handlers for the `/posts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use vitrine_core::caption;
use vitrine_core::composition::{ImageUrl, PostTemplate};
use vitrine_core::error::CoreError;
use vitrine_core::types::{DbId, Timestamp};
use vitrine_db::models::post::{CreatePost, Post, UpdatePost};
use vitrine_db::models::slide::{CreateSlide, Slide};
use vitrine_db::repositories::{PostRepo, SlideRepo};
use vitrine_events::StudioEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

/// API serialization of a post.
///
/// The stored `image_urls` list is collapsed into `image_url`: a scalar
/// URL for single-image posts, an ordered array for carousels, `null`
/// until a publish attempt has uploaded images.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: DbId,
    pub template: String,
    pub status: String,
    pub is_carousel: bool,
    pub subject_id: Option<DbId>,
    pub caption: String,
    pub image_url: Option<ImageUrl>,
    pub remote_post_id: Option<String>,
    pub permalink: Option<String>,
    pub published_at: Option<Timestamp>,
    pub background_color: String,
    pub title_color: String,
    pub subtitle_color: String,
    pub description_color: String,
    pub accent_color: String,
    pub logo_position: String,
    pub logo_offset_top: Option<String>,
    pub logo_offset_left: Option<String>,
    pub logo_offset_right: Option<String>,
    pub logo_offset_bottom: Option<String>,
    pub logo_size: String,
    pub logo_variant: String,
    pub decorative_effect: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Present on endpoints that return the post with its slides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<Slide>>,
}

impl PostResponse {
    pub fn from_post(post: Post) -> Self {
        Self::build(post, None)
    }

    pub fn with_slides(post: Post, slides: Vec<Slide>) -> Self {
        Self::build(post, Some(slides))
    }

    fn build(post: Post, slides: Option<Vec<Slide>>) -> Self {
        let image_url = ImageUrl::from_list(&post.image_urls, post.is_carousel);
        Self {
            id: post.id,
            template: post.template,
            status: post.status,
            is_carousel: post.is_carousel,
            subject_id: post.subject_id,
            caption: post.caption,
            image_url,
            remote_post_id: post.remote_post_id,
            permalink: post.permalink,
            published_at: post.published_at,
            background_color: post.background_color,
            title_color: post.title_color,
            subtitle_color: post.subtitle_color,
            description_color: post.description_color,
            accent_color: post.accent_color,
            logo_position: post.logo_position,
            logo_offset_top: post.logo_offset_top,
            logo_offset_left: post.logo_offset_left,
            logo_offset_right: post.logo_offset_right,
            logo_offset_bottom: post.logo_offset_bottom,
            logo_size: post.logo_size,
            logo_variant: post.logo_variant,
            decorative_effect: post.decorative_effect,
            created_at: post.created_at,
            updated_at: post.updated_at,
            slides,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/posts
///
/// Creates a draft post together with its first (empty) slide and an
/// auto-generated caption.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<DataResponse<PostResponse>>)> {
    if input.template == Some(PostTemplate::Profile) && input.subject_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "A profile post must reference a moderation subject".to_string(),
        )));
    }

    let mut post = PostRepo::create(&state.pool, &input).await?;
    let first_slide = SlideRepo::create(&state.pool, post.id, &CreateSlide::default()).await?;

    let caption = caption::build_caption(&first_slide.content()?, &state.config.contact_handles());
    PostRepo::set_caption(&state.pool, post.id, &caption).await?;
    post.caption = caption;

    state.event_bus.publish(
        StudioEvent::new("post.created")
            .with_source("post", post.id)
            .with_payload(json!({
                "template": post.template,
                "is_carousel": post.is_carousel,
            })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PostResponse::with_slides(post, vec![first_slide]),
        }),
    ))
}

/// GET /api/v1/posts
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PostResponse>>>> {
    let posts = PostRepo::list(&state.pool).await?;
    let data = posts.into_iter().map(PostResponse::from_post).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostResponse>>> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    let slides = SlideRepo::list_by_post(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: PostResponse::with_slides(post, slides),
    }))
}

/// PUT /api/v1/posts/{id}
///
/// Draft-only: the repository's guard leaves published rows untouched,
/// and the handler reports that as a conflict rather than a 404.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<DataResponse<PostResponse>>> {
    match PostRepo::update_draft(&state.pool, id, &input).await? {
        Some(post) => Ok(Json(DataResponse {
            data: PostResponse::from_post(post),
        })),
        None => Err(draft_gone(&state, id, "modify").await),
    }
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = PostRepo::delete_draft(&state.pool, id).await?;
    if !deleted {
        return Err(draft_gone(&state, id, "delete").await);
    }

    state
        .event_bus
        .publish(StudioEvent::new("post.deleted").with_source("post", id));

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a post, rejecting the request when it is already published.
/// Slide mutations go through this so published posts stay immutable.
pub(crate) async fn require_draft(state: &AppState, id: DbId) -> AppResult<Post> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    if post.is_published() {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot modify a published post".to_string(),
        )));
    }
    Ok(post)
}

/// After a draft-guarded write matched no rows, work out whether the
/// post is missing (404) or published and therefore immutable (409).
async fn draft_gone(state: &AppState, id: DbId, action: &str) -> AppError {
    match PostRepo::find_by_id(&state.pool, id).await {
        Ok(Some(_)) => AppError::Core(CoreError::Conflict(format!(
            "Cannot {action} a published post"
        ))),
        Ok(None) => AppError::Core(CoreError::NotFound { entity: "Post", id }),
        Err(e) => AppError::Database(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_post(is_carousel: bool, image_urls: Vec<String>) -> Post {
        Post {
            id: 7,
            template: "standard".to_string(),
            status: "draft".to_string(),
            is_carousel,
            subject_id: None,
            caption: "#vitrine".to_string(),
            image_urls,
            remote_post_id: None,
            permalink: None,
            published_at: None,
            background_color: "#f5efe6".to_string(),
            title_color: "#1a1a2e".to_string(),
            subtitle_color: "#4a4e69".to_string(),
            description_color: "#22223b".to_string(),
            accent_color: "#c9ada7".to_string(),
            logo_position: "bottom-right".to_string(),
            logo_offset_top: None,
            logo_offset_left: None,
            logo_offset_right: None,
            logo_offset_bottom: None,
            logo_size: "medium".to_string(),
            logo_variant: "dark".to_string(),
            decorative_effect: "none".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn single_image_post_serializes_a_scalar_url() {
        let post = stored_post(
            false,
            vec!["https://cdn.example.com/slide-01.png".to_string()],
        );
        let json = serde_json::to_value(PostResponse::from_post(post)).unwrap();

        assert_eq!(json["image_url"], "https://cdn.example.com/slide-01.png");
    }

    #[test]
    fn carousel_post_serializes_an_ordered_url_array() {
        let post = stored_post(
            true,
            vec![
                "https://cdn.example.com/slide-01.png".to_string(),
                "https://cdn.example.com/slide-02.png".to_string(),
            ],
        );
        let json = serde_json::to_value(PostResponse::from_post(post)).unwrap();

        assert_eq!(
            json["image_url"],
            serde_json::json!([
                "https://cdn.example.com/slide-01.png",
                "https://cdn.example.com/slide-02.png",
            ])
        );
    }

    #[test]
    fn unrendered_post_has_a_null_image_url() {
        let post = stored_post(true, Vec::new());
        let json = serde_json::to_value(PostResponse::from_post(post)).unwrap();

        assert!(json["image_url"].is_null());
    }

    #[test]
    fn raw_url_list_never_leaks_into_the_response() {
        let post = stored_post(false, vec!["https://cdn.example.com/a.png".to_string()]);
        let json = serde_json::to_value(PostResponse::from_post(post)).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("image_urls"));
        // Slides are only present on endpoints that load them.
        assert!(!object.contains_key("slides"));
    }
}
