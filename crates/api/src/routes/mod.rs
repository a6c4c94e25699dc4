pub mod asset;
pub mod health;
pub mod moderation;
pub mod post;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /posts                                      list, create
/// /posts/{id}                                 get (with slides), update, delete (draft only)
/// /posts/{id}/publish                         run the publish flow (POST)
/// /posts/{id}/slides                          append slide (POST)
/// /posts/{id}/slides/reorder                  apply a full new order (PUT)
/// /posts/{id}/slides/{slide_id}               update, remove
///
/// /assets/elements                            upload custom decorative element (multipart POST)
///
/// /moderation/subjects                        list moderation records
/// /moderation/subjects/{subject_id}           get, upsert editable fields
/// /moderation/subjects/{subject_id}/approve   pending -> approved (POST)
/// /moderation/subjects/{subject_id}/reject    pending -> rejected (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Posts, their slides, and the publish action.
        .nest("/posts", post::router())
        // Uploaded design assets.
        .nest("/assets", asset::router())
        // Moderation console.
        .nest("/moderation", moderation::router())
}
