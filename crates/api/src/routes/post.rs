//! Route definitions for the `/posts` resource.
//!
//! Also nests the slide sub-resource and the publish action under
//! `/posts/{id}/...`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::post as posts;
use crate::handlers::{publish, slide};
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id (with slides)
/// PUT    /{id}                      -> update (draft only)
/// DELETE /{id}                      -> delete (draft only)
///
/// POST   /{id}/publish              -> publish_post
///
/// POST   /{id}/slides               -> create
/// PUT    /{id}/slides/reorder       -> reorder
/// PUT    /{id}/slides/{slide_id}    -> update
/// DELETE /{id}/slides/{slide_id}    -> remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list).post(posts::create))
        .route(
            "/{id}",
            get(posts::get_by_id)
                .put(posts::update)
                .delete(posts::delete),
        )
        .route("/{id}/publish", post(publish::publish_post))
        .route("/{id}/slides", post(slide::create))
        .route("/{id}/slides/reorder", put(slide::reorder))
        .route(
            "/{id}/slides/{slide_id}",
            put(slide::update).delete(slide::remove),
        )
}
