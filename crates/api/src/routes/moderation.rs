//! Route definitions for the moderation console.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Routes mounted at `/moderation`.
///
/// ```text
/// GET    /subjects                        -> list
/// GET    /subjects/{subject_id}           -> get_by_subject
/// PUT    /subjects/{subject_id}           -> upsert editable fields
/// POST   /subjects/{subject_id}/approve   -> approve (pending only)
/// POST   /subjects/{subject_id}/reject    -> reject (pending only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(moderation::list))
        .route(
            "/subjects/{subject_id}",
            get(moderation::get_by_subject).put(moderation::upsert),
        )
        .route("/subjects/{subject_id}/approve", post(moderation::approve))
        .route("/subjects/{subject_id}/reject", post(moderation::reject))
}
