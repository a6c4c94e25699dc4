//! Route definitions for uploaded design assets.

use axum::routing::post;
use axum::Router;

use crate::handlers::asset;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// POST   /elements   -> upload_element (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/elements", post(asset::upload_element))
}
