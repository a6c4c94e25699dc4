//! Publish pipeline errors.

use vitrine_core::types::DbId;
use vitrine_render::RenderError;
use vitrine_social::SocialApiError;
use vitrine_storage::StorageError;

/// Errors from the publish flow. Slide-indexed variants carry the
/// 0-based loop index and display it 1-based.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Slide count outside the publishable range.
    #[error("A post needs between 1 and 10 slides to publish, got {0}")]
    InvalidSlideCount(usize),

    /// A slide uses the custom decorative element without an asset URL.
    #[error("Slide {slide_order} uses a custom element without an image URL")]
    InvalidCustomElement { slide_order: i32 },

    /// Profile-template posts require an approved subject.
    #[error("Subject {subject_id} is not approved for publication (current status: {status})")]
    ModerationNotApproved { subject_id: DbId, status: String },

    /// A slide failed to render; the whole run is discarded.
    #[error("Rendering slide {} failed: {source}", .index + 1)]
    SlideRender { index: usize, source: RenderError },

    /// A finished image failed to upload.
    #[error("Uploading slide {} failed: {source}", .index + 1)]
    Upload { index: usize, source: StorageError },

    /// The platform refused the publish (or the request failed). The
    /// remote detail passes through verbatim.
    #[error(transparent)]
    Rejected(#[from] SocialApiError),

    /// The post is no longer a draft.
    #[error("Post is already published")]
    AlreadyPublished,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored state the schema's constraints should have made
    /// impossible.
    #[error("{0}")]
    Internal(String),
}
