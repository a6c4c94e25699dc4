//! Moderation record entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::error::CoreError;
use vitrine_core::moderation::ModerationStatus;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `moderation_records` table: the review state and
/// editor overrides for one featured artist profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModerationRecord {
    pub id: DbId,
    pub subject_id: DbId,
    pub status: String,
    pub edited_bio: Option<String>,
    pub edited_instagram: Option<String>,
    pub edited_facebook: Option<String>,
    pub edited_linkedin: Option<String>,
    pub edited_caption: Option<String>,
    pub moderator_notes: Option<String>,
    pub moderated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ModerationRecord {
    pub fn status_kind(&self) -> Result<ModerationStatus, CoreError> {
        ModerationStatus::parse(&self.status).ok_or_else(|| {
            CoreError::Internal(format!("Unknown moderation status '{}'", self.status))
        })
    }
}

/// DTO for upserting a record's editable fields. None of these touch
/// the status; writable in any state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertModerationRecord {
    pub edited_bio: Option<String>,
    pub edited_instagram: Option<String>,
    pub edited_facebook: Option<String>,
    pub edited_linkedin: Option<String>,
    pub edited_caption: Option<String>,
    pub moderator_notes: Option<String>,
}
