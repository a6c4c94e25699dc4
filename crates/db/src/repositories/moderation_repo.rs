//! Repository for the `moderation_records` table.
//!
//! Records are created lazily: the first moderation action on a
//! subject (field edit or status change) inserts the row.

use sqlx::PgPool;
use vitrine_core::moderation::ModerationStatus;
use vitrine_core::types::DbId;

use crate::models::moderation::{ModerationRecord, UpsertModerationRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject_id, status, edited_bio, edited_instagram, edited_facebook, \
    edited_linkedin, edited_caption, moderator_notes, moderated_at, created_at, updated_at";

/// Provides moderation-record operations keyed by subject ID.
pub struct ModerationRepo;

impl ModerationRepo {
    /// List all records, most recently touched first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ModerationRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM moderation_records ORDER BY updated_at DESC");
        sqlx::query_as::<_, ModerationRecord>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find the record for a subject.
    pub async fn find_by_subject(
        pool: &PgPool,
        subject_id: DbId,
    ) -> Result<Option<ModerationRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM moderation_records WHERE subject_id = $1");
        sqlx::query_as::<_, ModerationRecord>(&query)
            .bind(subject_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert the editable fields for a subject, creating the record
    /// (status `pending`) on first touch. Only non-`None` fields are
    /// applied; the status is never modified here.
    pub async fn upsert_fields(
        pool: &PgPool,
        subject_id: DbId,
        input: &UpsertModerationRecord,
    ) -> Result<ModerationRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO moderation_records
                (subject_id, edited_bio, edited_instagram, edited_facebook,
                 edited_linkedin, edited_caption, moderator_notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (subject_id) DO UPDATE SET
                edited_bio = COALESCE($2, moderation_records.edited_bio),
                edited_instagram = COALESCE($3, moderation_records.edited_instagram),
                edited_facebook = COALESCE($4, moderation_records.edited_facebook),
                edited_linkedin = COALESCE($5, moderation_records.edited_linkedin),
                edited_caption = COALESCE($6, moderation_records.edited_caption),
                moderator_notes = COALESCE($7, moderation_records.moderator_notes)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModerationRecord>(&query)
            .bind(subject_id)
            .bind(&input.edited_bio)
            .bind(&input.edited_instagram)
            .bind(&input.edited_facebook)
            .bind(&input.edited_linkedin)
            .bind(&input.edited_caption)
            .bind(&input.moderator_notes)
            .fetch_one(pool)
            .await
    }

    /// Move a subject's status, enforcing the state machine in the
    /// WHERE clause: approve/reject require `pending`, publish requires
    /// `approved`. A refused write returns `None` with the row
    /// untouched; the caller inspects the current status to distinguish
    /// an idempotent repeat from a conflict.
    ///
    /// The record is created lazily (as `pending`) so approving or
    /// rejecting a never-touched subject works in one call.
    pub async fn set_status(
        pool: &PgPool,
        subject_id: DbId,
        to: ModerationStatus,
    ) -> Result<Option<ModerationRecord>, sqlx::Error> {
        let required_from = match to {
            ModerationStatus::Approved | ModerationStatus::Rejected => ModerationStatus::Pending,
            ModerationStatus::Published => ModerationStatus::Approved,
            // Nothing transitions back to pending.
            ModerationStatus::Pending => return Ok(None),
        };

        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO moderation_records (subject_id) VALUES ($1)
             ON CONFLICT (subject_id) DO NOTHING",
        )
        .bind(subject_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE moderation_records SET status = $2, moderated_at = NOW()
             WHERE subject_id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, ModerationRecord>(&query)
            .bind(subject_id)
            .bind(to.as_str())
            .bind(required_from.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record)
    }
}
