//! Repository for the `posts` table.
//!
//! Published rows are immutable: every mutating query carries
//! `AND status = 'draft'`, so an update or delete against a published
//! post simply affects no rows.

use sqlx::PgPool;
use vitrine_core::composition::PostStatus;
use vitrine_core::types::DbId;

use crate::models::post::{CreatePost, Post, UpdatePost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, template, status, is_carousel, subject_id, caption, image_urls, \
    remote_post_id, permalink, published_at, background_color, title_color, subtitle_color, \
    description_color, accent_color, logo_position, logo_offset_top, logo_offset_left, \
    logo_offset_right, logo_offset_bottom, logo_size, logo_variant, decorative_effect, \
    created_at, updated_at";

/// Provides CRUD and publish-flow operations for posts.
pub struct PostRepo;

impl PostRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new draft post with default style settings.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (template, subject_id, is_carousel)
             VALUES (COALESCE($1, 'standard'), $2, COALESCE($3, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(input.template.map(|t| t.as_str()))
            .bind(input.subject_id)
            .bind(input.is_carousel)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all posts, most recently touched first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts ORDER BY updated_at DESC");
        sqlx::query_as::<_, Post>(&query).fetch_all(pool).await
    }

    /// Patch a draft post. Only non-`None` fields in `input` are
    /// applied; a present `logo_offsets` replaces all four offset
    /// columns at once (clearing the ones it leaves unset).
    ///
    /// Returns `None` when the row does not exist or is published.
    pub async fn update_draft(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                caption = COALESCE($2, caption),
                is_carousel = COALESCE($3, is_carousel),
                background_color = COALESCE($4, background_color),
                title_color = COALESCE($5, title_color),
                subtitle_color = COALESCE($6, subtitle_color),
                description_color = COALESCE($7, description_color),
                accent_color = COALESCE($8, accent_color),
                logo_position = COALESCE($9, logo_position),
                logo_offset_top = CASE WHEN $10 THEN $11 ELSE logo_offset_top END,
                logo_offset_left = CASE WHEN $10 THEN $12 ELSE logo_offset_left END,
                logo_offset_right = CASE WHEN $10 THEN $13 ELSE logo_offset_right END,
                logo_offset_bottom = CASE WHEN $10 THEN $14 ELSE logo_offset_bottom END,
                logo_size = COALESCE($15, logo_size),
                logo_variant = COALESCE($16, logo_variant),
                decorative_effect = COALESCE($17, decorative_effect)
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        let offsets = input.logo_offsets.as_ref();
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.caption)
            .bind(input.is_carousel)
            .bind(input.background_color.map(|c| c.to_hex()))
            .bind(input.title_color.map(|c| c.to_hex()))
            .bind(input.subtitle_color.map(|c| c.to_hex()))
            .bind(input.description_color.map(|c| c.to_hex()))
            .bind(input.accent_color.map(|c| c.to_hex()))
            .bind(input.logo_position.map(|a| a.as_str()))
            .bind(offsets.is_some())
            .bind(offsets.and_then(|o| o.top.clone()))
            .bind(offsets.and_then(|o| o.left.clone()))
            .bind(offsets.and_then(|o| o.right.clone()))
            .bind(offsets.and_then(|o| o.bottom.clone()))
            .bind(input.logo_size.map(|s| s.as_str()))
            .bind(input.logo_variant.map(|v| v.as_str()))
            .bind(input.decorative_effect.map(|e| e.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a draft post (slides cascade). Returns `false` when the
    /// row does not exist or is published.
    pub async fn delete_draft(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND status = 'draft'")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Publish flow ─────────────────────────────────────────────────

    /// Overwrite the caption of a draft post.
    pub async fn set_caption(pool: &PgPool, id: DbId, caption: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE posts SET caption = $2 WHERE id = $1 AND status = 'draft'")
            .bind(id)
            .bind(caption)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist the uploaded image URLs onto a draft, ordered by slide.
    /// Runs before the publish call so a retry can reuse the uploads.
    pub async fn save_image_urls(
        pool: &PgPool,
        id: DbId,
        urls: &[String],
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE posts SET image_urls = $2 WHERE id = $1 AND status = 'draft'")
                .bind(id)
                .bind(urls)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip a draft to published and store the platform identifiers.
    ///
    /// Returns `None` when the row does not exist or was already
    /// published (the draft-only guard makes the flip race-safe).
    pub async fn mark_published(
        pool: &PgPool,
        id: DbId,
        remote_post_id: &str,
        permalink: Option<&str>,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                status = $2,
                remote_post_id = $3,
                permalink = $4,
                published_at = NOW()
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(PostStatus::Published.as_str())
            .bind(remote_post_id)
            .bind(permalink)
            .fetch_optional(pool)
            .await
    }
}
