//! Repository for the `slides` table.
//!
//! Slide ordering is 1-based and contiguous per post; removal and
//! reorder renumber inside a transaction (the unique constraint on
//! `(post_id, sort_order)` is deferred to commit).

use sqlx::PgPool;
use vitrine_core::types::DbId;

use crate::models::slide::{CreateSlide, Slide, UpdateSlide};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, post_id, sort_order, title, subtitle, description, cta_text, \
    cta_link, period_text, tag_text, decorative_element, custom_element_url, element_position, \
    element_offset_top, element_offset_left, element_offset_right, element_offset_bottom, \
    element_size, element_opacity, element_layer, created_at, updated_at";

/// Provides CRUD and ordering operations for slides.
pub struct SlideRepo;

impl SlideRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Append a slide to a post, auto-assigning the next sort order.
    pub async fn create(
        pool: &PgPool,
        post_id: DbId,
        input: &CreateSlide,
    ) -> Result<Slide, sqlx::Error> {
        let (element_kind, element_url) = match &input.decorative_element {
            Some(element) => element.to_parts(),
            None => ("none", None),
        };
        let offsets = input.element_offsets.as_ref();
        let query = format!(
            "INSERT INTO slides
                (post_id, sort_order, title, subtitle, description, cta_text, cta_link,
                 period_text, tag_text, decorative_element, custom_element_url,
                 element_position, element_offset_top, element_offset_left,
                 element_offset_right, element_offset_bottom, element_size,
                 element_opacity, element_layer)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM slides WHERE post_id = $1),
                $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slide>(&query)
            .bind(post_id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.description)
            .bind(&input.cta_text)
            .bind(&input.cta_link)
            .bind(&input.period_text)
            .bind(&input.tag_text)
            .bind(element_kind)
            .bind(element_url)
            .bind(input.element_position.map(|a| a.as_str()).unwrap_or("bottom-right"))
            .bind(offsets.and_then(|o| o.top.clone()))
            .bind(offsets.and_then(|o| o.left.clone()))
            .bind(offsets.and_then(|o| o.right.clone()))
            .bind(offsets.and_then(|o| o.bottom.clone()))
            .bind(input.element_size.map(|s| s.as_str()).unwrap_or("medium"))
            .bind(input.element_opacity.unwrap_or(100))
            .bind(input.element_layer.map(|l| l.as_str()).unwrap_or("background"))
            .fetch_one(pool)
            .await
    }

    /// Find a slide by ID, scoped to its post.
    pub async fn find_for_post(
        pool: &PgPool,
        post_id: DbId,
        slide_id: DbId,
    ) -> Result<Option<Slide>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slides WHERE id = $2 AND post_id = $1");
        sqlx::query_as::<_, Slide>(&query)
            .bind(post_id)
            .bind(slide_id)
            .fetch_optional(pool)
            .await
    }

    /// List a post's slides in display order.
    pub async fn list_by_post(pool: &PgPool, post_id: DbId) -> Result<Vec<Slide>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slides WHERE post_id = $1 ORDER BY sort_order");
        sqlx::query_as::<_, Slide>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Count a post's slides.
    pub async fn count_for_post(pool: &PgPool, post_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM slides WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await
    }

    /// Patch a slide. Only non-`None` fields in `input` are applied.
    /// A present `decorative_element` replaces the kind and custom URL
    /// as a pair; a present `element_offsets` replaces all four offset
    /// columns.
    ///
    /// Returns `None` when the slide does not exist under `post_id`.
    pub async fn update(
        pool: &PgPool,
        post_id: DbId,
        slide_id: DbId,
        input: &UpdateSlide,
    ) -> Result<Option<Slide>, sqlx::Error> {
        let (element_kind, element_url) = match &input.decorative_element {
            Some(element) => {
                let (kind, url) = element.to_parts();
                (Some(kind), url)
            }
            None => (None, None),
        };
        let offsets = input.element_offsets.as_ref();
        let query = format!(
            "UPDATE slides SET
                title = COALESCE($3, title),
                subtitle = COALESCE($4, subtitle),
                description = COALESCE($5, description),
                cta_text = COALESCE($6, cta_text),
                cta_link = COALESCE($7, cta_link),
                period_text = COALESCE($8, period_text),
                tag_text = COALESCE($9, tag_text),
                decorative_element = CASE WHEN $10 THEN $11 ELSE decorative_element END,
                custom_element_url = CASE WHEN $10 THEN $12 ELSE custom_element_url END,
                element_position = COALESCE($13, element_position),
                element_offset_top = CASE WHEN $14 THEN $15 ELSE element_offset_top END,
                element_offset_left = CASE WHEN $14 THEN $16 ELSE element_offset_left END,
                element_offset_right = CASE WHEN $14 THEN $17 ELSE element_offset_right END,
                element_offset_bottom = CASE WHEN $14 THEN $18 ELSE element_offset_bottom END,
                element_size = COALESCE($19, element_size),
                element_opacity = COALESCE($20, element_opacity),
                element_layer = COALESCE($21, element_layer)
             WHERE id = $2 AND post_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slide>(&query)
            .bind(post_id)
            .bind(slide_id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.description)
            .bind(&input.cta_text)
            .bind(&input.cta_link)
            .bind(&input.period_text)
            .bind(&input.tag_text)
            .bind(input.decorative_element.is_some())
            .bind(element_kind)
            .bind(element_url)
            .bind(input.element_position.map(|a| a.as_str()))
            .bind(offsets.is_some())
            .bind(offsets.and_then(|o| o.top.clone()))
            .bind(offsets.and_then(|o| o.left.clone()))
            .bind(offsets.and_then(|o| o.right.clone()))
            .bind(offsets.and_then(|o| o.bottom.clone()))
            .bind(input.element_size.map(|s| s.as_str()))
            .bind(input.element_opacity)
            .bind(input.element_layer.map(|l| l.as_str()))
            .fetch_optional(pool)
            .await
    }

    // ── Ordering ─────────────────────────────────────────────────────

    /// Remove a slide and close the gap, renumbering the survivors
    /// contiguously from 1. Both steps run in one transaction.
    ///
    /// Returns the remaining slides in order, or `None` if the slide
    /// did not exist under `post_id`.
    pub async fn remove_and_renumber(
        pool: &PgPool,
        post_id: DbId,
        slide_id: DbId,
    ) -> Result<Option<Vec<Slide>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted: Option<(DbId,)> =
            sqlx::query_as("DELETE FROM slides WHERE id = $2 AND post_id = $1 RETURNING id")
                .bind(post_id)
                .bind(slide_id)
                .fetch_optional(&mut *tx)
                .await?;
        if deleted.is_none() {
            return Ok(None);
        }

        sqlx::query(
            "UPDATE slides SET sort_order = ranked.new_order
             FROM (
                 SELECT id, (ROW_NUMBER() OVER (ORDER BY sort_order))::int AS new_order
                 FROM slides WHERE post_id = $1
             ) ranked
             WHERE slides.id = ranked.id AND slides.sort_order <> ranked.new_order",
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM slides WHERE post_id = $1 ORDER BY sort_order");
        let remaining = sqlx::query_as::<_, Slide>(&query)
            .bind(post_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(remaining))
    }

    /// Apply a full new ordering: position in `ordered_ids` becomes the
    /// 1-based sort order. The caller validates that the list is a
    /// permutation of the post's slide IDs.
    pub async fn reorder(
        pool: &PgPool,
        post_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<Vec<Slide>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for (index, slide_id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE slides SET sort_order = $3 WHERE id = $2 AND post_id = $1")
                .bind(post_id)
                .bind(slide_id)
                .bind((index + 1) as i32)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!("SELECT {COLUMNS} FROM slides WHERE post_id = $1 ORDER BY sort_order");
        let slides = sqlx::query_as::<_, Slide>(&query)
            .bind(post_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(slides)
    }
}
