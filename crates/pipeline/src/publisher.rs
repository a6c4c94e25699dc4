//! End-to-end publish flow.
//!
//! Chains the stages behind `POST /api/v1/posts/{id}/publish`:
//! validate → moderation gate → sequential render → ordered upload →
//! persist URLs on the draft → platform publish → state transitions.
//!
//! The uploaded URL list is written back to the draft *before* the
//! platform call: if the platform rejects the post, a retry reuses the
//! uploads instead of re-rendering.

use std::sync::Arc;

use sqlx::PgPool;
use vitrine_core::composition::{self, PostTemplate, SlideContent, StyleSettings};
use vitrine_core::error::CoreError;
use vitrine_core::moderation::ModerationStatus;
use vitrine_core::naming;
use vitrine_core::types::DbId;
use vitrine_db::models::post::Post;
use vitrine_db::repositories::{ModerationRepo, PostRepo, SlideRepo};
use vitrine_events::{EventBus, StudioEvent};
use vitrine_social::SocialGateway;
use vitrine_storage::ObjectStorage;

use crate::error::PublishError;
use crate::orchestrator::CarouselOrchestrator;
use crate::surface::SlideSurface;

/// Runs the publish flow for draft posts.
pub struct PostPublisher {
    pool: PgPool,
    orchestrator: CarouselOrchestrator,
    storage: Arc<dyn ObjectStorage>,
    social: Arc<dyn SocialGateway>,
    bus: Arc<EventBus>,
}

impl PostPublisher {
    pub fn new(
        pool: PgPool,
        orchestrator: CarouselOrchestrator,
        storage: Arc<dyn ObjectStorage>,
        social: Arc<dyn SocialGateway>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            pool,
            orchestrator,
            storage,
            social,
            bus,
        }
    }

    /// Publish a draft post.
    ///
    /// On platform rejection the draft and its uploaded image URLs are
    /// kept; the caller gets the verbatim remote detail.
    pub async fn publish(&self, post: &Post) -> Result<Post, PublishError> {
        if post.is_published() {
            return Err(PublishError::AlreadyPublished);
        }
        let template = post
            .template_kind()
            .map_err(|e| PublishError::Internal(e.to_string()))?;
        let style = post
            .style_settings()
            .map_err(|e| PublishError::Internal(e.to_string()))?;

        // Structural validation.
        let slides = SlideRepo::list_by_post(&self.pool, post.id).await?;
        composition::validate_slide_count(slides.len())
            .map_err(|_| PublishError::InvalidSlideCount(slides.len()))?;
        let mut contents = Vec::with_capacity(slides.len());
        for slide in &slides {
            let content = slide.content().map_err(|error| match error {
                CoreError::Validation(_) => PublishError::InvalidCustomElement {
                    slide_order: slide.sort_order,
                },
                other => PublishError::Internal(other.to_string()),
            })?;
            contents.push(content);
        }

        // Moderation gate for profile posts.
        let (gated_subject, caption_override) = self.check_moderation(post, template).await?;

        // Single-image posts materialize slide 1 only.
        let to_render: &[SlideContent] = if post.is_carousel {
            &contents
        } else {
            &contents[..1]
        };
        let urls = self.render_and_upload(post.id, to_render, &style).await?;

        // Keep the uploads on the draft so a retry after a platform
        // rejection skips straight to the publish call.
        if !PostRepo::save_image_urls(&self.pool, post.id, &urls).await? {
            return Err(PublishError::AlreadyPublished);
        }

        let caption = caption_override.unwrap_or_else(|| post.caption.clone());
        let published = if post.is_carousel {
            self.social.publish_carousel(&urls, &caption).await?
        } else {
            self.social.publish_single(&urls[0], &caption).await?
        };

        let updated = PostRepo::mark_published(
            &self.pool,
            post.id,
            &published.id,
            published.permalink.as_deref(),
        )
        .await?
        .ok_or(PublishError::AlreadyPublished)?;

        if let Some(subject_id) = gated_subject {
            self.advance_subject(subject_id).await;
        }

        self.bus.publish(
            StudioEvent::new("post.published")
                .with_source("post", updated.id)
                .with_payload(serde_json::json!({
                    "remote_post_id": published.id,
                    "is_carousel": updated.is_carousel,
                    "image_count": urls.len(),
                })),
        );
        tracing::info!(
            post_id = updated.id,
            remote_post_id = %published.id,
            is_carousel = updated.is_carousel,
            "Post published"
        );

        Ok(updated)
    }

    /// Render all slides, then upload them in slide order. Nothing is
    /// uploaded unless every slide rendered.
    async fn render_and_upload(
        &self,
        post_id: DbId,
        contents: &[SlideContent],
        style: &StyleSettings,
    ) -> Result<Vec<String>, PublishError> {
        let mut surface = SlideSurface::new();
        let rendered = self
            .orchestrator
            .render_all(&mut surface, contents, style)
            .await?;

        let mut urls = Vec::with_capacity(rendered.len());
        for slide in rendered {
            let key = naming::slide_image_key(post_id, slide.index as i32 + 1);
            let stored = self
                .storage
                .store(slide.image.bytes, &key)
                .await
                .map_err(|source| PublishError::Upload {
                    index: slide.index,
                    source,
                })?;
            urls.push(stored.url);
        }
        Ok(urls)
    }

    /// Profile posts pass only when their subject is approved. Returns
    /// the gated subject id and the moderator's caption override, when
    /// one is set.
    async fn check_moderation(
        &self,
        post: &Post,
        template: PostTemplate,
    ) -> Result<(Option<DbId>, Option<String>), PublishError> {
        if template != PostTemplate::Profile {
            return Ok((None, None));
        }
        let subject_id = post.subject_id.ok_or_else(|| {
            PublishError::Internal(format!("Profile post {} has no subject", post.id))
        })?;

        let Some(record) = ModerationRepo::find_by_subject(&self.pool, subject_id).await? else {
            return Err(PublishError::ModerationNotApproved {
                subject_id,
                status: "none".to_string(),
            });
        };
        let status = record
            .status_kind()
            .map_err(|e| PublishError::Internal(e.to_string()))?;
        if status != ModerationStatus::Approved {
            return Err(PublishError::ModerationNotApproved {
                subject_id,
                status: status.as_str().to_string(),
            });
        }

        let caption_override = record
            .edited_caption
            .clone()
            .filter(|caption| !caption.trim().is_empty());
        Ok((Some(subject_id), caption_override))
    }

    /// Drive the subject's `approved → published` transition. The post
    /// is already live at this point, so a refused or failed write is
    /// logged instead of unwinding the publish.
    async fn advance_subject(&self, subject_id: DbId) {
        match ModerationRepo::set_status(&self.pool, subject_id, ModerationStatus::Published).await
        {
            Ok(Some(_)) => {
                tracing::info!(subject_id, "Subject moved to published");
            }
            Ok(None) => {
                tracing::warn!(subject_id, "Subject left the approved state during publish");
            }
            Err(error) => {
                tracing::error!(error = %error, subject_id, "Failed to record subject publication");
            }
        }
    }
}
