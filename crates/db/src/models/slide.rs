//! Slide entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::anchor::{Anchor, CustomOffsets, SizeClass};
use vitrine_core::composition::{DecorativeElement, ElementLayer, SlideContent};
use vitrine_core::error::CoreError;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `slides` table. `sort_order` is 1-based and
/// contiguous within a post.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slide {
    pub id: DbId,
    pub post_id: DbId,
    pub sort_order: i32,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub period_text: Option<String>,
    pub tag_text: Option<String>,
    pub decorative_element: String,
    pub custom_element_url: Option<String>,
    pub element_position: String,
    pub element_offset_top: Option<String>,
    pub element_offset_left: Option<String>,
    pub element_offset_right: Option<String>,
    pub element_offset_bottom: Option<String>,
    pub element_size: String,
    pub element_opacity: i16,
    pub element_layer: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Slide {
    /// Convert the flat row into the domain content struct.
    ///
    /// A `custom` element tag without a stored URL fails here with a
    /// validation error, which the publish flow reports against the
    /// slide's order.
    pub fn content(&self) -> Result<SlideContent, CoreError> {
        Ok(SlideContent {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            description: self.description.clone(),
            cta_text: self.cta_text.clone(),
            cta_link: self.cta_link.clone(),
            period_text: self.period_text.clone(),
            tag_text: self.tag_text.clone(),
            decorative_element: DecorativeElement::from_parts(
                &self.decorative_element,
                self.custom_element_url.as_deref(),
            )?,
            element_position: Anchor::parse(&self.element_position).ok_or_else(|| {
                CoreError::Internal(format!(
                    "Unknown element position '{}'",
                    self.element_position
                ))
            })?,
            element_offsets: CustomOffsets {
                top: self.element_offset_top.clone(),
                left: self.element_offset_left.clone(),
                right: self.element_offset_right.clone(),
                bottom: self.element_offset_bottom.clone(),
            },
            element_size: SizeClass::parse(&self.element_size).ok_or_else(|| {
                CoreError::Internal(format!("Unknown element size '{}'", self.element_size))
            })?,
            element_opacity: self.element_opacity,
            element_layer: ElementLayer::parse(&self.element_layer).ok_or_else(|| {
                CoreError::Internal(format!("Unknown element layer '{}'", self.element_layer))
            })?,
        })
    }
}

/// DTO for appending a slide to a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSlide {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub period_text: Option<String>,
    pub tag_text: Option<String>,
    pub decorative_element: Option<DecorativeElement>,
    pub element_position: Option<Anchor>,
    pub element_offsets: Option<CustomOffsets>,
    pub element_size: Option<SizeClass>,
    pub element_opacity: Option<i16>,
    pub element_layer: Option<ElementLayer>,
}

/// DTO for patching a slide. All fields optional. A present
/// `decorative_element` replaces both the kind and the custom URL; a
/// present `element_offsets` replaces all four offset columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSlide {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub period_text: Option<String>,
    pub tag_text: Option<String>,
    pub decorative_element: Option<DecorativeElement>,
    pub element_position: Option<Anchor>,
    pub element_offsets: Option<CustomOffsets>,
    pub element_size: Option<SizeClass>,
    pub element_opacity: Option<i16>,
    pub element_layer: Option<ElementLayer>,
}
