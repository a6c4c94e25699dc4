//! Composition model: the in-memory description of one post.
//!
//! A post is one or more 1080×1080 slides plus global style settings.
//! The types here carry no behavior beyond their invariants: slide
//! counts stay within [1, 10], slide ordering is 1-based and contiguous,
//! and a `custom` decorative element cannot exist without its uploaded
//! asset URL (the variant carries the URL, so the invalid state is
//! unrepresentable).

use serde::{Deserialize, Serialize};

use crate::anchor::{Anchor, CustomOffsets, SizeClass};
use crate::color::Rgb;
use crate::error::CoreError;
use crate::types::DbId;

/// A post always has at least one slide.
pub const MIN_SLIDES: usize = 1;

/// The platform caps carousels at ten images.
pub const MAX_SLIDES: usize = 10;

// ---------------------------------------------------------------------------
// Post lifecycle
// ---------------------------------------------------------------------------

/// Post lifecycle status. Published posts are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

/// Which template the post was built from.
///
/// `Profile` posts feature a moderation subject (an artist profile) and
/// may only be published once that subject is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostTemplate {
    Standard,
    Profile,
}

impl PostTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            PostTemplate::Standard => "standard",
            PostTemplate::Profile => "profile",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(PostTemplate::Standard),
            "profile" => Some(PostTemplate::Profile),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decorative elements
// ---------------------------------------------------------------------------

/// Decorative overlay graphic placed on a slide.
///
/// The `Custom` variant carries the uploaded asset URL as a required
/// field; there is no way to construct "custom with no URL".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecorativeElement {
    None,
    Waves,
    Burst,
    Blob,
    Frame,
    Custom { url: String },
}

impl DecorativeElement {
    /// Text tag stored in the database `decorative_element` column.
    pub fn kind_str(&self) -> &'static str {
        match self {
            DecorativeElement::None => "none",
            DecorativeElement::Waves => "waves",
            DecorativeElement::Burst => "burst",
            DecorativeElement::Blob => "blob",
            DecorativeElement::Frame => "frame",
            DecorativeElement::Custom { .. } => "custom",
        }
    }

    /// URL of the uploaded asset, for the `Custom` variant only.
    pub fn custom_url(&self) -> Option<&str> {
        match self {
            DecorativeElement::Custom { url } => Some(url),
            _ => None,
        }
    }

    /// Rebuild from the flat database representation.
    ///
    /// A `custom` tag without a stored URL is the one invalid
    /// combination the flat form can express; it surfaces as a
    /// validation error rather than a panic.
    pub fn from_parts(kind: &str, custom_url: Option<&str>) -> Result<Self, CoreError> {
        match kind {
            "none" => Ok(DecorativeElement::None),
            "waves" => Ok(DecorativeElement::Waves),
            "burst" => Ok(DecorativeElement::Burst),
            "blob" => Ok(DecorativeElement::Blob),
            "frame" => Ok(DecorativeElement::Frame),
            "custom" => match custom_url {
                Some(url) if !url.trim().is_empty() => Ok(DecorativeElement::Custom {
                    url: url.to_string(),
                }),
                _ => Err(CoreError::Validation(
                    "Custom decorative element requires an uploaded asset URL".to_string(),
                )),
            },
            other => Err(CoreError::Validation(format!(
                "Unknown decorative element '{other}'"
            ))),
        }
    }

    /// Flatten for database storage: `(kind, custom_url)`.
    pub fn to_parts(&self) -> (&'static str, Option<&str>) {
        (self.kind_str(), self.custom_url())
    }
}

impl Default for DecorativeElement {
    fn default() -> Self {
        DecorativeElement::None
    }
}

/// Whether a decorative element renders behind or in front of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementLayer {
    Background,
    Foreground,
}

impl ElementLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementLayer::Background => "background",
            ElementLayer::Foreground => "foreground",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "background" => Some(ElementLayer::Background),
            "foreground" => Some(ElementLayer::Foreground),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Style settings
// ---------------------------------------------------------------------------

/// Which rendition of the studio logo a post uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoVariant {
    Dark,
    Color,
    Gradient,
    Light,
}

impl LogoVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            LogoVariant::Dark => "dark",
            LogoVariant::Color => "color",
            LogoVariant::Gradient => "gradient",
            LogoVariant::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(LogoVariant::Dark),
            "color" => Some(LogoVariant::Color),
            "gradient" => Some(LogoVariant::Gradient),
            "light" => Some(LogoVariant::Light),
            _ => None,
        }
    }
}

/// Full-canvas decorative background effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecorativeEffect {
    None,
    Gradient,
    OrganicBlobs,
    DotGrid,
}

impl DecorativeEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            DecorativeEffect::None => "none",
            DecorativeEffect::Gradient => "gradient",
            DecorativeEffect::OrganicBlobs => "organic-blobs",
            DecorativeEffect::DotGrid => "dot-grid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(DecorativeEffect::None),
            "gradient" => Some(DecorativeEffect::Gradient),
            "organic-blobs" => Some(DecorativeEffect::OrganicBlobs),
            "dot-grid" => Some(DecorativeEffect::DotGrid),
            _ => None,
        }
    }
}

/// Global visual settings shared by every slide of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    pub background_color: Rgb,
    pub title_color: Rgb,
    pub subtitle_color: Rgb,
    pub description_color: Rgb,
    pub accent_color: Rgb,
    pub logo_position: Anchor,
    /// Honored only when `logo_position` is `custom`.
    #[serde(default)]
    pub logo_offsets: CustomOffsets,
    pub logo_size: SizeClass,
    pub logo_variant: LogoVariant,
    pub decorative_effect: DecorativeEffect,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            background_color: Rgb::new(0xff, 0xff, 0xff),
            title_color: Rgb::new(0x11, 0x11, 0x11),
            subtitle_color: Rgb::new(0x44, 0x44, 0x44),
            description_color: Rgb::new(0x33, 0x33, 0x33),
            accent_color: Rgb::new(0xe4, 0x57, 0x2e),
            logo_position: Anchor::BottomRight,
            logo_offsets: CustomOffsets::default(),
            logo_size: SizeClass::Small,
            logo_variant: LogoVariant::Dark,
            decorative_effect: DecorativeEffect::None,
        }
    }
}

// ---------------------------------------------------------------------------
// Slide content
// ---------------------------------------------------------------------------

/// Everything an individual slide contributes to rendering and caption
/// generation. Ordering lives on the persistence row, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub period_text: Option<String>,
    pub tag_text: Option<String>,
    #[serde(default)]
    pub decorative_element: DecorativeElement,
    pub element_position: Anchor,
    /// Honored only when `element_position` is `custom`.
    #[serde(default)]
    pub element_offsets: CustomOffsets,
    pub element_size: SizeClass,
    /// Opacity of the decorative element, percent in `[0, 100]`.
    pub element_opacity: i16,
    pub element_layer: ElementLayer,
}

impl Default for SlideContent {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            description: None,
            cta_text: None,
            cta_link: None,
            period_text: None,
            tag_text: None,
            decorative_element: DecorativeElement::None,
            element_position: Anchor::BottomRight,
            element_offsets: CustomOffsets::default(),
            element_size: SizeClass::Medium,
            element_opacity: 100,
            element_layer: ElementLayer::Background,
        }
    }
}

// ---------------------------------------------------------------------------
// Image URLs
// ---------------------------------------------------------------------------

/// Published image location(s): a scalar URL for single-image posts, an
/// ordered array (index = slide order) for carousels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageUrl {
    Single(String),
    Many(Vec<String>),
}

impl ImageUrl {
    /// Collapse a stored URL list into the API shape.
    ///
    /// Returns `None` for an empty list (nothing rendered yet).
    pub fn from_list(urls: &[String], is_carousel: bool) -> Option<Self> {
        if urls.is_empty() {
            return None;
        }
        if is_carousel {
            Some(ImageUrl::Many(urls.to_vec()))
        } else {
            Some(ImageUrl::Single(urls[0].clone()))
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant checks
// ---------------------------------------------------------------------------

/// Validate a publishable slide count (`[1, 10]`).
pub fn validate_slide_count(count: usize) -> Result<(), CoreError> {
    if (MIN_SLIDES..=MAX_SLIDES).contains(&count) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Slide count must be between {MIN_SLIDES} and {MAX_SLIDES}, got {count}"
        )))
    }
}

/// Check that one more slide may be added.
pub fn can_add_slide(current_count: usize) -> Result<(), CoreError> {
    if current_count >= MAX_SLIDES {
        Err(CoreError::Validation(format!(
            "A post cannot have more than {MAX_SLIDES} slides"
        )))
    } else {
        Ok(())
    }
}

/// Check that a slide may be removed. Removing the only slide is
/// rejected; a post always keeps at least one.
pub fn can_remove_slide(current_count: usize) -> Result<(), CoreError> {
    if current_count <= MIN_SLIDES {
        Err(CoreError::Validation(
            "Cannot remove the only slide of a post".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate an element opacity percentage.
pub fn validate_opacity(value: i16) -> Result<(), CoreError> {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Element opacity must be within [0, 100], got {value}"
        )))
    }
}

/// Validate a requested reorder against the existing slide IDs.
///
/// The request must be a permutation of the existing IDs: same length,
/// no duplicates, no unknown IDs. Positions in the request become the
/// new 1-based contiguous order.
pub fn validate_reorder(existing: &[DbId], requested: &[DbId]) -> Result<(), CoreError> {
    if requested.len() != existing.len() {
        return Err(CoreError::Validation(format!(
            "Reorder must list all {} slides, got {}",
            existing.len(),
            requested.len()
        )));
    }

    let mut seen = std::collections::HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Slide {id} appears more than once in the reorder request"
            )));
        }
        if !existing.contains(id) {
            return Err(CoreError::Validation(format!(
                "Slide {id} does not belong to this post"
            )));
        }
    }
    Ok(())
}
