//! Post entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::anchor::{Anchor, CustomOffsets, SizeClass};
use vitrine_core::color::Rgb;
use vitrine_core::composition::{
    DecorativeEffect, LogoVariant, PostStatus, PostTemplate, StyleSettings,
};
use vitrine_core::error::CoreError;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `posts` table. Style settings are flattened into
/// columns; [`Post::style_settings`] reassembles the domain struct.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub template: String,
    pub status: String,
    pub is_carousel: bool,
    pub subject_id: Option<DbId>,
    pub caption: String,
    pub image_urls: Vec<String>,
    pub remote_post_id: Option<String>,
    pub permalink: Option<String>,
    pub published_at: Option<Timestamp>,
    pub background_color: String,
    pub title_color: String,
    pub subtitle_color: String,
    pub description_color: String,
    pub accent_color: String,
    pub logo_position: String,
    pub logo_offset_top: Option<String>,
    pub logo_offset_left: Option<String>,
    pub logo_offset_right: Option<String>,
    pub logo_offset_bottom: Option<String>,
    pub logo_size: String,
    pub logo_variant: String,
    pub decorative_effect: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Post {
    pub fn status_kind(&self) -> Result<PostStatus, CoreError> {
        PostStatus::parse(&self.status)
            .ok_or_else(|| CoreError::Internal(format!("Unknown post status '{}'", self.status)))
    }

    pub fn template_kind(&self) -> Result<PostTemplate, CoreError> {
        PostTemplate::parse(&self.template).ok_or_else(|| {
            CoreError::Internal(format!("Unknown post template '{}'", self.template))
        })
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published.as_str()
    }

    /// Reassemble the flattened style columns into the domain struct.
    pub fn style_settings(&self) -> Result<StyleSettings, CoreError> {
        Ok(StyleSettings {
            background_color: parse_color("background_color", &self.background_color)?,
            title_color: parse_color("title_color", &self.title_color)?,
            subtitle_color: parse_color("subtitle_color", &self.subtitle_color)?,
            description_color: parse_color("description_color", &self.description_color)?,
            accent_color: parse_color("accent_color", &self.accent_color)?,
            logo_position: Anchor::parse(&self.logo_position).ok_or_else(|| {
                CoreError::Internal(format!("Unknown logo position '{}'", self.logo_position))
            })?,
            logo_offsets: CustomOffsets {
                top: self.logo_offset_top.clone(),
                left: self.logo_offset_left.clone(),
                right: self.logo_offset_right.clone(),
                bottom: self.logo_offset_bottom.clone(),
            },
            logo_size: SizeClass::parse(&self.logo_size).ok_or_else(|| {
                CoreError::Internal(format!("Unknown logo size '{}'", self.logo_size))
            })?,
            logo_variant: LogoVariant::parse(&self.logo_variant).ok_or_else(|| {
                CoreError::Internal(format!("Unknown logo variant '{}'", self.logo_variant))
            })?,
            decorative_effect: DecorativeEffect::parse(&self.decorative_effect).ok_or_else(
                || {
                    CoreError::Internal(format!(
                        "Unknown decorative effect '{}'",
                        self.decorative_effect
                    ))
                },
            )?,
        })
    }
}

fn parse_color(column: &str, value: &str) -> Result<Rgb, CoreError> {
    value
        .parse()
        .map_err(|_| CoreError::Internal(format!("Invalid color in {column}: '{value}'")))
}

/// DTO for creating a new post. The first slide is created alongside.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    pub template: Option<PostTemplate>,
    pub subject_id: Option<DbId>,
    pub is_carousel: Option<bool>,
}

/// DTO for updating a draft post. All fields optional; omitted fields
/// keep their stored value. `logo_offsets`, when present, replaces all
/// four offset columns at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub caption: Option<String>,
    pub is_carousel: Option<bool>,
    pub background_color: Option<Rgb>,
    pub title_color: Option<Rgb>,
    pub subtitle_color: Option<Rgb>,
    pub description_color: Option<Rgb>,
    pub accent_color: Option<Rgb>,
    pub logo_position: Option<Anchor>,
    pub logo_offsets: Option<CustomOffsets>,
    pub logo_size: Option<SizeClass>,
    pub logo_variant: Option<LogoVariant>,
    pub decorative_effect: Option<DecorativeEffect>,
}
