//! The publish gateway seam.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SocialApiError;

/// A post that now exists on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedPost {
    /// Permanent platform-side post identifier.
    pub id: String,
    /// Public URL of the published post, when the platform returns one.
    #[serde(default)]
    pub permalink: Option<String>,
}

/// Creates and publishes posts on the external platform.
#[async_trait]
pub trait SocialGateway: Send + Sync {
    /// Create and publish a single-image post in one call.
    async fn publish_single(
        &self,
        image_url: &str,
        caption: &str,
    ) -> Result<PublishedPost, SocialApiError>;

    /// Create and publish a carousel in one atomic call. The URL list
    /// order is the order the published carousel shows.
    async fn publish_carousel(
        &self,
        image_urls: &[String],
        caption: &str,
    ) -> Result<PublishedPost, SocialApiError>;
}
