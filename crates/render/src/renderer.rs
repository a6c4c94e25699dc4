//! Two-tier slide renderer.
//!
//! Tier one POSTs the slide document to the snapshot service; on any
//! failure there the renderer logs a warning and falls back to tier
//! two, the in-process capture engine fed by the styled tree. Errors
//! from the fallback tier are final.

use std::sync::Arc;

use vitrine_core::composition::{SlideContent, StyleSettings};

use crate::capture::{self, BlockRasterEngine, CaptureEngine};
use crate::document;
use crate::error::RenderError;
use crate::output::RenderedImage;
use crate::snapshot::SnapshotClient;

/// Renders one staged slide to a finished raster image.
pub struct SlideRenderer {
    snapshot: Option<SnapshotClient>,
    engine: Arc<dyn CaptureEngine>,
}

impl SlideRenderer {
    /// Create a renderer with an optional snapshot tier and the
    /// capture engine used as fallback.
    pub fn new(snapshot: Option<SnapshotClient>, engine: Arc<dyn CaptureEngine>) -> Self {
        Self { snapshot, engine }
    }

    /// Render a slide, trying the snapshot tier first.
    pub async fn render_slide(
        &self,
        content: &SlideContent,
        style: &StyleSettings,
    ) -> Result<RenderedImage, RenderError> {
        if let Some(client) = &self.snapshot {
            let doc = document::build_document(content, style);
            match client.render(&doc).await {
                Ok(image) => return Ok(image),
                Err(error) => {
                    tracing::warn!(error = %error, "Snapshot render failed, falling back to capture");
                }
            }
        }

        let tree = document::build_styled_tree(content, style);
        capture::capture_slide(self.engine.as_ref(), &tree).await
    }

    /// Whether a snapshot tier is configured.
    pub fn has_snapshot_tier(&self) -> bool {
        self.snapshot.is_some()
    }
}

impl Default for SlideRenderer {
    /// Capture-only renderer with the built-in block engine.
    fn default() -> Self {
        Self::new(None, Arc::new(BlockRasterEngine))
    }
}
