//! Sequential carousel rendering.

use std::sync::Arc;
use std::time::Duration;

use vitrine_core::composition::{SlideContent, StyleSettings};
use vitrine_render::{RenderedImage, SlideRenderer};

use crate::error::PublishError;
use crate::surface::SlideSurface;

/// Pause between staging a slide and rendering it, mirroring the paint
/// settle the editor surface needs before a capture is faithful.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(150);

/// One finished slide image, tagged with its 0-based index.
#[derive(Debug)]
pub struct RenderedSlide {
    pub index: usize,
    pub image: RenderedImage,
}

/// Drives the renderer once per slide, strictly in order.
pub struct CarouselOrchestrator {
    renderer: Arc<SlideRenderer>,
    settle: Duration,
}

impl CarouselOrchestrator {
    pub fn new(renderer: Arc<SlideRenderer>) -> Self {
        Self {
            renderer,
            settle: DEFAULT_SETTLE,
        }
    }

    /// Override the settle delay. Tests use zero.
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Render every slide into an ordered image list.
    ///
    /// The loop is deliberately sequential: the surface holds one slide
    /// at a time, and parallel rendering would race "switch slide"
    /// against "capture". Any failure aborts the run, discards the
    /// images rendered so far, and reports the failing slide's index.
    /// The editor's viewed slide is re-staged afterwards either way.
    pub async fn render_all(
        &self,
        surface: &mut SlideSurface,
        slides: &[SlideContent],
        style: &StyleSettings,
    ) -> Result<Vec<RenderedSlide>, PublishError> {
        let viewed = surface.viewed_index();
        let result = self.render_loop(surface, slides, style).await;

        // Success or failure, put the editor's slide back.
        if let Some(content) = slides.get(viewed) {
            surface.select(viewed, content.clone());
        }
        result
    }

    async fn render_loop(
        &self,
        surface: &mut SlideSurface,
        slides: &[SlideContent],
        style: &StyleSettings,
    ) -> Result<Vec<RenderedSlide>, PublishError> {
        let mut rendered = Vec::with_capacity(slides.len());
        for (index, content) in slides.iter().enumerate() {
            surface.select(index, content.clone());
            tokio::time::sleep(self.settle).await;

            let staged = surface
                .staged()
                .ok_or_else(|| PublishError::Internal("Surface lost its staged slide".into()))?;
            let image = self
                .renderer
                .render_slide(&staged.content, style)
                .await
                .map_err(|source| PublishError::SlideRender { index, source })?;

            tracing::debug!(slide = index + 1, bytes = image.bytes.len(), "Rendered slide");
            rendered.push(RenderedSlide { index, image });
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use vitrine_render::{CaptureEngine, RenderError, StyledNode};

    /// Succeeds with a small PNG except on the scripted call number.
    struct ScriptedEngine {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl ScriptedEngine {
        fn reliable() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(call),
            }
        }
    }

    #[async_trait]
    impl CaptureEngine for ScriptedEngine {
        async fn rasterize(
            &self,
            _root: &StyledNode,
            _pixel_ratio: f64,
        ) -> Result<Vec<u8>, RenderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(call) == self.fail_on {
                return Err(RenderError::Capture("scripted failure".to_string()));
            }
            let mut buf = Vec::new();
            image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]))
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .unwrap();
            Ok(buf)
        }
    }

    fn orchestrator(engine: ScriptedEngine) -> CarouselOrchestrator {
        let renderer = Arc::new(SlideRenderer::new(None, Arc::new(engine)));
        CarouselOrchestrator::new(renderer).with_settle_delay(Duration::ZERO)
    }

    fn slides(count: usize) -> Vec<SlideContent> {
        (1..=count)
            .map(|n| SlideContent {
                title: Some(format!("Slide {n}")),
                ..SlideContent::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn renders_every_slide_in_order() {
        let orchestrator = orchestrator(ScriptedEngine::reliable());
        let slides = slides(3);
        let mut surface = SlideSurface::new();

        let rendered = orchestrator
            .render_all(&mut surface, &slides, &StyleSettings::default())
            .await
            .unwrap();

        let indexes: Vec<usize> = rendered.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn failure_aborts_with_the_failing_index() {
        let orchestrator = orchestrator(ScriptedEngine::failing_on(1));
        let slides = slides(3);
        let mut surface = SlideSurface::new();

        let result = orchestrator
            .render_all(&mut surface, &slides, &StyleSettings::default())
            .await;
        assert_matches!(result, Err(PublishError::SlideRender { index: 1, .. }));
    }

    #[tokio::test]
    async fn viewed_slide_is_restored_after_success() {
        let orchestrator = orchestrator(ScriptedEngine::reliable());
        let slides = slides(3);
        let mut surface = SlideSurface::new();
        surface.view(2, slides[2].clone());

        orchestrator
            .render_all(&mut surface, &slides, &StyleSettings::default())
            .await
            .unwrap();

        let staged = surface.staged().unwrap();
        assert_eq!(staged.index, 2);
        assert_eq!(staged.content.title.as_deref(), Some("Slide 3"));
    }

    #[tokio::test]
    async fn viewed_slide_is_restored_after_failure() {
        let orchestrator = orchestrator(ScriptedEngine::failing_on(0));
        let slides = slides(2);
        let mut surface = SlideSurface::new();
        surface.view(1, slides[1].clone());

        let result = orchestrator
            .render_all(&mut surface, &slides, &StyleSettings::default())
            .await;
        assert!(result.is_err());
        assert_eq!(surface.staged().unwrap().index, 1);
    }
}
