//! Single-slot staging surface for slide rendering.

use vitrine_core::composition::SlideContent;

/// The slide currently materialized in the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedSlide {
    /// 0-based index in the post's slide list.
    pub index: usize,
    pub content: SlideContent,
}

/// The shared rendering surface: one staged slide at a time, plus the
/// index the editor is viewing.
///
/// The publish loop takes the surface `&mut`, so "switch slide" and
/// "capture" can never interleave. There is deliberately no pool;
/// staging a slide evicts the previous one.
#[derive(Debug, Default)]
pub struct SlideSurface {
    slot: Option<StagedSlide>,
    viewed: usize,
}

impl SlideSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor navigation: stage the slide and remember it as viewed.
    pub fn view(&mut self, index: usize, content: SlideContent) {
        self.viewed = index;
        self.select(index, content);
    }

    /// Stage a slide for rendering without moving the viewed index.
    pub fn select(&mut self, index: usize, content: SlideContent) {
        self.slot = Some(StagedSlide { index, content });
    }

    /// The currently staged slide.
    pub fn staged(&self) -> Option<&StagedSlide> {
        self.slot.as_ref()
    }

    /// Index the editor was last viewing.
    pub fn viewed_index(&self) -> usize {
        self.viewed
    }
}
