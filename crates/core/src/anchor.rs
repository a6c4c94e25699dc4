//! Anchor/layout resolution for logos and decorative overlays.
//!
//! Maps a symbolic position (nine grid anchors or `custom` with explicit
//! offsets) plus a size class to absolute box geometry on the fixed
//! 1080×1080 slide canvas. Resolution is a pure function of its inputs:
//! the same anchor and size class always produce the same geometry, and
//! no combination of inputs is ever rejected.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Slides are square; both canvas axes are this many pixels.
pub const CANVAS_SIZE: f64 = 1080.0;

/// Distance between an edge-aligned element and the canvas edge.
pub const EDGE_MARGIN: f64 = 48.0;

/// Regex matching an offset value: a number with an optional `%` or `px`
/// suffix. Anything else is treated as unset, like an ignored CSS
/// declaration.
static OFFSET_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^(-?\d+(?:\.\d+)?)\s*(%|px)?$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Anchors and size classes
// ---------------------------------------------------------------------------

/// A symbolic position on the slide canvas.
///
/// The nine grid anchors fully determine a box together with a size
/// class; [`Anchor::Custom`] defers to the element's
/// [`CustomOffsets`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Custom,
}

impl Anchor {
    /// Database/text form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopCenter => "top-center",
            Anchor::TopRight => "top-right",
            Anchor::CenterLeft => "center-left",
            Anchor::Center => "center",
            Anchor::CenterRight => "center-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomCenter => "bottom-center",
            Anchor::BottomRight => "bottom-right",
            Anchor::Custom => "custom",
        }
    }

    /// Parse the text form; `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "top-left" => Anchor::TopLeft,
            "top-center" => Anchor::TopCenter,
            "top-right" => Anchor::TopRight,
            "center-left" => Anchor::CenterLeft,
            "center" => Anchor::Center,
            "center-right" => Anchor::CenterRight,
            "bottom-left" => Anchor::BottomLeft,
            "bottom-center" => Anchor::BottomCenter,
            "bottom-right" => Anchor::BottomRight,
            "custom" => Anchor::Custom,
            _ => return None,
        })
    }
}

/// Element size class. Concrete pixel sizes depend on the element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "small" => SizeClass::Small,
            "medium" => SizeClass::Medium,
            "large" => SizeClass::Large,
            _ => return None,
        })
    }
}

/// What is being placed. Logos and decorations use different pixel
/// tables for the same size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Logo,
    Decoration,
}

impl ElementKind {
    /// Box edge length in pixels for a size class of this kind.
    ///
    /// Boxes are square; non-square assets keep their aspect ratio
    /// inside the box at render time.
    pub fn size_px(self, size: SizeClass) -> f64 {
        match (self, size) {
            (ElementKind::Logo, SizeClass::Small) => 96.0,
            (ElementKind::Logo, SizeClass::Medium) => 144.0,
            (ElementKind::Logo, SizeClass::Large) => 192.0,
            (ElementKind::Decoration, SizeClass::Small) => 160.0,
            (ElementKind::Decoration, SizeClass::Medium) => 240.0,
            (ElementKind::Decoration, SizeClass::Large) => 320.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Custom offsets
// ---------------------------------------------------------------------------

/// Up to four independent offset strings for `Anchor::Custom`.
///
/// Each value is either a percentage of the canvas (`"12%"`) or an
/// absolute pixel count (`"40px"` or bare `"40"`). Any subset may be
/// unset. Unparsable values degrade to unset rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOffsets {
    pub top: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
}

impl CustomOffsets {
    /// True when no offset is set at all.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.left.is_none() && self.right.is_none() && self.bottom.is_none()
    }
}

/// Parse one offset string into canvas pixels.
///
/// Percentages resolve against [`CANVAS_SIZE`]. Returns `None` for
/// unparsable input, which callers treat exactly like an unset offset.
fn parse_offset(raw: &str) -> Option<f64> {
    let caps = OFFSET_RE.captures(raw.trim())?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    match caps.get(2).map(|m| m.as_str()) {
        Some("%") => Some(value / 100.0 * CANVAS_SIZE),
        _ => Some(value),
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Absolute box geometry on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Resolve an anchor to absolute geometry.
///
/// * The nine grid anchors ignore `offsets` entirely.
/// * `Anchor::Custom` with every offset unset falls back to full-canvas
///   centering.
/// * Partial custom offsets mirror CSS absolute positioning: one side
///   set pins that edge with the size-class dimension; both sides of an
///   axis set stretch the box between them (the size class no longer
///   applies to that axis); neither set centers the axis.
pub fn resolve(
    anchor: Anchor,
    offsets: &CustomOffsets,
    kind: ElementKind,
    size: SizeClass,
) -> ElementGeometry {
    let dim = kind.size_px(size);

    match anchor {
        Anchor::Custom => resolve_custom(offsets, dim),
        grid => {
            let (x, y) = grid_origin(grid, dim);
            ElementGeometry {
                x,
                y,
                width: dim,
                height: dim,
            }
        }
    }
}

/// Box origin for the nine grid anchors.
fn grid_origin(anchor: Anchor, dim: f64) -> (f64, f64) {
    let near = EDGE_MARGIN;
    let far = CANVAS_SIZE - EDGE_MARGIN - dim;
    let mid = centered(dim);

    match anchor {
        Anchor::TopLeft => (near, near),
        Anchor::TopCenter => (mid, near),
        Anchor::TopRight => (far, near),
        Anchor::CenterLeft => (near, mid),
        Anchor::Center => (mid, mid),
        Anchor::CenterRight => (far, mid),
        Anchor::BottomLeft => (near, far),
        Anchor::BottomCenter => (mid, far),
        Anchor::BottomRight => (far, far),
        // Handled by the caller before reaching here.
        Anchor::Custom => (mid, mid),
    }
}

fn centered(dim: f64) -> f64 {
    (CANVAS_SIZE - dim) / 2.0
}

/// Resolve custom offsets one axis at a time.
fn resolve_custom(offsets: &CustomOffsets, dim: f64) -> ElementGeometry {
    let left = offsets.left.as_deref().and_then(parse_offset);
    let right = offsets.right.as_deref().and_then(parse_offset);
    let top = offsets.top.as_deref().and_then(parse_offset);
    let bottom = offsets.bottom.as_deref().and_then(parse_offset);

    let (x, width) = resolve_axis(left, right, dim);
    let (y, height) = resolve_axis(top, bottom, dim);

    ElementGeometry {
        x,
        y,
        width,
        height,
    }
}

/// One axis of custom resolution.
///
/// `near` is the offset from the low edge (left/top), `far` from the
/// high edge (right/bottom). Both set stretches between them; the used
/// length never goes below zero, matching CSS used values.
fn resolve_axis(near: Option<f64>, far: Option<f64>, dim: f64) -> (f64, f64) {
    match (near, far) {
        (Some(n), Some(f)) => {
            let length = (CANVAS_SIZE - f - n).max(0.0);
            (n, length)
        }
        (Some(n), None) => (n, dim),
        (None, Some(f)) => (CANVAS_SIZE - f - dim, dim),
        (None, None) => (centered(dim), dim),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_offsets() -> CustomOffsets {
        CustomOffsets::default()
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve(
            Anchor::TopRight,
            &no_offsets(),
            ElementKind::Logo,
            SizeClass::Medium,
        );
        let b = resolve(
            Anchor::TopRight,
            &no_offsets(),
            ElementKind::Logo,
            SizeClass::Medium,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn top_left_sits_at_edge_margin() {
        let g = resolve(
            Anchor::TopLeft,
            &no_offsets(),
            ElementKind::Logo,
            SizeClass::Small,
        );
        assert_eq!(g.x, EDGE_MARGIN);
        assert_eq!(g.y, EDGE_MARGIN);
        assert_eq!(g.width, 96.0);
        assert_eq!(g.height, 96.0);
    }

    #[test]
    fn bottom_right_respects_far_margin() {
        let g = resolve(
            Anchor::BottomRight,
            &no_offsets(),
            ElementKind::Logo,
            SizeClass::Large,
        );
        assert_eq!(g.x, CANVAS_SIZE - EDGE_MARGIN - 192.0);
        assert_eq!(g.y, CANVAS_SIZE - EDGE_MARGIN - 192.0);
    }

    #[test]
    fn center_is_symmetric() {
        let g = resolve(
            Anchor::Center,
            &no_offsets(),
            ElementKind::Decoration,
            SizeClass::Medium,
        );
        assert_eq!(g.x, (CANVAS_SIZE - 240.0) / 2.0);
        assert_eq!(g.x, g.y);
    }

    #[test]
    fn grid_anchors_ignore_offsets() {
        let offsets = CustomOffsets {
            top: Some("10px".into()),
            left: Some("99%".into()),
            ..Default::default()
        };
        let with = resolve(
            Anchor::TopCenter,
            &offsets,
            ElementKind::Logo,
            SizeClass::Small,
        );
        let without = resolve(
            Anchor::TopCenter,
            &no_offsets(),
            ElementKind::Logo,
            SizeClass::Small,
        );
        assert_eq!(with, without);
    }

    #[test]
    fn custom_with_no_offsets_centers_fully() {
        let custom = resolve(
            Anchor::Custom,
            &no_offsets(),
            ElementKind::Decoration,
            SizeClass::Large,
        );
        let center = resolve(
            Anchor::Center,
            &no_offsets(),
            ElementKind::Decoration,
            SizeClass::Large,
        );
        assert_eq!(custom, center);
    }

    #[test]
    fn custom_top_left_pins_both_edges() {
        let offsets = CustomOffsets {
            top: Some("100".into()),
            left: Some("60px".into()),
            ..Default::default()
        };
        let g = resolve(
            Anchor::Custom,
            &offsets,
            ElementKind::Decoration,
            SizeClass::Small,
        );
        assert_eq!(g.x, 60.0);
        assert_eq!(g.y, 100.0);
        assert_eq!(g.width, 160.0);
        assert_eq!(g.height, 160.0);
    }

    #[test]
    fn custom_right_only_pins_far_edge() {
        let offsets = CustomOffsets {
            right: Some("80px".into()),
            ..Default::default()
        };
        let g = resolve(
            Anchor::Custom,
            &offsets,
            ElementKind::Logo,
            SizeClass::Small,
        );
        assert_eq!(g.x, CANVAS_SIZE - 80.0 - 96.0);
        // Unset vertical axis stays centered.
        assert_eq!(g.y, (CANVAS_SIZE - 96.0) / 2.0);
    }

    #[test]
    fn custom_left_and_right_stretch_the_box() {
        let offsets = CustomOffsets {
            left: Some("100px".into()),
            right: Some("200px".into()),
            ..Default::default()
        };
        let g = resolve(
            Anchor::Custom,
            &offsets,
            ElementKind::Decoration,
            SizeClass::Medium,
        );
        assert_eq!(g.x, 100.0);
        assert_eq!(g.width, CANVAS_SIZE - 100.0 - 200.0);
        // Vertical axis keeps the size-class dimension.
        assert_eq!(g.height, 240.0);
    }

    #[test]
    fn overconstrained_stretch_clamps_at_zero_width() {
        let offsets = CustomOffsets {
            left: Some("900px".into()),
            right: Some("900px".into()),
            ..Default::default()
        };
        let g = resolve(
            Anchor::Custom,
            &offsets,
            ElementKind::Logo,
            SizeClass::Small,
        );
        assert_eq!(g.width, 0.0);
        assert_eq!(g.x, 900.0);
    }

    #[test]
    fn percentage_offsets_resolve_against_canvas() {
        let offsets = CustomOffsets {
            top: Some("25%".into()),
            ..Default::default()
        };
        let g = resolve(
            Anchor::Custom,
            &offsets,
            ElementKind::Logo,
            SizeClass::Small,
        );
        assert_eq!(g.y, 270.0);
    }

    #[test]
    fn unparsable_offset_behaves_as_unset() {
        let garbage = CustomOffsets {
            left: Some("a little to the left".into()),
            ..Default::default()
        };
        let g = resolve(
            Anchor::Custom,
            &garbage,
            ElementKind::Logo,
            SizeClass::Small,
        );
        let centered = resolve(
            Anchor::Custom,
            &no_offsets(),
            ElementKind::Logo,
            SizeClass::Small,
        );
        assert_eq!(g, centered);
    }

    #[test]
    fn offset_parser_accepts_px_percent_and_bare_numbers() {
        assert_eq!(parse_offset("40px"), Some(40.0));
        assert_eq!(parse_offset("40"), Some(40.0));
        assert_eq!(parse_offset("-12.5 px"), Some(-12.5));
        assert_eq!(parse_offset("50%"), Some(540.0));
        assert_eq!(parse_offset("2em"), None);
        assert_eq!(parse_offset(""), None);
    }

    #[test]
    fn anchor_text_round_trip() {
        for anchor in [
            Anchor::TopLeft,
            Anchor::TopCenter,
            Anchor::TopRight,
            Anchor::CenterLeft,
            Anchor::Center,
            Anchor::CenterRight,
            Anchor::BottomLeft,
            Anchor::BottomCenter,
            Anchor::BottomRight,
            Anchor::Custom,
        ] {
            assert_eq!(Anchor::parse(anchor.as_str()), Some(anchor));
        }
        assert_eq!(Anchor::parse("middle"), None);
    }
}
