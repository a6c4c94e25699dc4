//! Fallback capture renderer.
//!
//! When the snapshot tier fails, the staged slide is rasterized
//! in-process: the styled tree is cloned with every node's resolved
//! styles flattened to literal inline declarations, scanned for color
//! functions the engine cannot parse, then handed to a pluggable
//! [`CaptureEngine`] at double pixel density. Output stays at capture
//! resolution, with no downsampling.

use std::io::Cursor;

use async_trait::async_trait;
use image::{Pixel, Rgba, RgbaImage};
use vitrine_core::color::Rgb;
use vitrine_core::style_repair::{self, StyleMap};

use crate::error::RenderError;
use crate::output::{decode_output, RenderedImage};
use crate::OUTPUT_SIZE;

/// Pixel density multiplier for fallback captures.
pub const CAPTURE_PIXEL_RATIO: f64 = 2.0;

// ---------------------------------------------------------------------------
// Styled tree
// ---------------------------------------------------------------------------

/// One node of the live styled tree: tag, resolved style map, optional
/// text run, children.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledNode {
    pub tag: String,
    pub styles: StyleMap,
    pub text: Option<String>,
    pub children: Vec<StyledNode>,
}

impl StyledNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            styles: StyleMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_styles(mut self, styles: StyleMap) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: StyledNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Clone the tree, flattening every node's resolved styles into
/// inline declarations: bulk copy, then the protected-property
/// re-apply. The capture engine only ever sees the clone.
pub fn clone_with_inline_styles(node: &StyledNode) -> StyledNode {
    StyledNode {
        tag: node.tag.clone(),
        styles: style_repair::flatten_styles(&node.styles),
        text: node.text.clone(),
        children: node.children.iter().map(clone_with_inline_styles).collect(),
    }
}

/// Depth-first scan for the first declaration whose value uses a color
/// function the engine cannot parse.
pub fn find_unsupported_color(node: &StyledNode) -> Option<(String, String)> {
    if let Some((property, value)) = style_repair::find_unsupported_color(&node.styles) {
        return Some((property.to_string(), value.to_string()));
    }
    node.children.iter().find_map(find_unsupported_color)
}

// ---------------------------------------------------------------------------
// Capture engine
// ---------------------------------------------------------------------------

/// Rasterizes a flattened styled tree. Implementations are best-effort
/// by contract; an empty result is a valid outcome and surfaces to
/// callers as "could not generate".
#[async_trait]
pub trait CaptureEngine: Send + Sync {
    /// Produce encoded image bytes for the tree at `pixel_ratio` times
    /// the canvas resolution.
    async fn rasterize(&self, root: &StyledNode, pixel_ratio: f64)
        -> Result<Vec<u8>, RenderError>;
}

/// Run the full fallback path for one staged slide: flatten, scan for
/// unsupported colors, rasterize, validate the output.
pub async fn capture_slide(
    engine: &dyn CaptureEngine,
    tree: &StyledNode,
) -> Result<RenderedImage, RenderError> {
    let clone = clone_with_inline_styles(tree);
    if let Some((property, value)) = find_unsupported_color(&clone) {
        return Err(RenderError::UnsupportedColorSpace { property, value });
    }
    let bytes = engine.rasterize(&clone, CAPTURE_PIXEL_RATIO).await?;
    decode_output(bytes)
}

// ---------------------------------------------------------------------------
// Built-in block raster engine
// ---------------------------------------------------------------------------

/// Built-in engine painting backgrounds, decorative boxes and text
/// runs as solid blocks. No font shaping, no remote assets; its job is
/// a recognizable stand-in image when the snapshot service is down.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockRasterEngine;

#[async_trait]
impl CaptureEngine for BlockRasterEngine {
    async fn rasterize(
        &self,
        root: &StyledNode,
        pixel_ratio: f64,
    ) -> Result<Vec<u8>, RenderError> {
        let size = (f64::from(OUTPUT_SIZE) * pixel_ratio).round() as u32;
        if size == 0 {
            return Ok(Vec::new());
        }

        let background = root
            .styles
            .get("background-color")
            .and_then(|value| parse_css_color(value))
            .unwrap_or(Rgba([255, 255, 255, 255]));
        let mut canvas = RgbaImage::from_pixel(size, size, background);

        let full = Region {
            x: 0.0,
            y: 0.0,
            width: f64::from(OUTPUT_SIZE),
            height: f64::from(OUTPUT_SIZE),
        };
        for child in &root.children {
            paint_node(child, &mut canvas, pixel_ratio, full);
        }

        let mut buf = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| RenderError::Capture(format!("PNG encoding failed: {e}")))?;
        Ok(buf)
    }
}

/// A box in CSS pixels (pre-scaling).
#[derive(Debug, Clone, Copy)]
struct Region {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn paint_node(node: &StyledNode, canvas: &mut RgbaImage, scale: f64, parent: Region) {
    let region = own_region(node).unwrap_or(parent);
    if region.width <= 0.0 || region.height <= 0.0 {
        return;
    }
    let opacity = node
        .styles
        .get("opacity")
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(1.0)
        .clamp(0.0, 1.0);

    if let Some(color) = node
        .styles
        .get("background-color")
        .or_else(|| node.styles.get("background"))
        .or_else(|| node.styles.get("background-image"))
        .and_then(|value| parse_css_color(value))
    {
        fill_region(canvas, scale, region, with_opacity(color, opacity));
    }

    if let Some(border) = node.styles.get("border") {
        if let Some(color) = parse_css_color(border) {
            let width = first_px_number(border).unwrap_or(1.0);
            stroke_region(canvas, scale, region, width, with_opacity(color, opacity));
        }
    }

    if let Some(text) = node.text.as_deref().filter(|t| !t.trim().is_empty()) {
        paint_text_block(node, text, canvas, scale, region, opacity);
    }

    if is_column_flex(node) {
        paint_stacked_children(node, canvas, scale, region);
    } else {
        for child in &node.children {
            paint_node(child, canvas, scale, region);
        }
    }
}

/// Stack the children of a flex column, honoring the protected layout
/// properties: `padding` insets the region, `align-items: center`
/// centers each block, `justify-content: center` centers the stack.
fn paint_stacked_children(node: &StyledNode, canvas: &mut RgbaImage, scale: f64, region: Region) {
    let padding = node
        .styles
        .get("padding")
        .and_then(|v| first_px_number(v))
        .unwrap_or(0.0);
    let inner = Region {
        x: region.x + padding,
        y: region.y + padding,
        width: (region.width - 2.0 * padding).max(0.0),
        height: (region.height - 2.0 * padding).max(0.0),
    };

    let heights: Vec<f64> = node.children.iter().map(block_height).collect();
    let total: f64 = heights.iter().sum();

    let center_y = node.styles.get("justify-content").map(String::as_str) == Some("center");
    let center_x = node.styles.get("align-items").map(String::as_str) == Some("center");

    let mut y = if center_y {
        inner.y + ((inner.height - total) / 2.0).max(0.0)
    } else {
        inner.y
    };

    for (child, height) in node.children.iter().zip(heights) {
        let width = block_width(child, inner.width);
        let x = if center_x {
            inner.x + (inner.width - width) / 2.0
        } else {
            inner.x
        };
        let slot = Region {
            x,
            y,
            width,
            height,
        };
        paint_node(child, canvas, scale, slot);
        y += height;
    }
}

fn paint_text_block(
    node: &StyledNode,
    text: &str,
    canvas: &mut RgbaImage,
    scale: f64,
    region: Region,
    opacity: f64,
) {
    let font_size = node
        .styles
        .get("font-size")
        .and_then(|v| first_px_number(v))
        .unwrap_or(24.0);
    let color = node
        .styles
        .get("color")
        .and_then(|value| parse_css_color(value))
        .unwrap_or(Rgba([17, 17, 17, 255]));

    let width = estimated_text_width(text, font_size).min(region.width);
    let height = (font_size * 1.1).min(region.height);
    let block = Region {
        x: region.x + (region.width - width) / 2.0,
        y: region.y + (region.height - height) / 2.0,
        width,
        height,
    };
    fill_region(canvas, scale, block, with_opacity(color, opacity * 0.9));
}

fn own_region(node: &StyledNode) -> Option<Region> {
    let get = |key: &str| node.styles.get(key).and_then(|v| first_px_number(v));
    Some(Region {
        x: get("left")?,
        y: get("top")?,
        width: get("width")?,
        height: get("height")?,
    })
}

fn is_column_flex(node: &StyledNode) -> bool {
    node.styles.get("display").map(String::as_str) == Some("flex")
        && node.styles.get("flex-direction").map(String::as_str) == Some("column")
}

fn block_height(node: &StyledNode) -> f64 {
    if let Some(height) = node.styles.get("height").and_then(|v| first_px_number(v)) {
        return height;
    }
    let font_size = node
        .styles
        .get("font-size")
        .and_then(|v| first_px_number(v))
        .unwrap_or(24.0);
    let margin = node
        .styles
        .get("margin-bottom")
        .and_then(|v| first_px_number(v))
        .unwrap_or(0.0);
    font_size * 1.4 + margin
}

fn block_width(node: &StyledNode, available: f64) -> f64 {
    if let Some(width) = node.styles.get("width").and_then(|v| first_px_number(v)) {
        return width.min(available);
    }
    match node.text.as_deref() {
        Some(text) => {
            let font_size = node
                .styles
                .get("font-size")
                .and_then(|v| first_px_number(v))
                .unwrap_or(24.0);
            estimated_text_width(text, font_size).min(available)
        }
        None => available,
    }
}

fn estimated_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.55
}

// ---------------------------------------------------------------------------
// CSS value parsing and pixel painting
// ---------------------------------------------------------------------------

/// Extract a paintable color from a CSS value: a `#rrggbb` literal
/// anywhere in the value (covers gradients) or an `rgb()`/`rgba()`
/// function. Returns `None` for `transparent` and anything else.
fn parse_css_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") || value.eq_ignore_ascii_case("none") {
        return None;
    }
    if let Some(position) = value.find('#') {
        let hex: String = value[position..].chars().take(7).collect();
        if let Ok(rgb) = hex.parse::<Rgb>() {
            return Some(Rgba([rgb.r, rgb.g, rgb.b, 255]));
        }
    }
    if let Some(start) = value.find("rgba(").or_else(|| value.find("rgb(")) {
        let open = value[start..].find('(')? + start;
        let close = value[open..].find(')')? + open;
        let parts: Vec<&str> = value[open + 1..close].split(',').map(str::trim).collect();
        if parts.len() >= 3 {
            let r = parts[0].parse::<f64>().ok()?;
            let g = parts[1].parse::<f64>().ok()?;
            let b = parts[2].parse::<f64>().ok()?;
            let a = match parts.get(3) {
                Some(alpha) => (alpha.parse::<f64>().ok()?.clamp(0.0, 1.0) * 255.0) as u8,
                None => 255,
            };
            return Some(Rgba([r as u8, g as u8, b as u8, a]));
        }
    }
    None
}

fn first_px_number(value: &str) -> Option<f64> {
    let mut number = String::new();
    for ch in value.chars() {
        if ch.is_ascii_digit() || ch == '.' || (ch == '-' && number.is_empty()) {
            number.push(ch);
        } else if !number.is_empty() {
            break;
        }
    }
    number.parse().ok()
}

fn with_opacity(color: Rgba<u8>, opacity: f64) -> Rgba<u8> {
    let alpha = (f64::from(color.0[3]) * opacity.clamp(0.0, 1.0)) as u8;
    Rgba([color.0[0], color.0[1], color.0[2], alpha])
}

fn fill_region(canvas: &mut RgbaImage, scale: f64, region: Region, color: Rgba<u8>) {
    if color.0[3] == 0 {
        return;
    }
    let (x0, y0, x1, y1) = scaled_bounds(canvas, scale, region);
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.get_pixel_mut(x, y).blend(&color);
        }
    }
}

fn stroke_region(canvas: &mut RgbaImage, scale: f64, region: Region, width: f64, color: Rgba<u8>) {
    let thickness = (width * scale).round().max(1.0);
    let (x0, y0, x1, y1) = scaled_bounds(canvas, scale, region);
    for y in y0..y1 {
        for x in x0..x1 {
            let on_edge = f64::from(x - x0) < thickness
                || f64::from(y - y0) < thickness
                || f64::from(x1 - 1 - x) < thickness
                || f64::from(y1 - 1 - y) < thickness;
            if on_edge {
                canvas.get_pixel_mut(x, y).blend(&color);
            }
        }
    }
}

fn scaled_bounds(canvas: &RgbaImage, scale: f64, region: Region) -> (u32, u32, u32, u32) {
    let clamp = |v: f64, max: u32| (v.max(0.0).round() as u32).min(max);
    let x0 = clamp(region.x * scale, canvas.width());
    let y0 = clamp(region.y * scale, canvas.height());
    let x1 = clamp((region.x + region.width) * scale, canvas.width());
    let y1 = clamp((region.y + region.height) * scale, canvas.height());
    (x0, y0, x1, y1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn flex_column() -> StyledNode {
        StyledNode::new("div")
            .with_style("background-color", "#f5efe6")
            .with_style("width", "1080px")
            .with_style("height", "1080px")
            .with_style("left", "0px")
            .with_style("top", "0px")
            .with_child(
                StyledNode::new("div")
                    .with_style("display", "flex")
                    .with_style("flex-direction", "column")
                    .with_style("align-items", "center")
                    .with_style("justify-content", "center")
                    .with_style("padding", "96px")
                    .with_child(
                        StyledNode::new("h1")
                            .with_style("font-size", "64px")
                            .with_style("color", "#111111")
                            .with_text("Mostra de Gravura"),
                    ),
            )
    }

    #[test]
    fn cloning_flattens_styles_and_keeps_protected_properties() {
        let mut tree = flex_column();
        tree.children[0]
            .styles
            .insert("--accent".to_string(), "#e4572e".to_string());

        let clone = clone_with_inline_styles(&tree);
        let column = &clone.children[0];
        assert_eq!(column.styles["display"], "flex");
        assert_eq!(column.styles["align-items"], "center");
        assert_eq!(column.styles["padding"], "96px");
        assert!(!column.styles.contains_key("--accent"));
    }

    #[test]
    fn unsupported_color_is_found_anywhere_in_the_tree() {
        let mut tree = flex_column();
        tree.children[0].children[0]
            .styles
            .insert("color".to_string(), "oklch(0.2 0.05 250)".to_string());

        let hit = find_unsupported_color(&tree).unwrap();
        assert_eq!(hit.0, "color");
    }

    #[tokio::test]
    async fn capture_aborts_with_unsupported_color_space() {
        let mut tree = flex_column();
        tree.styles
            .insert("background-color".to_string(), "oklch(0.98 0.01 90)".to_string());

        let result = capture_slide(&BlockRasterEngine, &tree).await;
        assert_matches!(
            result,
            Err(RenderError::UnsupportedColorSpace { ref property, .. })
                if property == "background-color"
        );
    }

    #[tokio::test]
    async fn block_engine_renders_at_double_resolution() {
        let image = capture_slide(&BlockRasterEngine, &flex_column())
            .await
            .unwrap();
        assert_eq!(image.width, 2160);
        assert_eq!(image.height, 2160);
    }

    #[tokio::test]
    async fn block_engine_paints_background_and_text_blocks() {
        let image = capture_slide(&BlockRasterEngine, &flex_column())
            .await
            .unwrap();
        let decoded = image::load_from_memory(&image.bytes).unwrap().to_rgba8();

        // Canvas corner carries the slide background.
        assert_eq!(decoded.get_pixel(4, 4), &Rgba([245, 239, 230, 255]));
        // A centered dark text block covers the middle.
        let center = decoded.get_pixel(1080, 1080);
        assert!(center.0[0] < 60, "expected dark text block, got {center:?}");
    }

    #[tokio::test]
    async fn empty_engine_output_is_reported_as_empty() {
        struct NullEngine;

        #[async_trait]
        impl CaptureEngine for NullEngine {
            async fn rasterize(
                &self,
                _root: &StyledNode,
                _pixel_ratio: f64,
            ) -> Result<Vec<u8>, RenderError> {
                Ok(Vec::new())
            }
        }

        let result = capture_slide(&NullEngine, &flex_column()).await;
        assert_matches!(result, Err(RenderError::EmptyOutput));
    }

    #[test]
    fn css_color_parsing_covers_hex_functions_and_gradients() {
        assert_eq!(
            parse_css_color("#e4572e"),
            Some(Rgba([228, 87, 46, 255]))
        );
        assert_eq!(
            parse_css_color("rgba(10, 20, 30, 0.5)"),
            Some(Rgba([10, 20, 30, 127]))
        );
        assert_eq!(
            parse_css_color("repeating-linear-gradient(-45deg, #e4572e, transparent 26px)"),
            Some(Rgba([228, 87, 46, 255]))
        );
        assert_eq!(parse_css_color("transparent"), None);
    }
}
