//! Visual document builder.
//!
//! Builds the 1080×1080 slide in two materializations that share the
//! same layout math: a self-contained markup document for the snapshot
//! service, and a styled tree for the in-process capture fallback. All
//! geometry is resolved to absolute pixel boxes up front, so neither
//! consumer needs a layout engine.

use maud::{html, Markup, DOCTYPE};
use vitrine_core::anchor::{resolve, ElementGeometry, ElementKind};
use vitrine_core::color::Rgb;
use vitrine_core::composition::{
    DecorativeEffect, DecorativeElement, ElementLayer, LogoVariant, SlideContent, StyleSettings,
};
use vitrine_core::style_repair::StyleMap;

use crate::capture::StyledNode;
use crate::OUTPUT_SIZE;

const BASE_CSS: &str = "* { margin: 0; padding: 0; box-sizing: border-box; } \
    body { width: 1080px; height: 1080px; overflow: hidden; \
    font-family: 'Helvetica Neue', Arial, sans-serif; }";

// ---------------------------------------------------------------------------
// Markup document (snapshot tier)
// ---------------------------------------------------------------------------

/// Build the self-contained markup document for one slide.
pub fn build_document(content: &SlideContent, style: &StyleSettings) -> String {
    let layout = Layout::resolve(content, style);
    let markup: Markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                style { (BASE_CSS) }
            }
            body {
                div style=(canvas_style(style)) {
                    @if style.decorative_effect != DecorativeEffect::None {
                        div style=(effect_style(style)) {}
                    }
                    @if let Some(geometry) = &layout.element {
                        @match &content.decorative_element {
                            DecorativeElement::Custom { url } => {
                                img src=(url) style=(custom_element_style(geometry, content));
                            }
                            element => {
                                div style=(preset_element_style(element, geometry, content, style)) {}
                            }
                        }
                    }
                    div style=(content_style()) {
                        @if let Some(title) = non_blank(&content.title) {
                            h1 style=(title_style(style)) { (title) }
                        }
                        @if let Some(subtitle) = non_blank(&content.subtitle) {
                            h2 style=(subtitle_style(style)) { (subtitle) }
                        }
                        @if let Some(description) = non_blank(&content.description) {
                            p style=(description_style(style)) { (description) }
                        }
                        @if let Some(period) = non_blank(&content.period_text) {
                            p style=(period_style(style)) { (period) }
                        }
                        @if let Some(cta) = non_blank(&content.cta_text) {
                            p style=(cta_style(style)) { (cta) }
                        }
                        @if let Some(link) = non_blank(&content.cta_link) {
                            p style=(cta_link_style(style)) { (link) }
                        }
                    }
                    div style=(logo_style(&layout.logo, style)) { "vitrine" }
                }
            }
        }
    };
    markup.into_string()
}

// ---------------------------------------------------------------------------
// Styled tree (capture tier)
// ---------------------------------------------------------------------------

/// Build the styled tree for one slide: the same visual document, as
/// the capture path sees it. Style strings are split into per-property
/// maps standing in for resolved computed styles.
pub fn build_styled_tree(content: &SlideContent, style: &StyleSettings) -> StyledNode {
    let layout = Layout::resolve(content, style);
    let mut root = StyledNode::new("div").with_styles(parse_declarations(&canvas_style(style)));

    if style.decorative_effect != DecorativeEffect::None {
        root = root.with_child(
            StyledNode::new("div").with_styles(parse_declarations(&effect_style(style))),
        );
    }

    if let Some(geometry) = &layout.element {
        let element_node = match &content.decorative_element {
            DecorativeElement::Custom { .. } => {
                // The capture engine paints a placeholder block for
                // remote assets instead of fetching them.
                let mut styles = parse_declarations(&custom_element_style(geometry, content));
                styles.insert(
                    "background-color".to_string(),
                    style.accent_color.to_rgba(0.35),
                );
                StyledNode::new("img").with_styles(styles)
            }
            element => StyledNode::new("div").with_styles(parse_declarations(
                &preset_element_style(element, geometry, content, style),
            )),
        };
        root = root.with_child(element_node);
    }

    let mut column = StyledNode::new("div").with_styles(parse_declarations(&content_style()));
    for (tag, text, text_css) in [
        ("h1", &content.title, title_style(style)),
        ("h2", &content.subtitle, subtitle_style(style)),
        ("p", &content.description, description_style(style)),
        ("p", &content.period_text, period_style(style)),
        ("p", &content.cta_text, cta_style(style)),
        ("p", &content.cta_link, cta_link_style(style)),
    ] {
        if let Some(text) = non_blank(text) {
            column = column.with_child(
                StyledNode::new(tag)
                    .with_styles(parse_declarations(&text_css))
                    .with_text(text),
            );
        }
    }
    root = root.with_child(column);

    root.with_child(
        StyledNode::new("div")
            .with_styles(parse_declarations(&logo_style(&layout.logo, style)))
            .with_text("vitrine"),
    )
}

/// Split a `prop: value; prop: value` style string into a map.
fn parse_declarations(css: &str) -> StyleMap {
    css.split(';')
        .filter_map(|declaration| {
            let (key, value) = declaration.split_once(':')?;
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                None
            } else {
                Some((key.to_string(), value.to_string()))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Shared layout and style strings
// ---------------------------------------------------------------------------

struct Layout {
    /// Geometry of the decorative element, absent when the slide has
    /// none.
    element: Option<ElementGeometry>,
    logo: ElementGeometry,
}

impl Layout {
    fn resolve(content: &SlideContent, style: &StyleSettings) -> Self {
        let element = match &content.decorative_element {
            DecorativeElement::None => None,
            _ => Some(resolve(
                content.element_position,
                &content.element_offsets,
                ElementKind::Decoration,
                content.element_size,
            )),
        };
        let logo = resolve(
            style.logo_position,
            &style.logo_offsets,
            ElementKind::Logo,
            style.logo_size,
        );
        Self { element, logo }
    }
}

fn canvas_style(style: &StyleSettings) -> String {
    format!(
        "position:relative;width:{size}px;height:{size}px;overflow:hidden;background-color:{bg};",
        size = OUTPUT_SIZE,
        bg = style.background_color.to_hex()
    )
}

fn effect_style(style: &StyleSettings) -> String {
    let accent = &style.accent_color;
    let background = match style.decorative_effect {
        DecorativeEffect::Gradient => format!(
            "background:linear-gradient(160deg, {} 0%, transparent 60%);",
            accent.to_rgba(0.16)
        ),
        DecorativeEffect::OrganicBlobs => format!(
            "background:radial-gradient(circle at 22% 24%, {} 0 190px, transparent 190px), \
             radial-gradient(circle at 78% 72%, {} 0 250px, transparent 250px);",
            accent.to_rgba(0.18),
            accent.to_rgba(0.11)
        ),
        DecorativeEffect::DotGrid => format!(
            "background-image:radial-gradient({} 2px, transparent 2px);background-size:36px 36px;",
            accent.to_rgba(0.25)
        ),
        DecorativeEffect::None => String::new(),
    };
    format!(
        "position:absolute;left:0;top:0;width:{size}px;height:{size}px;z-index:0;{background}",
        size = OUTPUT_SIZE
    )
}

fn geometry_style(geometry: &ElementGeometry) -> String {
    format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;",
        geometry.x, geometry.y, geometry.width, geometry.height
    )
}

fn element_layer_z(layer: ElementLayer) -> u8 {
    match layer {
        ElementLayer::Background => 0,
        ElementLayer::Foreground => 2,
    }
}

fn element_opacity_css(opacity: i16) -> String {
    format!("{}", f64::from(opacity) / 100.0)
}

fn custom_element_style(geometry: &ElementGeometry, content: &SlideContent) -> String {
    format!(
        "{}object-fit:contain;opacity:{};z-index:{};",
        geometry_style(geometry),
        element_opacity_css(content.element_opacity),
        element_layer_z(content.element_layer)
    )
}

fn preset_element_style(
    element: &DecorativeElement,
    geometry: &ElementGeometry,
    content: &SlideContent,
    style: &StyleSettings,
) -> String {
    let accent = &style.accent_color;
    let visual = match element {
        DecorativeElement::Waves => format!(
            "background:repeating-linear-gradient(-45deg, {accent}, {accent} 12px, \
             transparent 12px, transparent 26px);",
            accent = accent.to_hex()
        ),
        DecorativeElement::Burst => format!(
            "background:conic-gradient({accent} 0deg 12deg, transparent 12deg 30deg);\
             border-radius:50%;",
            accent = accent.to_hex()
        ),
        DecorativeElement::Blob => format!(
            "background-color:{};border-radius:42% 58% 61% 39% / 45% 37% 63% 55%;",
            accent.to_hex()
        ),
        DecorativeElement::Frame => format!("border:6px solid {};", accent.to_hex()),
        DecorativeElement::None | DecorativeElement::Custom { .. } => String::new(),
    };
    format!(
        "{}{}opacity:{};z-index:{};",
        geometry_style(geometry),
        visual,
        element_opacity_css(content.element_opacity),
        element_layer_z(content.element_layer)
    )
}

fn content_style() -> String {
    format!(
        "position:absolute;left:0;top:0;width:{size}px;height:{size}px;display:flex;\
         flex-direction:column;align-items:center;justify-content:center;padding:96px;\
         text-align:center;z-index:1;",
        size = OUTPUT_SIZE
    )
}

fn title_style(style: &StyleSettings) -> String {
    format!(
        "font-size:64px;font-weight:700;line-height:1.15;color:{};margin-bottom:24px;",
        style.title_color.to_hex()
    )
}

fn subtitle_style(style: &StyleSettings) -> String {
    format!(
        "font-size:36px;font-weight:500;color:{};margin-bottom:24px;",
        style.subtitle_color.to_hex()
    )
}

fn description_style(style: &StyleSettings) -> String {
    format!(
        "font-size:28px;line-height:1.5;color:{};margin-bottom:28px;",
        style.description_color.to_hex()
    )
}

fn period_style(style: &StyleSettings) -> String {
    format!(
        "font-size:24px;font-weight:600;color:{};margin-bottom:20px;",
        style.accent_color.to_hex()
    )
}

fn cta_style(style: &StyleSettings) -> String {
    format!(
        "display:inline-block;font-size:28px;font-weight:600;color:{};\
         background-color:{};padding:18px 36px;border-radius:999px;margin-bottom:16px;",
        style.background_color.to_hex(),
        style.accent_color.to_hex()
    )
}

fn cta_link_style(style: &StyleSettings) -> String {
    format!("font-size:22px;color:{};", style.description_color.to_hex())
}

fn logo_style(geometry: &ElementGeometry, style: &StyleSettings) -> String {
    let variant = match style.logo_variant {
        LogoVariant::Dark => "color:#111111;".to_string(),
        LogoVariant::Light => "color:#ffffff;".to_string(),
        LogoVariant::Color => format!("color:{};", style.accent_color.to_hex()),
        LogoVariant::Gradient => format!(
            "background:linear-gradient(90deg, {}, {});-webkit-background-clip:text;\
             color:transparent;",
            style.accent_color.to_hex(),
            style.title_color.to_hex()
        ),
    };
    format!(
        "{}display:flex;align-items:center;justify-content:center;font-weight:700;\
         font-size:{}px;letter-spacing:0.08em;z-index:3;{}",
        geometry_style(geometry),
        (geometry.height * 0.38).round(),
        variant
    )
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
