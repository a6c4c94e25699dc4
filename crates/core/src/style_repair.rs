//! Declared-style preparation for the capture renderer.
//!
//! The capture path rasterizes a detached clone of the slide tree, and
//! the engine only reads literal inline declarations. Every node's
//! resolved styles are therefore flattened onto its clone in two
//! passes: a bulk copy of all declarations, then a re-apply of a small
//! allow-list of layout-critical properties. The bulk pass filters and
//! normalizes, which can drop or weaken the properties that centering
//! depends on; the second pass guarantees those keys end up present
//! and verbatim.

use std::collections::BTreeMap;

/// Inline style declarations, keyed by property name. A `BTreeMap`
/// keeps serialization order deterministic.
pub type StyleMap = BTreeMap<String, String>;

/// Properties re-applied verbatim after the bulk copy. Flex centering
/// and box padding survive only because of this pass.
pub const PROTECTED_PROPERTIES: &[&str] =
    &["display", "align-items", "justify-content", "padding"];

/// Color-function prefixes the capture engine cannot parse.
pub const UNSUPPORTED_COLOR_FUNCTIONS: &[&str] =
    &["oklch(", "oklab(", "lab(", "lch(", "color("];

/// Bulk pass: copy every usable declaration.
///
/// Custom properties (`--*`) and blank values are dropped; the engine
/// resolves neither. Values are whitespace-normalized.
pub fn bulk_copy(resolved: &StyleMap) -> StyleMap {
    resolved
        .iter()
        .filter(|(key, value)| !key.starts_with("--") && !value.trim().is_empty())
        .map(|(key, value)| {
            let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
            (key.clone(), normalized)
        })
        .collect()
}

/// Second pass: force the protected properties back to their resolved
/// values, untouched by the bulk pass's filtering.
pub fn apply_protected(mut declared: StyleMap, resolved: &StyleMap, protected: &[&str]) -> StyleMap {
    for key in protected {
        if let Some(value) = resolved.get(*key) {
            if !value.trim().is_empty() {
                declared.insert((*key).to_string(), value.clone());
            }
        }
    }
    declared
}

/// Full flattening transform for one node: bulk copy plus protected
/// re-apply.
pub fn flatten_styles(resolved: &StyleMap) -> StyleMap {
    apply_protected(bulk_copy(resolved), resolved, PROTECTED_PROPERTIES)
}

/// True when a declaration value uses a color function the capture
/// engine cannot parse, including inside gradients or shorthands.
pub fn value_uses_unsupported_color(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    UNSUPPORTED_COLOR_FUNCTIONS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Scan a node's declarations for the first unsupported color value.
pub fn find_unsupported_color(declared: &StyleMap) -> Option<(&str, &str)> {
    declared
        .iter()
        .find(|(_, value)| value_uses_unsupported_color(value))
        .map(|(key, value)| (key.as_str(), value.as_str()))
}
