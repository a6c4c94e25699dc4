//! Object key conventions for uploaded images.
//!
//! Every upload gets a fresh key: re-rendering a slide must never
//! overwrite an object that a live post already references.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::types::DbId;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Object key for a rendered slide image.
///
/// Shape: `posts/{post_id}/slide-{order:02}-{uuid}.png`.
pub fn slide_image_key(post_id: DbId, slide_order: i32) -> String {
    format!(
        "posts/{post_id}/slide-{slide_order:02}-{}.png",
        Uuid::new_v4()
    )
}

/// Object key for an uploaded custom decorative element.
///
/// The original filename is kept (slugged) for traceability, prefixed
/// with a UUID so collisions are impossible.
pub fn element_asset_key(original_filename: &str) -> String {
    let (stem, extension) = match original_filename.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, ext.to_ascii_lowercase()),
        _ => (original_filename, "png".to_string()),
    };
    let slug = slugify(stem);
    if slug.is_empty() {
        format!("elements/{}.{extension}", Uuid::new_v4())
    } else {
        format!("elements/{}-{slug}.{extension}", Uuid::new_v4())
    }
}

fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    NON_SLUG
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_keys_carry_post_and_zero_padded_order() {
        let key = slide_image_key(42, 3);
        assert!(key.starts_with("posts/42/slide-03-"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn slide_keys_are_unique_per_call() {
        assert_ne!(slide_image_key(1, 1), slide_image_key(1, 1));
    }

    #[test]
    fn element_keys_slug_the_original_name() {
        let key = element_asset_key("Meu Elemento (final).PNG");
        assert!(key.starts_with("elements/"));
        assert!(key.ends_with("-meu-elemento-final.png"));
    }

    #[test]
    fn element_keys_survive_hostile_names() {
        let key = element_asset_key("***");
        assert!(key.starts_with("elements/"));
        assert!(key.ends_with(".png"));

        let no_ext = element_asset_key("estrela");
        assert!(no_ext.ends_with("-estrela.png"));
    }
}
