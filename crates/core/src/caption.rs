//! Caption generation for publishing.
//!
//! The caption is derived from slide 1 of a post plus the studio's
//! contact handles. Lines are emitted in a fixed order, sources that
//! are unset or blank are skipped entirely, and the caption always
//! ends with the studio hashtag block.

use crate::composition::SlideContent;

/// Fixed trailing hashtag block, always the last line of a caption.
pub const HASHTAG_BLOCK: &str = "#vitrine #arte #cultura #agenda #eventos";

/// Optional social handles appended to every caption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactHandles {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
}

/// Build the post caption from slide 1 and the contact handles.
///
/// Line order: title, subtitle, description, period, link, Instagram,
/// Facebook, LinkedIn, tag line, then a blank separator and the
/// hashtag block. Each line is included only when its source field is
/// non-blank.
pub fn build_caption(first_slide: &SlideContent, contacts: &ContactHandles) -> String {
    let mut lines: Vec<String> = Vec::new();

    push_if_set(&mut lines, first_slide.title.as_deref(), |v| v.to_string());
    push_if_set(&mut lines, first_slide.subtitle.as_deref(), |v| {
        v.to_string()
    });
    push_if_set(&mut lines, first_slide.description.as_deref(), |v| {
        v.to_string()
    });
    push_if_set(&mut lines, first_slide.period_text.as_deref(), |v| {
        format!("📅 {v}")
    });
    push_if_set(&mut lines, first_slide.cta_link.as_deref(), |v| {
        format!("🔗 {v}")
    });
    push_if_set(&mut lines, contacts.instagram.as_deref(), |v| {
        format!("📸 @{}", v.trim_start_matches('@'))
    });
    push_if_set(&mut lines, contacts.facebook.as_deref(), |v| {
        format!("👥 {v}")
    });
    push_if_set(&mut lines, contacts.linkedin.as_deref(), |v| {
        format!("💼 {v}")
    });
    push_if_set(&mut lines, first_slide.tag_text.as_deref(), |v| {
        v.to_string()
    });

    let mut caption = lines.join("\n");
    if !caption.is_empty() {
        caption.push_str("\n\n");
    }
    caption.push_str(HASHTAG_BLOCK);
    caption
}

/// Fields of slide 1 that feed the caption. Edits to any of them
/// invalidate a previously generated caption.
pub fn caption_fields_changed(before: &SlideContent, after: &SlideContent) -> bool {
    before.title != after.title
        || before.subtitle != after.subtitle
        || before.description != after.description
        || before.period_text != after.period_text
        || before.cta_link != after.cta_link
        || before.tag_text != after.tag_text
}

fn push_if_set<F>(lines: &mut Vec<String>, value: Option<&str>, format: F)
where
    F: FnOnce(&str) -> String,
{
    if let Some(v) = value {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            lines.push(format(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide() -> SlideContent {
        SlideContent {
            title: Some("Mostra de Gravura".to_string()),
            subtitle: Some("Coletiva de inverno".to_string()),
            description: Some("Doze artistas, uma prensa centenária.".to_string()),
            period_text: Some("12/07 a 30/08".to_string()),
            cta_link: Some("vitrine.example.com/mostra".to_string()),
            tag_text: Some("#gravura".to_string()),
            ..SlideContent::default()
        }
    }

    #[test]
    fn lines_appear_in_fixed_order() {
        let contacts = ContactHandles {
            instagram: Some("@vitrine.estudio".to_string()),
            facebook: Some("vitrineestudio".to_string()),
            linkedin: Some("vitrine-estudio".to_string()),
        };
        let caption = build_caption(&slide(), &contacts);
        let lines: Vec<&str> = caption.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Mostra de Gravura",
                "Coletiva de inverno",
                "Doze artistas, uma prensa centenária.",
                "📅 12/07 a 30/08",
                "🔗 vitrine.example.com/mostra",
                "📸 @vitrine.estudio",
                "👥 vitrineestudio",
                "💼 vitrine-estudio",
                "#gravura",
                "",
                HASHTAG_BLOCK,
            ]
        );
    }

    #[test]
    fn blank_fields_are_skipped_without_empty_lines() {
        let mut s = slide();
        s.subtitle = Some("   ".to_string());
        s.description = None;
        s.tag_text = None;
        let caption = build_caption(&s, &ContactHandles::default());
        let lines: Vec<&str> = caption.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Mostra de Gravura",
                "📅 12/07 a 30/08",
                "🔗 vitrine.example.com/mostra",
                "",
                HASHTAG_BLOCK,
            ]
        );
    }

    #[test]
    fn instagram_handle_never_doubles_the_at_sign() {
        let contacts = ContactHandles {
            instagram: Some("vitrine.estudio".to_string()),
            ..ContactHandles::default()
        };
        let caption = build_caption(&SlideContent::default(), &contacts);
        assert!(caption.contains("📸 @vitrine.estudio"));
        assert!(!caption.contains("@@"));
    }

    #[test]
    fn empty_slide_still_yields_hashtag_block() {
        let caption = build_caption(&SlideContent::default(), &ContactHandles::default());
        assert_eq!(caption, HASHTAG_BLOCK);
    }

    #[test]
    fn caption_always_ends_with_hashtag_block() {
        let caption = build_caption(&slide(), &ContactHandles::default());
        assert!(caption.ends_with(HASHTAG_BLOCK));
    }

    #[test]
    fn watched_field_edits_are_detected() {
        let before = slide();

        let mut after = before.clone();
        after.title = Some("Outro título".to_string());
        assert!(caption_fields_changed(&before, &after));

        let mut after = before.clone();
        after.period_text = None;
        assert!(caption_fields_changed(&before, &after));

        // cta_text is not part of the caption.
        let mut after = before.clone();
        after.cta_text = Some("Garanta seu ingresso".to_string());
        assert!(!caption_fields_changed(&before, &after));

        assert!(!caption_fields_changed(&before, &before.clone()));
    }
}
