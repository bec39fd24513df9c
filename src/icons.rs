use crate::models::platform::{Platform, PlatformDescriptor};
use crate::render::html_escape;

const GLOBE_SVG: &str = r#"<svg width="{s}" height="{s}" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><circle cx="12" cy="12" r="10"/><path d="M12 2a14.5 14.5 0 0 0 0 20 14.5 14.5 0 0 0 0-20"/><path d="M2 12h20"/></svg>"#;

const LINK_SVG: &str = r#"<svg width="{s}" height="{s}" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71"/><path d="M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71"/></svg>"#;

pub const PLAY_SVG: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="white" stroke="white" stroke-width="2"><polygon points="6 3 20 12 6 21 6 3"/></svg>"#;

pub const YOUTUBE_BADGE_SVG: &str = r#"<svg width="12" height="12" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M2.5 17a24.12 24.12 0 0 1 0-10 2 2 0 0 1 1.4-1.4 49.56 49.56 0 0 1 16.2 0A2 2 0 0 1 21.5 7a24.12 24.12 0 0 1 0 10 2 2 0 0 1-1.4 1.4 49.55 49.55 0 0 1-16.2 0A2 2 0 0 1 2.5 17"/><path d="m10 15 5-3-5-3z"/></svg>"#;

pub const SPINNER_SVG: &str = r#"<svg class="spin" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M21 12a9 9 0 1 1-6.219-8.56"/></svg>"#;

/// Brand icon for a platform at `size` pixels. Branded platforms load the
/// Simple Icons glyph in the brand color; website and custom links use an
/// inline glyph that follows `currentColor`.
pub fn platform_icon(platform: Platform, size: u32) -> String {
    let desc: &PlatformDescriptor = platform.descriptor();
    match desc.icon {
        Some(slug) => format!(
            r#"<img class="brand-icon" src="https://cdn.simpleicons.org/{}/{}" width="{s}" height="{s}" alt="{}" loading="lazy">"#,
            slug,
            desc.brand_color.trim_start_matches('#'),
            html_escape(desc.label),
            s = size
        ),
        None => {
            let svg = if platform == Platform::Website { GLOBE_SVG } else { LINK_SVG };
            svg.replace("{s}", &size.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branded_icon_uses_brand_color() {
        let html = platform_icon(Platform::Github, 24);
        assert!(html.contains("cdn.simpleicons.org/github/181717"));
        assert!(html.contains(r#"width="24""#));
    }

    #[test]
    fn generic_icons_are_inline() {
        assert!(platform_icon(Platform::Website, 14).contains(r#"<circle cx="12""#));
        assert!(platform_icon(Platform::Custom, 14).starts_with("<svg width=\"14\""));
    }
}
