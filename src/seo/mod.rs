pub mod jsonld;
pub mod meta;

pub use jsonld::build_person_jsonld;
pub use meta::build_meta;

use crate::render::html_escape;

/// Escape for a JSON string literal inside a `<script>` block.
fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\u003c"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Make a possibly-relative asset reference absolute against `base_url`.
/// Inline `data:` images and unresolvable paths yield `None`; crawlers
/// ignore both.
fn absolute_url(reference: &str, base_url: Option<&str>) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with("data:") {
        return None;
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Some(reference.to_string());
    }
    let base = url::Url::parse(base_url?).ok()?;
    base.join(reference).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Page;

    const PAGE: &str = r#"{
        "profile": {
            "name": "Ada",
            "bio": "Line one\nLine \"two\"",
            "avatarUrl": "/assets/avatar.png",
            "socialAccounts": [
                {"platform": "github", "handle": "ada"},
                {"platform": "custom", "handle": "javascript:alert(1)"}
            ],
            "openGraph": {"title": "Ada's page", "image": "data:image/png;base64,AAAA"}
        },
        "blocks": [
            {"id": "gh", "type": "SOCIAL", "socialPlatform": "github", "socialHandle": "ada"},
            {"id": "x", "type": "SOCIAL_ICON", "socialPlatform": "x", "socialHandle": "ada_x"}
        ]
    }"#;

    #[test]
    fn absolute_url_resolves_against_base() {
        assert_eq!(
            absolute_url("/assets/a.png", Some("https://me.example/")).as_deref(),
            Some("https://me.example/assets/a.png")
        );
        assert_eq!(absolute_url("/assets/a.png", None), None);
        assert_eq!(absolute_url("data:image/png;base64,AA", Some("https://me.example")), None);
        assert_eq!(
            absolute_url("https://cdn.example/a.png", None).as_deref(),
            Some("https://cdn.example/a.png")
        );
    }

    #[test]
    fn meta_falls_back_to_profile() {
        let page = Page::from_json(PAGE).unwrap();
        let meta = build_meta(&page.profile, Some("https://me.example"));
        assert!(meta.contains("<title>Ada&#x27;s page</title>"));
        assert!(meta.contains(r#"<meta property="og:site_name" content="Ada">"#));
        assert!(meta.contains(r#"<link rel="canonical" href="https://me.example">"#));
        // Inline image skipped, avatar used instead.
        assert!(meta.contains(r#"og:image" content="https://me.example/assets/avatar.png""#));
        assert!(meta.contains(r#"<meta name="twitter:card" content="summary">"#));
    }

    #[test]
    fn jsonld_lists_unique_safe_profiles() {
        let page = Page::from_json(PAGE).unwrap();
        let ld = build_person_jsonld(&page, None);
        assert_eq!(ld.matches("https://github.com/ada").count(), 1);
        assert!(ld.contains("https://x.com/ada_x"));
        assert!(!ld.contains("javascript:"));
        assert!(ld.contains(r#"Line one\nLine \"two\""#));
    }

    #[test]
    fn json_escape_covers_control_characters() {
        assert_eq!(json_escape("a\r\nb\tc\u{1}</script>"), r#"a\r\nb\tc\u0001\u003c/script>"#);
    }

    #[test]
    fn jsonld_with_crlf_bio_is_valid_json() {
        let mut page = Page::from_json(PAGE).unwrap();
        page.profile.bio = "Line one\r\nLine\ttwo\u{7}".to_string();
        let ld = build_person_jsonld(&page, None);
        let body = ld
            .trim_start_matches(r#"<script type="application/ld+json">"#)
            .trim_end_matches("</script>");
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["description"], "Line one\r\nLine\ttwo\u{7}");
    }
}
