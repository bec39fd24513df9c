use crate::models::profile::Profile;

use super::{absolute_url, html_escape};

/// Title, description and social-card meta tags for the page.
/// Open Graph fields fall back to the profile name and bio.
pub fn build_meta(profile: &Profile, base_url: Option<&str>) -> String {
    let og = &profile.open_graph;

    let title = og
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&profile.name);
    let description = og
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(&profile.bio);
    let description = description.replace('\n', " ");
    let site_name = og
        .site_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&profile.name);
    let card = og
        .twitter_card_type
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("summary");
    let image = og
        .image
        .as_deref()
        .and_then(|img| absolute_url(img, base_url))
        .or_else(|| absolute_url(&profile.avatar_url, base_url));

    let mut meta = format!(
        r#"<title>{title}</title>
<meta name="description" content="{desc}">
<meta property="og:type" content="profile">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{desc}">
<meta property="og:site_name" content="{site}">"#,
        title = html_escape(title),
        desc = html_escape(&description),
        site = html_escape(site_name),
    );

    if let Some(base) = base_url {
        meta.push_str(&format!(
            r#"
<link rel="canonical" href="{url}">
<meta property="og:url" content="{url}">"#,
            url = html_escape(base)
        ));
    }

    if let Some(ref img) = image {
        meta.push_str(&format!(
            r#"
<meta property="og:image" content="{}">"#,
            html_escape(img)
        ));
    }

    meta.push_str(&format!(
        r#"
<meta name="twitter:card" content="{}">
<meta name="twitter:title" content="{}">
<meta name="twitter:description" content="{}">"#,
        html_escape(card),
        html_escape(title),
        html_escape(&description),
    ));
    if let Some(ref img) = image {
        meta.push_str(&format!(
            r#"
<meta name="twitter:image" content="{}">"#,
            html_escape(img)
        ));
    }

    meta
}
