use crate::content::Page;
use crate::links::is_navigable;
use crate::models::block::BlockKind;

use super::{absolute_url, json_escape};

/// JSON-LD `Person` for the profile. `sameAs` lists every social profile the
/// page links to, from the header accounts and from social blocks.
pub fn build_person_jsonld(page: &Page, base_url: Option<&str>) -> String {
    let profile = &page.profile;

    let mut same_as: Vec<String> = profile
        .social_accounts
        .iter()
        .map(|a| a.url())
        .collect();
    for block in &page.blocks {
        match &block.kind {
            BlockKind::Social { platform: Some(p), handle: Some(h), .. } => {
                same_as.push(p.build_url(h))
            }
            BlockKind::SocialIcon { platform, handle: Some(h) } => {
                same_as.push(platform.build_url(h))
            }
            _ => {}
        }
    }
    same_as.retain(|u| is_navigable(u));
    let mut seen = std::collections::HashSet::new();
    same_as.retain(|u| seen.insert(u.clone()));

    let mut ld = format!(
        r#"<script type="application/ld+json">
{{
    "@context": "https://schema.org",
    "@type": "Person",
    "name": "{}",
    "description": "{}""#,
        json_escape(&profile.name),
        json_escape(&profile.bio),
    );

    if let Some(base) = base_url {
        ld.push_str(&format!(",\n    \"url\": \"{}\"", json_escape(base)));
    }
    if let Some(img) = absolute_url(&profile.avatar_url, base_url) {
        ld.push_str(&format!(",\n    \"image\": \"{}\"", json_escape(&img)));
    }
    if !same_as.is_empty() {
        let list: Vec<String> = same_as
            .iter()
            .map(|u| format!("\"{}\"", json_escape(u)))
            .collect();
        ld.push_str(&format!(",\n    \"sameAs\": [{}]", list.join(", ")));
    }

    ld.push_str("\n}\n</script>");
    ld
}
