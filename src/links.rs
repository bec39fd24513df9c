use crate::models::block::{channel_url, Block, BlockKind};

/// Where a click on this block should go, before the scheme check.
///
/// A social block with both a platform and a handle links to the platform
/// profile; otherwise a linked channel wins, whatever the block type;
/// otherwise the authored URL. Icons and spacers ignore channels.
pub fn resolve_target(block: &Block) -> Option<String> {
    match &block.kind {
        BlockKind::Social { platform: Some(platform), handle: Some(handle), .. } => {
            Some(platform.build_url(handle))
        }
        BlockKind::SocialIcon { platform, handle } => {
            handle.as_deref().map(|h| platform.build_url(h))
        }
        BlockKind::Spacer => None,
        kind => match &block.channel_id {
            Some(channel_id) => Some(channel_url(channel_id)),
            None => match kind {
                BlockKind::Social { url, .. } | BlockKind::Link { url, .. } => url.clone(),
                _ => None,
            },
        },
    }
}

/// Only absolute http(s) URLs may be opened. Relative paths, `javascript:`,
/// `data:` and everything else are refused.
pub fn is_navigable(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    url::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// The URL a click should open, or `None` when the click is a no-op.
pub fn click_target(block: &Block) -> Option<String> {
    resolve_target(block).filter(|url| is_navigable(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::BlockRecord;

    fn block(json: &str) -> Block {
        Block::try_from(serde_json::from_str::<BlockRecord>(json).unwrap()).unwrap()
    }

    #[test]
    fn scheme_allowlist() {
        assert!(is_navigable("https://example.com"));
        assert!(is_navigable("http://example.com/a?b=c"));
        assert!(!is_navigable("javascript:alert(1)"));
        assert!(!is_navigable("JavaScript:alert(1)"));
        assert!(!is_navigable("/relative/path"));
        assert!(!is_navigable("data:text/html,hi"));
        assert!(!is_navigable("mailto:a@b.c"));
        assert!(!is_navigable("https://"));
        assert!(!is_navigable(" https://example.com"));
        assert!(!is_navigable(""));
    }

    #[test]
    fn channel_id_redirects_any_card() {
        let link = block(r#"{"id":"l","type":"LINK","content":"https://example.com","channelId":"UC9"}"#);
        assert_eq!(click_target(&link).as_deref(), Some("https://youtube.com/channel/UC9"));
        assert!(link.channel().is_none());

        let text = block(r#"{"id":"t","type":"TEXT","content":"hi","channelId":"UC9"}"#);
        assert_eq!(click_target(&text).as_deref(), Some("https://youtube.com/channel/UC9"));

        let icon = block(r#"{"id":"i","type":"SOCIAL_ICON","socialPlatform":"github","socialHandle":"ada","channelId":"UC9"}"#);
        assert_eq!(click_target(&icon).as_deref(), Some("https://github.com/ada"));
    }
}
