/// Social platforms a block or header account can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    X,
    Instagram,
    Tiktok,
    Youtube,
    Github,
    Gitlab,
    Linkedin,
    Facebook,
    Twitch,
    Dribbble,
    Medium,
    Devto,
    Reddit,
    Pinterest,
    Threads,
    Bluesky,
    Mastodon,
    Substack,
    Patreon,
    Kofi,
    Buymeacoffee,
    Snapchat,
    Discord,
    Telegram,
    Whatsapp,
    Website,
    Custom,
}

/// Static capability set for one platform.
#[derive(Debug, Clone, Copy)]
pub struct PlatformDescriptor {
    pub label: &'static str,
    /// Simple Icons slug; `None` for the generic globe/link glyphs.
    pub icon: Option<&'static str>,
    pub brand_color: &'static str,
    url_template: UrlTemplate,
}

#[derive(Debug, Clone, Copy)]
enum UrlTemplate {
    /// `prefix + handle + suffix`
    Wrap(&'static str, &'static str),
    /// The handle already is the URL.
    Verbatim,
    /// Prefix `https://` unless the handle already starts with `http`.
    Website,
}

impl PlatformDescriptor {
    const fn new(
        label: &'static str,
        icon: Option<&'static str>,
        brand_color: &'static str,
        url_template: UrlTemplate,
    ) -> Self {
        PlatformDescriptor { label, icon, brand_color, url_template }
    }

    /// Build the profile URL for a handle on this platform.
    pub fn build_url(&self, handle: &str) -> String {
        match self.url_template {
            UrlTemplate::Wrap(prefix, suffix) => format!("{}{}{}", prefix, handle, suffix),
            UrlTemplate::Verbatim => handle.to_string(),
            UrlTemplate::Website => {
                if handle.starts_with("http") {
                    handle.to_string()
                } else {
                    format!("https://{}", handle)
                }
            }
        }
    }
}

use UrlTemplate::{Verbatim, Wrap};

const X: PlatformDescriptor = PlatformDescriptor::new("X", Some("x"), "#000000", Wrap("https://x.com/", ""));
const INSTAGRAM: PlatformDescriptor = PlatformDescriptor::new("Instagram", Some("instagram"), "#E4405F", Wrap("https://instagram.com/", ""));
const TIKTOK: PlatformDescriptor = PlatformDescriptor::new("TikTok", Some("tiktok"), "#000000", Wrap("https://tiktok.com/@", ""));
const YOUTUBE: PlatformDescriptor = PlatformDescriptor::new("YouTube", Some("youtube"), "#FF0000", Wrap("https://youtube.com/@", ""));
const GITHUB: PlatformDescriptor = PlatformDescriptor::new("GitHub", Some("github"), "#181717", Wrap("https://github.com/", ""));
const GITLAB: PlatformDescriptor = PlatformDescriptor::new("GitLab", Some("gitlab"), "#FC6D26", Wrap("https://gitlab.com/", ""));
const LINKEDIN: PlatformDescriptor = PlatformDescriptor::new("LinkedIn", Some("linkedin"), "#0A66C2", Wrap("https://linkedin.com/in/", ""));
const FACEBOOK: PlatformDescriptor = PlatformDescriptor::new("Facebook", Some("facebook"), "#1877F2", Wrap("https://facebook.com/", ""));
const TWITCH: PlatformDescriptor = PlatformDescriptor::new("Twitch", Some("twitch"), "#9146FF", Wrap("https://twitch.tv/", ""));
const DRIBBBLE: PlatformDescriptor = PlatformDescriptor::new("Dribbble", Some("dribbble"), "#EA4C89", Wrap("https://dribbble.com/", ""));
const MEDIUM: PlatformDescriptor = PlatformDescriptor::new("Medium", Some("medium"), "#000000", Wrap("https://medium.com/@", ""));
const DEVTO: PlatformDescriptor = PlatformDescriptor::new("DEV", Some("devdotto"), "#0A0A0A", Wrap("https://dev.to/", ""));
const REDDIT: PlatformDescriptor = PlatformDescriptor::new("Reddit", Some("reddit"), "#FF4500", Wrap("https://reddit.com/user/", ""));
const PINTEREST: PlatformDescriptor = PlatformDescriptor::new("Pinterest", Some("pinterest"), "#BD081C", Wrap("https://pinterest.com/", ""));
const THREADS: PlatformDescriptor = PlatformDescriptor::new("Threads", Some("threads"), "#000000", Wrap("https://threads.net/@", ""));
const BLUESKY: PlatformDescriptor = PlatformDescriptor::new("Bluesky", Some("bluesky"), "#0085FF", Wrap("https://bsky.app/profile/", ""));
const MASTODON: PlatformDescriptor = PlatformDescriptor::new("Mastodon", Some("mastodon"), "#6364FF", Verbatim);
const SUBSTACK: PlatformDescriptor = PlatformDescriptor::new("Substack", Some("substack"), "#FF6719", Wrap("https://", ".substack.com"));
const PATREON: PlatformDescriptor = PlatformDescriptor::new("Patreon", Some("patreon"), "#FF424D", Wrap("https://patreon.com/", ""));
const KOFI: PlatformDescriptor = PlatformDescriptor::new("Ko-fi", Some("kofi"), "#FF5E5B", Wrap("https://ko-fi.com/", ""));
const BUYMEACOFFEE: PlatformDescriptor = PlatformDescriptor::new("Buy Me a Coffee", Some("buymeacoffee"), "#FFDD00", Wrap("https://buymeacoffee.com/", ""));
const SNAPCHAT: PlatformDescriptor = PlatformDescriptor::new("Snapchat", Some("snapchat"), "#FFFC00", Wrap("https://snapchat.com/add/", ""));
const DISCORD: PlatformDescriptor = PlatformDescriptor::new("Discord", Some("discord"), "#5865F2", Verbatim);
const TELEGRAM: PlatformDescriptor = PlatformDescriptor::new("Telegram", Some("telegram"), "#26A5E4", Wrap("https://t.me/", ""));
const WHATSAPP: PlatformDescriptor = PlatformDescriptor::new("WhatsApp", Some("whatsapp"), "#25D366", Wrap("https://wa.me/", ""));
const WEBSITE: PlatformDescriptor = PlatformDescriptor::new("Website", None, "#6B7280", UrlTemplate::Website);
const CUSTOM: PlatformDescriptor = PlatformDescriptor::new("Link", None, "#6B7280", Verbatim);

impl Platform {
    /// Map a content-document tag to a platform. Unrecognised tags are `Custom`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "x" | "twitter" => Self::X,
            "instagram" => Self::Instagram,
            "tiktok" => Self::Tiktok,
            "youtube" => Self::Youtube,
            "github" => Self::Github,
            "gitlab" => Self::Gitlab,
            "linkedin" => Self::Linkedin,
            "facebook" => Self::Facebook,
            "twitch" => Self::Twitch,
            "dribbble" => Self::Dribbble,
            "medium" => Self::Medium,
            "devto" => Self::Devto,
            "reddit" => Self::Reddit,
            "pinterest" => Self::Pinterest,
            "threads" => Self::Threads,
            "bluesky" => Self::Bluesky,
            "mastodon" => Self::Mastodon,
            "substack" => Self::Substack,
            "patreon" => Self::Patreon,
            "kofi" => Self::Kofi,
            "buymeacoffee" => Self::Buymeacoffee,
            "snapchat" => Self::Snapchat,
            "discord" => Self::Discord,
            "telegram" => Self::Telegram,
            "whatsapp" => Self::Whatsapp,
            "website" => Self::Website,
            _ => Self::Custom,
        }
    }

    pub fn descriptor(self) -> &'static PlatformDescriptor {
        match self {
            Self::X => &X,
            Self::Instagram => &INSTAGRAM,
            Self::Tiktok => &TIKTOK,
            Self::Youtube => &YOUTUBE,
            Self::Github => &GITHUB,
            Self::Gitlab => &GITLAB,
            Self::Linkedin => &LINKEDIN,
            Self::Facebook => &FACEBOOK,
            Self::Twitch => &TWITCH,
            Self::Dribbble => &DRIBBBLE,
            Self::Medium => &MEDIUM,
            Self::Devto => &DEVTO,
            Self::Reddit => &REDDIT,
            Self::Pinterest => &PINTEREST,
            Self::Threads => &THREADS,
            Self::Bluesky => &BLUESKY,
            Self::Mastodon => &MASTODON,
            Self::Substack => &SUBSTACK,
            Self::Patreon => &PATREON,
            Self::Kofi => &KOFI,
            Self::Buymeacoffee => &BUYMEACOFFEE,
            Self::Snapchat => &SNAPCHAT,
            Self::Discord => &DISCORD,
            Self::Telegram => &TELEGRAM,
            Self::Whatsapp => &WHATSAPP,
            Self::Website => &WEBSITE,
            Self::Custom => &CUSTOM,
        }
    }

    pub fn build_url(self, handle: &str) -> String {
        self.descriptor().build_url(handle)
    }
}

/// Format a follower count for display: 220430 → "220k", 1500000 → "1.5M".
pub fn format_follower_count(count: u64) -> String {
    fn scaled(value: f64, suffix: &str) -> String {
        if value >= 100.0 {
            format!("{}{}", value.round() as u64, suffix)
        } else if value.fract() == 0.0 {
            format!("{}{}", value as u64, suffix)
        } else {
            format!("{:.1}{}", value, suffix)
        }
    }

    if count < 1_000 {
        count.to_string()
    } else if count < 1_000_000 {
        scaled(count as f64 / 1_000.0, "k")
    } else {
        scaled(count as f64 / 1_000_000.0, "M")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_handle_builds_profile_url() {
        assert_eq!(Platform::Github.build_url("octocat"), "https://github.com/octocat");
    }

    #[test]
    fn wrapped_templates() {
        assert_eq!(Platform::Tiktok.build_url("me"), "https://tiktok.com/@me");
        assert_eq!(Platform::Substack.build_url("news"), "https://news.substack.com");
        assert_eq!(Platform::Linkedin.build_url("jane"), "https://linkedin.com/in/jane");
    }

    #[test]
    fn verbatim_and_website_templates() {
        assert_eq!(Platform::Mastodon.build_url("https://m.social/@a"), "https://m.social/@a");
        assert_eq!(Platform::Website.build_url("example.com"), "https://example.com");
        assert_eq!(Platform::Website.build_url("http://example.com"), "http://example.com");
        assert_eq!(Platform::Custom.build_url("javascript:x"), "javascript:x");
    }

    #[test]
    fn unknown_platform_tag_is_custom() {
        assert_eq!(Platform::from_tag("behance"), Platform::Custom);
        assert_eq!(Platform::from_tag("buymeacoffee"), Platform::Buymeacoffee);
        assert_eq!(Platform::from_tag("GitHub"), Platform::Github);
    }

    #[test]
    fn follower_counts() {
        assert_eq!(format_follower_count(999), "999");
        assert_eq!(format_follower_count(1_000), "1k");
        assert_eq!(format_follower_count(1_500), "1.5k");
        assert_eq!(format_follower_count(220_430), "220k");
        assert_eq!(format_follower_count(1_500_000), "1.5M");
        assert_eq!(format_follower_count(2_000_000), "2M");
    }
}
