use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = "bento.toml";

pub const DEFAULT_FEED_PROXY: &str = "https://api.allorigins.win/raw";

/// Server settings from `bento.toml`. Every key is optional; a missing file
/// means all defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub content: ContentSection,
    #[serde(default)]
    pub assets: AssetsSection,
    #[serde(default)]
    pub feed: FeedSection,
    #[serde(default)]
    pub analytics: AnalyticsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSection {
    /// Public URL of the page, for canonical and social-card tags.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl SiteSection {
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentSection {
    #[serde(default = "default_content_path")]
    pub path: String,
}

impl Default for ContentSection {
    fn default() -> Self {
        ContentSection { path: default_content_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsSection {
    #[serde(default = "default_assets_dir")]
    pub dir: String,
}

impl Default for AssetsSection {
    fn default() -> Self {
        AssetsSection { dir: default_assets_dir() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSection {
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long a fetched video list is served before the next page load
    /// fetches again. Failed fetches are never cached.
    #[serde(default = "default_cache_secs")]
    pub cache_secs: u64,
}

impl Default for FeedSection {
    fn default() -> Self {
        FeedSection {
            proxy_url: default_proxy_url(),
            timeout_secs: default_timeout_secs(),
            cache_secs: default_cache_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSection {
    /// Sent as `siteId` with every event.
    #[serde(default)]
    pub site_id: String,
    /// Overrides the endpoint from the content document when set.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Page views accepted per client per minute on `/api/track`.
    #[serde(default = "default_track_per_minute")]
    pub track_per_minute: u64,
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        AnalyticsSection {
            site_id: String::new(),
            endpoint: None,
            track_per_minute: default_track_per_minute(),
        }
    }
}

fn default_content_path() -> String {
    "content/bento.json".to_string()
}

fn default_assets_dir() -> String {
    "content/assets".to_string()
}

fn default_proxy_url() -> String {
    DEFAULT_FEED_PROXY.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_secs() -> u64 {
    900
}

fn default_track_per_minute() -> u64 {
    30
}

impl Config {
    /// Read `bento.toml` from the working directory. A missing file yields
    /// defaults; a malformed one is an error.
    pub fn load() -> Result<Self, String> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        Self::parse(&raw).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_all_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg.content.path, "content/bento.json");
        assert_eq!(cfg.assets.dir, "content/assets");
        assert_eq!(cfg.feed.proxy_url, DEFAULT_FEED_PROXY);
        assert_eq!(cfg.feed.timeout_secs, 10);
        assert_eq!(cfg.feed.cache_secs, 900);
        assert!(cfg.analytics.endpoint.is_none());
        assert_eq!(cfg.analytics.track_per_minute, 30);
        assert!(cfg.site.base_url().is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::parse(
            r#"
[site]
base_url = "https://me.example/"

[feed]
timeout_secs = 3

[analytics]
site_id = "me"
track_per_minute = 5
"#,
        )
        .unwrap();
        assert_eq!(cfg.feed.timeout_secs, 3);
        assert_eq!(cfg.feed.proxy_url, DEFAULT_FEED_PROXY);
        assert_eq!(cfg.analytics.site_id, "me");
        assert_eq!(cfg.analytics.track_per_minute, 5);
        assert_eq!(cfg.feed.cache_secs, 900);
        assert_eq!(cfg.site.base_url(), Some("https://me.example"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Config::parse("[feed\nproxy_url = 1").is_err());
    }
}
