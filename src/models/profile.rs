use serde::{Deserialize, Serialize};

use super::platform::Platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default)]
    pub show_branding: bool,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub social_accounts: Vec<SocialAccount>,
    #[serde(default)]
    pub avatar_style: AvatarStyle,
    #[serde(default)]
    pub show_social_in_header: bool,
    #[serde(default)]
    pub open_graph: OpenGraph,
}

impl Profile {
    /// The accent as a CSS color. Palette names map to their 500 shade; a
    /// `#rgb`/`#rrggbb` value passes through; anything else falls back to blue.
    pub fn accent_color(&self) -> &str {
        let color = self.primary_color.trim();
        let is_hex = matches!(color.len(), 4 | 7)
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if is_hex {
            return color;
        }
        match color.to_ascii_lowercase().as_str() {
            "red" => "#ef4444",
            "orange" => "#f97316",
            "yellow" => "#eab308",
            "green" => "#22c55e",
            "teal" => "#14b8a6",
            "indigo" => "#6366f1",
            "purple" => "#a855f7",
            "pink" => "#ec4899",
            "gray" | "grey" => "#6b7280",
            "black" => "#111827",
            _ => "#3b82f6",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the collector; events are posted to `<base>/track`.
    /// `supabaseUrl` is accepted for documents exported by older editors.
    #[serde(default, alias = "supabaseUrl")]
    pub endpoint: String,
}

impl AnalyticsConfig {
    /// The collector URL, or `None` when tracking is off or unconfigured.
    pub fn track_url(&self) -> Option<String> {
        let base = self.endpoint.trim().trim_end_matches('/');
        if !self.enabled || base.is_empty() {
            return None;
        }
        Some(format!("{}/track", base))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    pub platform: String,
    pub handle: String,
    #[serde(default)]
    pub follower_count: Option<u64>,
}

impl SocialAccount {
    pub fn platform(&self) -> Platform {
        Platform::from_tag(&self.platform)
    }

    pub fn url(&self) -> String {
        self.platform().build_url(&self.handle)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarShape {
    #[default]
    Circle,
    Rounded,
    Square,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarStyle {
    #[serde(default)]
    pub shape: AvatarShape,
    #[serde(default = "default_true")]
    pub shadow: bool,
    #[serde(default = "default_true")]
    pub border: bool,
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default = "default_border_width")]
    pub border_width: u32,
}

impl Default for AvatarStyle {
    fn default() -> Self {
        AvatarStyle {
            shape: AvatarShape::Circle,
            shadow: true,
            border: true,
            border_color: default_border_color(),
            border_width: default_border_width(),
        }
    }
}

impl AvatarStyle {
    /// Inline CSS for the avatar frame.
    pub fn css(&self) -> String {
        let radius = match self.shape {
            AvatarShape::Circle => "9999px",
            AvatarShape::Rounded => "1.5rem",
            AvatarShape::Square => "0",
        };
        let mut css = format!("border-radius:{};", radius);
        if self.shadow {
            css.push_str("box-shadow:0 25px 50px -12px rgba(0,0,0,0.15);");
        }
        if self.border {
            css.push_str(&format!(
                "border:{}px solid {};",
                self.border_width, self.border_color
            ));
        }
        css
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub twitter_card_type: Option<String>,
}

fn default_primary_color() -> String {
    "blue".to_string()
}

fn default_true() -> bool {
    true
}

fn default_border_color() -> String {
    "#ffffff".to_string()
}

fn default_border_width() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics(json: &str) -> AnalyticsConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn track_url_appends_path_once() {
        let cfg = analytics(r#"{"enabled":true,"endpoint":" https://collect.example/v1/ "}"#);
        assert_eq!(cfg.track_url().as_deref(), Some("https://collect.example/v1/track"));
        let cfg = analytics(r#"{"enabled":true,"endpoint":"https://collect.example"}"#);
        assert_eq!(cfg.track_url().as_deref(), Some("https://collect.example/track"));
    }

    #[test]
    fn legacy_supabase_key_is_accepted() {
        let cfg = analytics(r#"{"enabled":true,"supabaseUrl":"https://abc.supabase.co/"}"#);
        assert_eq!(cfg.track_url().as_deref(), Some("https://abc.supabase.co/track"));
    }

    #[test]
    fn accent_from_palette_name_or_hex() {
        let mut profile: Profile = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(profile.accent_color(), "#3b82f6");
        profile.primary_color = "Purple".into();
        assert_eq!(profile.accent_color(), "#a855f7");
        profile.primary_color = "#0af".into();
        assert_eq!(profile.accent_color(), "#0af");
        profile.primary_color = "#12345g".into();
        assert_eq!(profile.accent_color(), "#3b82f6");
        profile.primary_color = "red;}body{display:none".into();
        assert_eq!(profile.accent_color(), "#3b82f6");
    }

    #[test]
    fn disabled_or_blank_means_no_tracking() {
        assert_eq!(analytics(r#"{"enabled":false,"endpoint":"https://c.example"}"#).track_url(), None);
        assert_eq!(analytics(r#"{"enabled":true,"endpoint":"  "}"#).track_url(), None);
        assert_eq!(AnalyticsConfig::default().track_url(), None);
    }
}
