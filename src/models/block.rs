use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// Channel blocks show at most this many videos.
pub const MAX_CHANNEL_VIDEOS: usize = 4;

/// Highest grid line an explicit placement may reach (start + span).
pub const MAX_GRID_LINE: u32 = 1000;

// ── Document shape ────────────────────────────────────

/// A block exactly as authored in the content document. Every field but the
/// id, type and spans is optional; `Block::try_from` turns this into the typed
/// form the renderer works with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub subtext: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub media_position: Option<MediaPosition>,
    #[serde(default = "default_span")]
    pub col_span: u32,
    #[serde(default = "default_span")]
    pub row_span: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub custom_background: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub grid_column: Option<u32>,
    #[serde(default)]
    pub grid_row: Option<u32>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub youtube_video_id: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub youtube_mode: Option<String>,
    #[serde(default)]
    pub youtube_videos: Option<Vec<Video>>,
    #[serde(default)]
    pub social_platform: Option<String>,
    #[serde(default)]
    pub social_handle: Option<String>,
}

fn default_span() -> u32 {
    1
}

/// Focal point of a background image or media element, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for MediaPosition {
    fn default() -> Self {
        MediaPosition { x: 50.0, y: 50.0 }
    }
}

impl MediaPosition {
    pub fn css(&self) -> String {
        format!("{}% {}%", self.x, self.y)
    }
}

/// One video summary shown in a channel block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("https://youtube.com/watch?v={}", self.id)
    }
}

// ── Typed block ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub cols: u32,
    pub rows: u32,
}

/// Explicit grid start. `None` leaves the block to natural flow order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    pub column: Option<u32>,
    pub row: Option<u32>,
}

/// Color overrides. `color` and `text_color` are utility class names as
/// authored by the editor; `custom_background` is a raw CSS background.
#[derive(Debug, Clone, Default)]
pub struct BlockStyle {
    pub color: Option<String>,
    pub custom_background: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub url: String,
    pub position: MediaPosition,
}

impl Image {
    /// True when the reference points at a video file rather than an image.
    pub fn is_video(&self) -> bool {
        let path = self.url.split(['?', '#']).next().unwrap_or("");
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
        matches!(ext.as_str(), "mp4" | "webm" | "ogg" | "mov")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelMode {
    #[default]
    Single,
    Grid,
    List,
}

impl ChannelMode {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "grid" => Self::Grid,
            "list" => Self::List,
            _ => Self::Single,
        }
    }
}

pub fn channel_url(channel_id: &str) -> String {
    format!("https://youtube.com/channel/{}", channel_id)
}

/// A video channel linked to a social block.
#[derive(Debug, Clone)]
pub struct Channel {
    pub id: String,
    pub title: Option<String>,
    pub video_id: Option<String>,
    pub mode: ChannelMode,
    /// Videos shipped with the document. Empty means "fetch lazily".
    pub videos: Vec<Video>,
}

impl Channel {
    pub fn url(&self) -> String {
        channel_url(&self.id)
    }

    pub fn needs_fetch(&self) -> bool {
        self.videos.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum BlockKind {
    Link {
        title: Option<String>,
        subtext: Option<String>,
        url: Option<String>,
        image: Option<Image>,
    },
    Text {
        title: Option<String>,
        subtext: Option<String>,
        body: Option<String>,
    },
    Media {
        title: Option<String>,
        subtext: Option<String>,
        media: Option<Image>,
    },
    Social {
        title: Option<String>,
        subtext: Option<String>,
        url: Option<String>,
        platform: Option<Platform>,
        handle: Option<String>,
        channel: Option<Channel>,
    },
    SocialIcon {
        platform: Platform,
        handle: Option<String>,
    },
    Map {
        title: Option<String>,
        query: Option<String>,
    },
    Spacer,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: String,
    /// Channel linked to the block, whatever its type. Clicks fall back to it.
    pub channel_id: Option<String>,
    pub span: Span,
    pub placement: Placement,
    pub style: BlockStyle,
    pub kind: BlockKind,
}

impl TryFrom<BlockRecord> for Block {
    type Error = String;

    fn try_from(rec: BlockRecord) -> Result<Self, Self::Error> {
        if rec.id.trim().is_empty() {
            return Err("block with an empty id".to_string());
        }
        if rec.col_span == 0 || rec.row_span == 0 {
            return Err(format!(
                "block {}: colSpan and rowSpan must be positive (got {}x{})",
                rec.id, rec.col_span, rec.row_span
            ));
        }
        check_track(&rec.id, "gridColumn", rec.grid_column, rec.col_span)?;
        check_track(&rec.id, "gridRow", rec.grid_row, rec.row_span)?;

        let title = non_empty(rec.title);
        let subtext = non_empty(rec.subtext);
        let content = non_empty(rec.content);
        let position = rec.media_position.unwrap_or_default();
        let image = non_empty(rec.image_url).map(|url| Image { url, position });
        let platform = non_empty(rec.social_platform).map(|p| Platform::from_tag(&p));
        let handle = non_empty(rec.social_handle);
        let channel_id = non_empty(rec.channel_id);

        let kind = match rec.block_type.as_str() {
            "LINK" => BlockKind::Link { title, subtext, url: content, image },
            "TEXT" => BlockKind::Text { title, subtext, body: content },
            "MEDIA" => BlockKind::Media { title, subtext, media: image },
            "SOCIAL" => {
                let channel = channel_id.clone().map(|id| {
                    let mut videos = rec.youtube_videos.unwrap_or_default();
                    videos.truncate(MAX_CHANNEL_VIDEOS);
                    Channel {
                        id,
                        title: non_empty(rec.channel_title),
                        video_id: non_empty(rec.youtube_video_id),
                        mode: rec
                            .youtube_mode
                            .as_deref()
                            .map(ChannelMode::from_tag)
                            .unwrap_or_default(),
                        videos,
                    }
                });
                BlockKind::Social { title, subtext, url: content, platform, handle, channel }
            }
            "SOCIAL_ICON" => BlockKind::SocialIcon {
                platform: platform.unwrap_or(Platform::Custom),
                handle,
            },
            "MAP" => BlockKind::Map { title, query: content },
            "SPACER" => BlockKind::Spacer,
            other => return Err(format!("block {}: unknown type {:?}", rec.id, other)),
        };

        Ok(Block {
            id: rec.id,
            channel_id,
            span: Span { cols: rec.col_span, rows: rec.row_span },
            placement: Placement { column: rec.grid_column, row: rec.grid_row },
            style: BlockStyle {
                color: non_empty(rec.color),
                custom_background: non_empty(rec.custom_background),
                text_color: non_empty(rec.text_color),
            },
            kind,
        })
    }
}

/// An explicit start must be a real grid line and leave room for the span.
fn check_track(id: &str, axis: &str, start: Option<u32>, span: u32) -> Result<(), String> {
    let Some(start) = start else {
        return Ok(());
    };
    match start.checked_add(span) {
        Some(end) if start >= 1 && end <= MAX_GRID_LINE => Ok(()),
        _ => Err(format!(
            "block {}: {} {} with span {} falls outside grid lines 1..={}",
            id, axis, start, span, MAX_GRID_LINE
        )),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl Block {
    pub fn title(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Link { title, .. }
            | BlockKind::Text { title, .. }
            | BlockKind::Media { title, .. }
            | BlockKind::Social { title, .. }
            | BlockKind::Map { title, .. } => title.as_deref(),
            BlockKind::SocialIcon { .. } | BlockKind::Spacer => None,
        }
    }

    pub fn subtext(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Link { subtext, .. }
            | BlockKind::Text { subtext, .. }
            | BlockKind::Media { subtext, .. }
            | BlockKind::Social { subtext, .. } => subtext.as_deref(),
            _ => None,
        }
    }

    /// The linked channel, for social blocks that carry one.
    pub fn channel(&self) -> Option<&Channel> {
        match &self.kind {
            BlockKind::Social { channel, .. } => channel.as_ref(),
            _ => None,
        }
    }

    pub fn is_channel(&self) -> bool {
        self.channel().is_some()
    }

    pub fn is_video_grid(&self) -> bool {
        self.channel()
            .map(|c| matches!(c.mode, ChannelMode::Grid | ChannelMode::List))
            .unwrap_or(false)
    }

    /// Video to feature: the explicit one, else the first known video.
    pub fn active_video_id<'a>(&'a self, videos: &'a [Video]) -> Option<&'a str> {
        let channel = self.channel()?;
        channel
            .video_id
            .as_deref()
            .or_else(|| videos.first().map(|v| v.id.as_str()))
    }

    pub fn is_rich_player(&self, videos: &[Video]) -> bool {
        self.is_channel() && !self.is_video_grid() && self.active_video_id(videos).is_some()
    }

    pub fn link_image(&self) -> Option<&Image> {
        match &self.kind {
            BlockKind::Link { image, .. } => image.as_ref(),
            _ => None,
        }
    }

    pub fn is_link_image(&self) -> bool {
        self.link_image().is_some()
    }
}
