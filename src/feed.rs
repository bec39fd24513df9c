use quick_xml::events::Event;
use quick_xml::Reader;
use rocket::tokio::sync::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::content::Page;
use crate::models::block::{Block, Video, MAX_CHANNEL_VIDEOS};

#[derive(Debug)]
pub struct FeedError(pub String);

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public Atom feed of a channel's uploads.
pub fn feed_url(channel_id: &str) -> String {
    format!(
        "https://www.youtube.com/feeds/videos.xml?channel_id={}",
        channel_id
    )
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", video_id)
}

pub fn poster_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

// ── Sources ───────────────────────────────────────────

/// Something that can return the raw feed document for a channel.
#[rocket::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, channel_id: &str) -> Result<String, FeedError>;
}

/// Fetches feeds through a CORS/readability proxy: `<proxy>?url=<feed url>`.
pub struct ProxyFeed {
    client: reqwest::Client,
    proxy_url: String,
}

impl ProxyFeed {
    pub fn new(proxy_url: &str, timeout_secs: u64) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| FeedError(format!("HTTP client error: {}", e)))?;
        Ok(ProxyFeed {
            client,
            proxy_url: proxy_url.to_string(),
        })
    }

    pub fn request_url(&self, channel_id: &str) -> Result<String, FeedError> {
        url::Url::parse_with_params(&self.proxy_url, &[("url", feed_url(channel_id))])
            .map(|u| u.to_string())
            .map_err(|e| FeedError(format!("bad proxy URL {:?}: {}", self.proxy_url, e)))
    }
}

#[rocket::async_trait]
impl FeedSource for ProxyFeed {
    async fn fetch(&self, channel_id: &str) -> Result<String, FeedError> {
        let url = self.request_url(channel_id)?;
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError(format!("feed request failed: {}", e)))?;
        if !resp.status().is_success() {
            return Err(FeedError(format!("feed proxy returned {}", resp.status())));
        }
        resp.text()
            .await
            .map_err(|e| FeedError(format!("feed body unreadable: {}", e)))
    }
}

// ── Parsing ───────────────────────────────────────────

/// Pull the first few `<entry>` records out of an Atom feed.
pub fn parse_feed(xml: &str) -> Result<Vec<Video>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut videos = Vec::new();
    let mut in_entry = false;
    let mut current = String::new();
    let mut video_id: Option<String> = None;
    let mut title: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "entry" {
                    in_entry = true;
                    video_id = None;
                    title = None;
                }
                current = name;
            }
            Ok(Event::Text(e)) if in_entry => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current.as_str() {
                    "yt:videoId" if video_id.is_none() => video_id = Some(text),
                    "title" if title.is_none() => title = Some(text),
                    _ => {}
                }
            }
            Ok(Event::CData(e)) if in_entry && current == "title" && title.is_none() => {
                title = Some(String::from_utf8_lossy(e.as_ref()).to_string());
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"entry" && in_entry {
                    in_entry = false;
                    let id = video_id.take().unwrap_or_default();
                    videos.push(Video {
                        thumbnail: thumbnail_url(&id),
                        title: title.take().unwrap_or_default(),
                        id,
                    });
                    if videos.len() == MAX_CHANNEL_VIDEOS {
                        break;
                    }
                }
                current.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FeedError(format!(
                    "feed XML error at {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(videos)
}

// ── Per-block cache ───────────────────────────────────

struct Fetched {
    at: Instant,
    videos: Vec<Video>,
}

struct Slot {
    channel_id: String,
    cache: RwLock<Option<Fetched>>,
    /// Held across a fetch so concurrent page loads share one request.
    gate: Mutex<()>,
}

impl Slot {
    /// The cached list, if it is younger than `ttl`.
    fn fresh(&self, ttl: Duration) -> Option<Vec<Video>> {
        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        cache
            .as_ref()
            .filter(|f| f.at.elapsed() < ttl)
            .map(|f| f.videos.clone())
    }

    fn store(&self, videos: Vec<Video>) {
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(Fetched { at: Instant::now(), videos });
    }
}

/// Lazily-fetched video lists for channel blocks that ship without one.
///
/// A successful fetch is kept for `ttl`; a failed one is not kept at all, so
/// the next page load tries again. Blocks with authored videos never fetch.
pub struct ChannelFeeds {
    source: Arc<dyn FeedSource>,
    ttl: Duration,
    slots: HashMap<String, Slot>,
}

impl ChannelFeeds {
    pub fn new(page: &Page, source: Arc<dyn FeedSource>, ttl: Duration) -> Self {
        let slots = page
            .blocks
            .iter()
            .filter_map(|b| {
                let channel = b.channel()?;
                if !channel.needs_fetch() {
                    return None;
                }
                Some((
                    b.id.clone(),
                    Slot {
                        channel_id: channel.id.clone(),
                        cache: RwLock::new(None),
                        gate: Mutex::new(()),
                    },
                ))
            })
            .collect();
        ChannelFeeds { source, ttl, slots }
    }

    /// Videos known for `block` right now, without fetching.
    /// `None` means the list has to be (re)fetched.
    pub fn cached(&self, block: &Block) -> Option<Vec<Video>> {
        let channel = block.channel()?;
        if !channel.needs_fetch() {
            return Some(channel.videos.clone());
        }
        match self.slots.get(&block.id) {
            Some(slot) => slot.fresh(self.ttl),
            None => Some(Vec::new()),
        }
    }

    /// Videos for `block`, fetching when nothing fresh is cached. Never
    /// fails: fetch or parse errors are logged and yield an empty list.
    pub async fn videos(&self, block: &Block) -> Vec<Video> {
        let Some(channel) = block.channel() else {
            return Vec::new();
        };
        if !channel.needs_fetch() {
            return channel.videos.clone();
        }
        let Some(slot) = self.slots.get(&block.id) else {
            return Vec::new();
        };
        if let Some(videos) = slot.fresh(self.ttl) {
            return videos;
        }

        let _gate = slot.gate.lock().await;
        // Someone else may have fetched while we waited.
        if let Some(videos) = slot.fresh(self.ttl) {
            return videos;
        }
        let fetched = match self.source.fetch(&slot.channel_id).await {
            Ok(body) => parse_feed(&body),
            Err(e) => Err(e),
        };
        match fetched {
            Ok(videos) => {
                log::info!(
                    "[feed] {} video(s) for channel {} (block {})",
                    videos.len(),
                    slot.channel_id,
                    block.id
                );
                slot.store(videos.clone());
                videos
            }
            Err(e) => {
                log::warn!("[feed] channel {} (block {}): {}", slot.channel_id, block.id, e);
                Vec::new()
            }
        }
    }

    /// Channel blocks with nothing fresh cached.
    pub fn pending_count(&self) -> usize {
        self.slots
            .values()
            .filter(|s| s.fresh(self.ttl).is_none())
            .count()
    }
}
