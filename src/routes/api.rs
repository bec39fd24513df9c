use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;
use std::time::Duration;

use crate::analytics::{Beacon, EventKind, TrackEvent};
use crate::config::Config;
use crate::content::Page;
use crate::feed::ChannelFeeds;
use crate::models::block::Video;
use crate::rate_limit::{ClientIp, RateLimiter};
use crate::render;

// ── Channel videos ─────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    /// Always false: the response is only sent once the fetch has settled.
    pub loading: bool,
    pub videos: Vec<Video>,
    /// The tile re-rendered with its videos, ready to swap into the page.
    pub html: String,
}

#[get("/blocks/<block_id>/videos")]
pub async fn block_videos(
    block_id: &str,
    page: &State<Page>,
    feeds: &State<ChannelFeeds>,
) -> Option<Json<VideosResponse>> {
    let block = page.block(block_id)?;
    if !block.is_channel() {
        return None;
    }
    let videos = feeds.videos(block).await;
    let html = render::render_block(block, Some(&videos));
    Some(Json(VideosResponse {
        loading: false,
        videos,
        html,
    }))
}

// ── Analytics relay ────────────────────────────────────

const TRACK_WINDOW: Duration = Duration::from_secs(60);

/// Page-view events collected in the browser, relayed with the configured
/// site id stamped on. Clicks are recorded server-side by `/go`, so any other
/// event kind is refused.
#[post("/track", format = "json", data = "<event>")]
pub fn track(
    event: Json<TrackEvent>,
    beacon: &State<Beacon>,
    limiter: &State<RateLimiter>,
    config: &State<Config>,
    client: ClientIp,
) -> Status {
    let event = event.into_inner();
    if event.event != EventKind::PageView {
        return Status::UnprocessableEntity;
    }

    let rate_key = format!("track:{}", client.0);
    if !limiter.check_and_record(&rate_key, config.analytics.track_per_minute, TRACK_WINDOW) {
        log::debug!("[analytics] throttled page views from {}", client.0);
        return Status::TooManyRequests;
    }

    beacon.send(event.into_page_view());
    Status::NoContent
}

pub fn routes() -> Vec<rocket::Route> {
    routes![block_videos, track]
}
