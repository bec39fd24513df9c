use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;

use crate::analytics::{Beacon, Visitor};
use crate::config::Config;
use crate::content::Page;
use crate::feed::ChannelFeeds;
use crate::links::click_target;
use crate::render::{self, PageView};

// ── Page ───────────────────────────────────────────────

#[get("/")]
pub fn homepage(
    page: &State<Page>,
    feeds: &State<ChannelFeeds>,
    beacon: &State<Beacon>,
    config: &State<Config>,
) -> RawHtml<String> {
    let view = PageView {
        page: page.inner(),
        feeds: feeds.inner(),
        base_url: config.site.base_url(),
        analytics: beacon.is_enabled(),
    };
    RawHtml(render::render_page(&view))
}

// ── Click-through ──────────────────────────────────────

/// Resolve a tile's destination, record the click, and send the visitor on.
/// Unknown blocks and blocks without an http(s) destination are a 404.
#[get("/go/<block_id>")]
pub fn go(
    block_id: &str,
    page: &State<Page>,
    beacon: &State<Beacon>,
    visitor: Visitor,
) -> Option<Redirect> {
    let block = page.block(block_id)?;
    let Some(target) = click_target(block) else {
        log::debug!("refusing click-through for block {}", block.id);
        return None;
    };
    beacon.send(visitor.click_event(&block.id, &target));
    Some(Redirect::to(target))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![homepage, go]
}
