#[macro_use]
extern crate rocket;

use rocket::fs::{FileServer, Options};
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

mod analytics;
mod boot;
mod config;
mod content;
mod feed;
mod icons;
mod layout;
mod links;
mod models;
mod rate_limit;
mod render;
mod routes;
mod seo;
mod tilt;


use analytics::Beacon;
use config::Config;
use content::Page;
use feed::{ChannelFeeds, FeedSource, ProxyFeed};
use rate_limit::RateLimiter;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the server around an already-loaded page.
pub fn build(config: Config, page: Page, source: Arc<dyn FeedSource>) -> Rocket<Build> {
    let feeds = ChannelFeeds::new(
        &page,
        source,
        Duration::from_secs(config.feed.cache_secs),
    );

    let mut analytics = page.profile.analytics.clone();
    if let Some(endpoint) = &config.analytics.endpoint {
        analytics.endpoint = endpoint.clone();
    }
    let beacon = Beacon::new(analytics.track_url(), &config.analytics.site_id);

    log::info!(
        "[boot] {} block(s), {} channel feed(s) to fetch, analytics {}",
        page.blocks.len(),
        feeds.pending_count(),
        beacon.track_url().unwrap_or("off")
    );

    let assets = FileServer::new(&config.assets.dir, Options::Index | Options::Missing);

    rocket::build()
        .manage(page)
        .manage(feeds)
        .manage(beacon)
        .manage(RateLimiter::new())
        .manage(config)
        .mount("/assets", assets)
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("[boot] {}", e);
            process::exit(1);
        }
    };

    // Boot check: verify content and assets paths before loading anything
    boot::run(&config);

    let page = match Page::load(Path::new(&config.content.path)) {
        Ok(page) => page,
        Err(e) => {
            log::error!("[boot] {}: {}", config.content.path, e);
            process::exit(1);
        }
    };

    let source = match ProxyFeed::new(&config.feed.proxy_url, config.feed.timeout_secs) {
        Ok(source) => source,
        Err(e) => {
            log::error!("[boot] {}", e);
            process::exit(1);
        }
    };

    build(config, page, Arc::new(source))
}
