use rocket::request::{FromRequest, Outcome, Request};
use rocket::tokio;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[default]
    PageView,
    Click,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Utm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Utm {
    /// Collect `utm_*` parameters from a full URL.
    pub fn from_url(page_url: &str) -> Self {
        let mut utm = Utm::default();
        let Ok(url) = url::Url::parse(page_url) else {
            return utm;
        };
        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "utm_source" => &mut utm.source,
                "utm_medium" => &mut utm.medium,
                "utm_campaign" => &mut utm.campaign,
                "utm_term" => &mut utm.term,
                "utm_content" => &mut utm.content,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.to_string());
        }
        utm
    }
}

/// One analytics event, in the collector's wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    #[serde(default)]
    pub site_id: String,
    pub event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_url: Option<String>,
    #[serde(default)]
    pub page_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default)]
    pub utm: Utm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_h: Option<u32>,
}

impl TrackEvent {
    /// Drop the click-only fields, keeping what a page view may carry.
    pub fn into_page_view(self) -> Self {
        TrackEvent {
            event: EventKind::PageView,
            block_id: None,
            destination_url: None,
            ..self
        }
    }
}

/// Request details the server can see on its own: the page the visitor came
/// from and their preferred language.
pub struct Visitor {
    pub referer: Option<String>,
    pub language: Option<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Visitor {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();
        Outcome::Success(Visitor::from_headers(
            headers.get_one("Referer"),
            headers.get_one("Accept-Language"),
        ))
    }
}

impl Visitor {
    pub fn from_headers(referer: Option<&str>, accept_language: Option<&str>) -> Self {
        let referer = referer
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        // First tag of Accept-Language, quality weights dropped.
        let language = accept_language
            .and_then(|v| v.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .map(str::trim)
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .map(str::to_string);
        Visitor { referer, language }
    }

    /// Click event for a tile on the page the visitor was looking at.
    pub fn click_event(&self, block_id: &str, destination: &str) -> TrackEvent {
        let page_url = self.referer.clone().unwrap_or_default();
        TrackEvent {
            event: EventKind::Click,
            block_id: Some(block_id.to_string()),
            destination_url: Some(destination.to_string()),
            utm: Utm::from_url(&page_url),
            page_url,
            language: self.language.clone(),
            ..TrackEvent::default()
        }
    }
}

/// Forwards events to `<analytics-base>/track`. Sending never blocks the
/// caller and never reports failure beyond a log line.
pub struct Beacon {
    client: reqwest::Client,
    track_url: Option<String>,
    site_id: String,
    dispatched: AtomicUsize,
}

impl Beacon {
    pub fn new(track_url: Option<String>, site_id: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[analytics] falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Beacon {
            client,
            track_url,
            site_id: site_id.to_string(),
            dispatched: AtomicUsize::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.track_url.is_some()
    }

    pub fn track_url(&self) -> Option<&str> {
        self.track_url.as_deref()
    }

    /// Events handed off since startup.
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Stamp the site id and dispatch on a detached task. Returns whether an
    /// event was actually dispatched.
    pub fn send(&self, mut event: TrackEvent) -> bool {
        let Some(url) = self.track_url.clone() else {
            return false;
        };
        event.site_id = self.site_id.clone();
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.post(&url).json(&event).send().await;
            match result {
                Ok(resp) if !resp.status().is_success() => {
                    log::warn!("[analytics] {} returned {}", url, resp.status());
                }
                Ok(_) => log::debug!("[analytics] sent {:?} event", event.event),
                Err(e) => log::warn!("[analytics] {} failed: {}", url, e),
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_from_page_url() {
        let utm = Utm::from_url(
            "https://me.example/?utm_source=news&utm_medium=email&utm_campaign=&other=1",
        );
        assert_eq!(utm.source.as_deref(), Some("news"));
        assert_eq!(utm.medium.as_deref(), Some("email"));
        assert_eq!(utm.campaign, None);
        assert_eq!(Utm::from_url("not a url"), Utm::default());
    }

    #[test]
    fn wire_format_is_camel_case_and_sparse() {
        let event = TrackEvent {
            site_id: "s".into(),
            event: EventKind::PageView,
            page_url: "https://me.example/".into(),
            screen_w: Some(390),
            ..TrackEvent::default()
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "page_view");
        assert_eq!(json["siteId"], "s");
        assert_eq!(json["pageUrl"], "https://me.example/");
        assert_eq!(json["screenW"], 390);
        assert!(json.get("screenH").is_none());
        assert!(json.get("blockId").is_none());
        assert!(json["utm"].as_object().unwrap().is_empty());
    }

    #[test]
    fn disabled_beacon_drops_events() {
        let beacon = Beacon::new(None, "site");
        assert!(!beacon.is_enabled());
        assert!(!beacon.send(TrackEvent::default()));
        assert_eq!(beacon.dispatched(), 0);
    }

    #[rocket::async_test]
    async fn enabled_beacon_dispatches() {
        let beacon = Beacon::new(Some("http://127.0.0.1:9/track".into()), "site");
        assert!(beacon.is_enabled());
        assert!(beacon.send(TrackEvent::default()));
        assert_eq!(beacon.dispatched(), 1);
    }

    #[test]
    fn visitor_reads_referer_and_first_language() {
        let v = Visitor::from_headers(
            Some(" https://me.example/?utm_source=ig "),
            Some("fr-FR;q=0.9, en;q=0.8"),
        );
        assert_eq!(v.referer.as_deref(), Some("https://me.example/?utm_source=ig"));
        assert_eq!(v.language.as_deref(), Some("fr-FR"));

        let v = Visitor::from_headers(Some("  "), Some("*"));
        assert_eq!(v.referer, None);
        assert_eq!(v.language, None);
        assert_eq!(Visitor::from_headers(None, None).language, None);
    }

    #[test]
    fn click_event_carries_page_and_utm() {
        let v = Visitor::from_headers(Some("https://me.example/?utm_source=ig"), Some("de"));
        let event = v.click_event("site", "https://example.com");
        assert_eq!(event.event, EventKind::Click);
        assert_eq!(event.block_id.as_deref(), Some("site"));
        assert_eq!(event.destination_url.as_deref(), Some("https://example.com"));
        assert_eq!(event.page_url, "https://me.example/?utm_source=ig");
        assert_eq!(event.utm.source.as_deref(), Some("ig"));
        assert_eq!(event.language.as_deref(), Some("de"));
    }

    #[test]
    fn page_view_sheds_click_fields() {
        let forged = TrackEvent {
            event: EventKind::Click,
            block_id: Some("x".into()),
            destination_url: Some("https://elsewhere.example".into()),
            page_url: "https://me.example/".into(),
            ..TrackEvent::default()
        };
        let view = forged.into_page_view();
        assert_eq!(view.event, EventKind::PageView);
        assert_eq!(view.block_id, None);
        assert_eq!(view.destination_url, None);
        assert_eq!(view.page_url, "https://me.example/");
    }
}
