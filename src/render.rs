use crate::content::Page;
use crate::feed::{self, ChannelFeeds};
use crate::icons::{self, platform_icon};
use crate::layout;
use crate::links::{click_target, is_navigable};
use crate::models::block::{Block, BlockKind, Image, Video, MAX_CHANNEL_VIDEOS};
use crate::models::platform::format_follower_count;
use crate::models::profile::{Profile, Theme};
use crate::seo;
use crate::tilt::{self, TiltStyle};

/// Everything needed to render the page once.
pub struct PageView<'a> {
    pub page: &'a Page,
    pub feeds: &'a ChannelFeeds,
    /// Absolute site URL, used for canonical and social-card tags.
    pub base_url: Option<&'a str>,
    /// Emit the page-view script.
    pub analytics: bool,
}

/// Which of the four tile shapes a block is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Spacer,
    SocialIcon,
    VideoGrid,
    Card,
}

impl Presentation {
    pub fn select(block: &Block) -> Self {
        match block.kind {
            BlockKind::Spacer => Presentation::Spacer,
            BlockKind::SocialIcon { .. } => Presentation::SocialIcon,
            _ if block.is_video_grid() => Presentation::VideoGrid,
            _ => Presentation::Card,
        }
    }
}

pub fn render_page(view: &PageView) -> String {
    let page = view.page;
    let profile = &page.profile;

    let mut desktop = String::new();
    for block in &page.blocks {
        desktop.push_str(&format!(
            "<div class=\"cell\" style=\"{}\">{}</div>\n",
            layout::desktop_grid_css(block.span, &block.placement),
            render_block(block, videos_for(view.feeds, block).as_deref())
        ));
    }

    let mut mobile = String::new();
    for block in layout::mobile_order(&page.blocks) {
        mobile.push_str(&format!(
            "<div class=\"cell\" style=\"{}\">{}</div>\n",
            layout::mobile_grid_css(block.span),
            render_block(block, videos_for(view.feeds, block).as_deref())
        ));
    }

    let analytics_script = if view.analytics {
        format!("<script>{}</script>", ANALYTICS_JS)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="theme-{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{meta}
{jsonld}
<style>{css}</style>
</head>
<body style="--accent:{accent}">
<div class="desktop">
    <aside class="profile">{desktop_header}</aside>
    <main class="grid grid-desktop" style="grid-template-columns:repeat({dcols}, 1fr)">
{desktop}    </main>
</div>
<div class="mobile">
    <header class="profile">{mobile_header}</header>
    <main class="grid grid-mobile" style="grid-template-columns:repeat({mcols}, 1fr)">
{mobile}    </main>
</div>
{branding}
<script>{tilt}</script>
<script>{app}</script>
{analytics}
</body>
</html>"#,
        theme = match profile.theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        },
        meta = seo::build_meta(profile, view.base_url),
        jsonld = seo::build_person_jsonld(page, view.base_url),
        css = CSS,
        accent = profile.accent_color(),
        desktop_header = render_header(profile, 160),
        mobile_header = render_header(profile, 96),
        dcols = layout::DESKTOP_COLUMNS,
        mcols = layout::MOBILE_COLUMNS,
        desktop = desktop,
        mobile = mobile,
        branding = render_branding(profile),
        tilt = tilt::client_script(),
        app = APP_JS,
        analytics = analytics_script,
    )
}

/// Videos to draw for a block. `None` only for a channel whose feed still
/// has to be fetched.
fn videos_for(feeds: &ChannelFeeds, block: &Block) -> Option<Vec<Video>> {
    if block.is_channel() {
        feeds.cached(block)
    } else {
        Some(Vec::new())
    }
}

fn render_header(profile: &Profile, avatar_px: u32) -> String {
    let mut html = String::new();
    if !profile.avatar_url.trim().is_empty() {
        html.push_str(&format!(
            r#"<div class="avatar" style="width:{px}px;height:{px}px;{style}"><img src="{src}" alt="{alt}"></div>"#,
            px = avatar_px,
            style = html_escape(&profile.avatar_style.css()),
            src = html_escape(&profile.avatar_url),
            alt = html_escape(&profile.name),
        ));
    }
    html.push_str(&format!(
        r#"<h1>{}</h1><p class="bio">{}</p>"#,
        html_escape(&profile.name),
        html_escape(&profile.bio)
    ));

    if profile.show_social_in_header && !profile.social_accounts.is_empty() {
        html.push_str(r#"<div class="socials">"#);
        for account in &profile.social_accounts {
            let url = account.url();
            if !is_navigable(&url) {
                continue;
            }
            let count = account
                .follower_count
                .map(|c| format!("<span>{}</span>", format_follower_count(c)))
                .unwrap_or_default();
            html.push_str(&format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" title="{}">{}{}</a>"#,
                html_escape(&url),
                html_escape(account.platform().descriptor().label),
                platform_icon(account.platform(), 18),
                count
            ));
        }
        html.push_str("</div>");
    }
    html
}

fn render_branding(profile: &Profile) -> String {
    if !profile.show_branding {
        return String::new();
    }
    format!(
        r#"<footer class="branding">Made with Bento &middot; {}</footer>"#,
        chrono::Utc::now().format("%Y")
    )
}

// ── Blocks ────────────────────────────────────────────

/// One tile as a single root element, so the browser can swap it in place
/// once a channel feed arrives. `videos` is `None` while a channel feed is
/// still outstanding.
pub fn render_block(block: &Block, videos: Option<&[Video]>) -> String {
    let pending = block.is_channel() && videos.is_none();
    let videos = videos.unwrap_or(&[]);
    match Presentation::select(block) {
        Presentation::Spacer => format!(
            r#"<div class="bento-spacer" data-block="{}" style="border-radius:{}"></div>"#,
            html_escape(&block.id),
            layout::border_radius(block.span)
        ),
        Presentation::SocialIcon => render_social_icon(block),
        Presentation::VideoGrid => render_video_grid(block, videos, pending),
        Presentation::Card => render_card(block, videos, pending),
    }
}

fn go_href(block: &Block) -> String {
    format!("/go/{}", urlencoding_simple(&block.id))
}

fn loader_attr(block: &Block, pending: bool) -> String {
    if pending {
        format!(
            r#" data-videos="/api/blocks/{}/videos""#,
            urlencoding_simple(&block.id)
        )
    } else {
        String::new()
    }
}

fn custom_background(block: &Block) -> String {
    block
        .style
        .custom_background
        .as_deref()
        .map(|bg| format!("background:{};", bg))
        .unwrap_or_default()
}

fn color_class(block: &Block) -> &str {
    block.style.color.as_deref().unwrap_or("bg-white")
}

fn render_social_icon(block: &Block) -> String {
    let BlockKind::SocialIcon { platform, .. } = &block.kind else {
        return String::new();
    };
    let style = format!(
        "border-radius:{};{}",
        layout::border_radius(block.span),
        custom_background(block)
    );
    let icon = format!(
        r#"<span style="color:{}">{}</span>"#,
        platform.descriptor().brand_color,
        platform_icon(*platform, 24)
    );
    match click_target(block) {
        Some(_) => format!(
            r#"<a class="bento-item bento-icon {cls}" data-block="{id}" href="{href}" target="_blank" rel="noopener noreferrer" style="{style}">{icon}</a>"#,
            cls = html_escape(color_class(block)),
            id = html_escape(&block.id),
            href = go_href(block),
            style = html_escape(&style),
            icon = icon,
        ),
        None => format!(
            r#"<div class="bento-item bento-icon {cls}" data-block="{id}" style="{style}">{icon}</div>"#,
            cls = html_escape(color_class(block)),
            id = html_escape(&block.id),
            style = html_escape(&style),
            icon = icon,
        ),
    }
}

fn render_video_grid(block: &Block, videos: &[Video], pending: bool) -> String {
    let channel_title = block
        .channel()
        .and_then(|c| c.title.as_deref())
        .unwrap_or("YouTube");
    let style = format!(
        "border-radius:{};{}",
        layout::border_radius(block.span),
        custom_background(block)
    );
    let go = click_target(block)
        .map(|_| format!(r#" data-go="{}""#, go_href(block)))
        .unwrap_or_default();

    let body = if pending {
        format!(r#"<div class="videos-loading">{}</div>"#, icons::SPINNER_SVG)
    } else {
        let mut grid = String::from(r#"<div class="videos">"#);
        for video in videos.iter().take(MAX_CHANNEL_VIDEOS) {
            grid.push_str(&format!(
                r#"<a class="video" href="{href}" target="_blank" rel="noopener noreferrer"><img src="{thumb}" alt="{title}" loading="lazy"><span class="video-play">{play}</span></a>"#,
                href = html_escape(&video.watch_url()),
                thumb = html_escape(&video.thumbnail),
                title = html_escape(&video.title),
                play = icons::PLAY_SVG,
            ));
        }
        grid.push_str("</div>");
        grid
    };

    format!(
        r#"<div class="bento-item bento-videos {cls}" data-block="{id}"{go}{loader} style="{style}"><div class="videos-head"><span class="yt-badge">{badge}</span><div><h3>{title}</h3><span>Latest videos</span></div></div>{body}</div>"#,
        cls = html_escape(color_class(block)),
        id = html_escape(&block.id),
        go = go,
        loader = loader_attr(block, pending),
        style = html_escape(&style),
        badge = icons::YOUTUBE_BADGE_SVG,
        title = html_escape(channel_title),
        body = body,
    )
}

fn render_card(block: &Block, videos: &[Video], pending: bool) -> String {
    let rich_video = if block.is_rich_player(videos) {
        block.active_video_id(videos)
    } else {
        None
    };
    let link_image = block.link_image();
    let text_class = block.style.text_color.as_deref().unwrap_or("text-gray-900");

    let mut classes = String::from("bento-item tilt");
    let background = if let Some(id) = rich_video {
        format!(
            "background-image:url(\"{}\");background-size:cover;background-position:center;",
            css_url(&feed::poster_url(id))
        )
    } else if let Some(img) = link_image {
        format!(
            "background-image:url(\"{}\");background-size:cover;background-position:{};",
            css_url(&img.url),
            img.position.css()
        )
    } else if block.style.custom_background.is_some() {
        custom_background(block)
    } else {
        classes.push(' ');
        classes.push_str(color_class(block));
        String::new()
    };
    classes.push(' ');
    classes.push_str(text_class);

    let style = format!(
        "{}border-radius:{};{}",
        background,
        layout::border_radius(block.span),
        TiltStyle::resting().css()
    );

    let mut inner = String::from(r#"<div class="glare"></div>"#);
    if (rich_video.is_some() || link_image.is_some())
        && (block.title().is_some() || block.subtext().is_some())
    {
        inner.push_str(r#"<div class="shade"></div>"#);
    }
    inner.push_str(r#"<div class="card-body">"#);
    inner.push_str(&match &block.kind {
        BlockKind::Media { media: Some(media), title, subtext } => {
            render_media(media, title.as_deref(), subtext.as_deref())
        }
        BlockKind::Map { title, query } => render_map(title.as_deref(), query.as_deref()),
        _ => match rich_video {
            Some(_) => render_rich_player(block),
            None => render_plain(block, text_class),
        },
    });
    inner.push_str("</div>");

    let item = format!(
        r#"<div class="{}" style="{}">{}</div>"#,
        html_escape(&classes),
        html_escape(&style),
        inner
    );
    let id = html_escape(&block.id);
    let loader = loader_attr(block, pending);
    match click_target(block) {
        Some(_) => format!(
            r#"<a class="bento-card" data-block="{}"{} href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            id,
            loader,
            go_href(block),
            item
        ),
        None => format!(
            r#"<div class="bento-card" data-block="{}"{}>{}</div>"#,
            id, loader, item
        ),
    }
}

fn render_media(media: &Image, title: Option<&str>, subtext: Option<&str>) -> String {
    let position = html_escape(&media.position.css());
    let mut html = String::from(r#"<div class="media">"#);
    if media.is_video() {
        html.push_str(&format!(
            r#"<video src="{}" class="full-img" style="object-position:{}" autoplay loop muted playsinline></video>"#,
            html_escape(&media.url),
            position
        ));
    } else {
        html.push_str(&format!(
            r#"<img src="{}" alt="{}" class="full-img" style="object-position:{}">"#,
            html_escape(&media.url),
            html_escape(title.unwrap_or("")),
            position
        ));
    }
    if let Some(title) = title {
        html.push_str(&format!(
            r#"<div class="media-overlay"><p class="media-title">{}</p>"#,
            html_escape(title)
        ));
        if let Some(sub) = subtext {
            html.push_str(&format!(r#"<p class="media-subtext">{}</p>"#, html_escape(sub)));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

pub fn map_embed_url(query: Option<&str>) -> String {
    format!(
        "https://maps.google.com/maps?q={}&t=&z=13&ie=UTF8&iwloc=&output=embed",
        urlencoding_simple(query.unwrap_or("Paris"))
    )
}

fn render_map(title: Option<&str>, query: Option<&str>) -> String {
    let mut html = format!(
        r#"<div class="map"><iframe width="100%" height="100%" src="{}" loading="lazy" sandbox="allow-scripts allow-same-origin"></iframe>"#,
        html_escape(&map_embed_url(query))
    );
    if let Some(title) = title {
        html.push_str(&format!(
            r#"<div class="map-title"><p>{}</p></div>"#,
            html_escape(title)
        ));
    }
    html.push_str("</div>");
    html
}

fn render_rich_player(block: &Block) -> String {
    let caption = block
        .channel()
        .and_then(|c| c.title.as_deref())
        .or_else(|| block.title());
    let mut html = format!(
        r#"<div class="player"><div class="play-badge">{}</div>"#,
        icons::PLAY_SVG
    );
    if let Some(caption) = caption {
        html.push_str(&format!(
            r#"<div class="player-title"><h3>{}</h3></div>"#,
            html_escape(caption)
        ));
    }
    html.push_str("</div>");
    html
}

fn render_plain(block: &Block, text_class: &str) -> String {
    let on_image = block.is_link_image();
    let mut html = String::from(r#"<div class="plain">"#);

    if let BlockKind::Social { platform: Some(platform), .. } = &block.kind {
        let chip = if text_class == "text-white" || on_image {
            "chip chip-glass"
        } else {
            "chip"
        };
        let color = if text_class == "text-brand" {
            format!(r#" style="color:{}""#, platform.descriptor().brand_color)
        } else {
            String::new()
        };
        html.push_str(&format!(
            r#"<div class="{}"{}>{}</div>"#,
            chip,
            color,
            platform_icon(*platform, 14)
        ));
    }

    let is_text = matches!(block.kind, BlockKind::Text { .. });
    html.push_str(if is_text {
        r#"<div class="plain-text">"#
    } else {
        r#"<div class="plain-foot">"#
    });
    html.push_str(&format!(
        r#"<h3{}>{}</h3>"#,
        if on_image { r#" class="on-image""# } else { "" },
        html_escape(block.title().unwrap_or(""))
    ));
    if let Some(sub) = block.subtext() {
        html.push_str(&format!(
            r#"<p class="{}">{}</p>"#,
            if on_image { "sub on-image" } else { "sub" },
            html_escape(sub)
        ));
    }
    if let BlockKind::Text { body: Some(body), .. } = &block.kind {
        html.push_str(&format!(r#"<p class="body">{}</p>"#, html_escape(body)));
    }
    html.push_str("</div></div>");
    html
}

// ── Helpers ───────────────────────────────────────────

fn css_url(s: &str) -> String {
    s.replace('\\', "%5C")
        .replace('"', "%22")
        .replace(['\n', '\r'], "")
}

pub fn urlencoding_simple(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", b));
            }
        }
    }
    result
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const CSS: &str = r#"
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;background:#f8fafc;color:#111827;min-height:100vh}
.theme-dark body{background:#0b0f19;color:#f3f4f6}
a{color:inherit;text-decoration:none}
.profile h1{font-weight:700;letter-spacing:-0.02em;margin-bottom:.5rem}
.profile .bio{color:#6b7280;font-weight:500;white-space:pre-wrap;max-width:20rem}
.avatar{overflow:hidden;background:#f3f4f6;margin-bottom:1.5rem}
.avatar img{width:100%;height:100%;object-fit:cover;display:block}
.socials{display:flex;flex-wrap:wrap;gap:.5rem;margin-top:1rem}
.socials a{display:inline-flex;align-items:center;gap:.25rem;font-size:.75rem;color:#6b7280}
.socials a:hover,.branding a:hover{color:var(--accent)}
a:focus-visible{outline:2px solid var(--accent);outline-offset:2px}
.desktop{display:none}
.desktop .profile{position:fixed;left:0;top:0;width:420px;height:100vh;display:flex;flex-direction:column;justify-content:center;align-items:flex-start;padding:0 3rem}
.desktop .profile h1{font-size:2.25rem}
.grid{display:grid}
.grid-desktop{margin-left:420px;padding:3rem;grid-auto-rows:64px;gap:8px}
.mobile .profile{padding:2rem 1rem 1rem;display:flex;flex-direction:column;align-items:center;text-align:center}
.mobile .profile h1{font-size:1.5rem;font-weight:800}
.mobile .profile .bio{font-size:.875rem}
.grid-mobile{padding:1rem;grid-auto-rows:80px;gap:12px}
@media(min-width:1024px){.desktop{display:block}.mobile{display:none}}
.cell{min-width:0;min-height:0}
.bento-spacer,.bento-card,.bento-item{display:block;height:100%;width:100%}
.bento-item{position:relative;overflow:hidden;box-shadow:0 1px 2px rgba(0,0,0,.05);outline:1px solid rgba(0,0,0,.05)}
.bento-card{cursor:pointer}
.tilt{transform-style:preserve-3d}
.bento-icon{display:flex;align-items:center;justify-content:center}
.glare{position:absolute;inset:0;pointer-events:none;z-index:30;opacity:0;transition:opacity .2s;background:radial-gradient(circle at var(--glare-x,50%) var(--glare-y,50%),rgba(255,255,255,.25) 0%,transparent 60%)}
.tilt:hover .glare{opacity:1}
.shade{position:absolute;left:0;right:0;bottom:0;height:66%;background:linear-gradient(to top,rgba(0,0,0,.7),rgba(0,0,0,.3),transparent)}
.card-body{position:relative;z-index:10;width:100%;height:100%}
.plain{padding:.75rem;height:100%;display:flex;flex-direction:column;justify-content:space-between}
.plain-foot{margin-top:auto}
.plain-text{display:flex;flex-direction:column;justify-content:center;height:100%}
.plain h3{font-weight:700;line-height:1.2}
.plain .sub{font-size:.75rem;margin-top:.25rem;opacity:.6}
.plain .body{font-size:.875rem;margin-top:.5rem;opacity:.7;white-space:pre-wrap}
.on-image{color:#fff;text-shadow:0 2px 8px rgba(0,0,0,.4)}
.plain .sub.on-image{opacity:.8}
.chip{width:1.75rem;height:1.75rem;border-radius:.5rem;display:flex;align-items:center;justify-content:center;background:#f3f4f6}
.chip-glass{background:rgba(255,255,255,.2);backdrop-filter:blur(4px)}
.media{width:100%;height:100%;position:relative;overflow:hidden}
.full-img{width:100%;height:100%;object-fit:cover;display:block}
.media-overlay{position:absolute;left:0;right:0;bottom:0;padding:.75rem;background:linear-gradient(to top,rgba(0,0,0,.6),transparent);color:#fff}
.media-title{font-size:.875rem;font-weight:600}
.media-subtext{font-size:.75rem;opacity:.8}
.map{width:100%;height:100%;position:relative;background:#f3f4f6;overflow:hidden}
.map iframe{border:0;opacity:.95;filter:grayscale(20%)}
.map-title{position:absolute;left:0;right:0;bottom:0;padding:.5rem;background:linear-gradient(to top,rgba(0,0,0,.6),transparent);color:#fff;font-weight:600;font-size:.875rem}
.player{width:100%;height:100%;position:relative}
.play-badge{position:absolute;top:50%;left:50%;width:2.5rem;height:2.5rem;margin:-1.25rem 0 0 -1.25rem;border-radius:9999px;background:#ef4444;display:flex;align-items:center;justify-content:center;box-shadow:0 10px 15px rgba(0,0,0,.2);transition:transform .2s}
.tilt:hover .play-badge{transform:scale(1.1)}
.player-title{position:absolute;left:0;right:0;bottom:0;padding:.75rem;color:#fff;font-size:.875rem;font-weight:600}
.bento-videos{display:flex;flex-direction:column;padding:.5rem;cursor:pointer}
.videos-head{display:flex;align-items:center;gap:.5rem;margin-bottom:.5rem;padding-bottom:.5rem;border-bottom:1px solid #f3f4f6}
.videos-head h3{font-size:.75rem;font-weight:700;color:#111827;white-space:nowrap;overflow:hidden;text-overflow:ellipsis}
.videos-head span{font-size:.5rem;color:#9ca3af}
.yt-badge{width:1.5rem;height:1.5rem;border-radius:.5rem;background:#dc2626;color:#fff;display:flex;align-items:center;justify-content:center}
.videos{flex:1;display:grid;grid-template-columns:repeat(2,1fr);gap:.25rem;overflow:hidden}
.video{position:relative;overflow:hidden;border-radius:.25rem;background:#f3f4f6}
.video img{width:100%;height:100%;object-fit:cover;display:block}
.video-play{position:absolute;inset:0;display:flex;align-items:center;justify-content:center;background:rgba(0,0,0,.2);opacity:0;transition:opacity .2s}
.video:hover .video-play{opacity:1}
.videos-loading{flex:1;display:flex;align-items:center;justify-content:center;color:var(--accent,#d1d5db)}
.spin{animation:spin 1s linear infinite}
@keyframes spin{to{transform:rotate(360deg)}}
.branding{text-align:center;font-size:.75rem;color:#9ca3af;padding:2rem 0}
.bg-white{background:#fff}.bg-gray-50{background:#f9fafb}.bg-gray-100{background:#f3f4f6}.bg-gray-900{background:#111827}.bg-black{background:#000}
.bg-blue-500{background:#3b82f6}.bg-red-500{background:#ef4444}.bg-green-500{background:#22c55e}.bg-yellow-400{background:#facc15}.bg-purple-500{background:#a855f7}.bg-pink-500{background:#ec4899}
.text-gray-900{color:#111827}.text-white{color:#fff}.text-black{color:#000}.text-brand{color:#111827}
"#;

/// Click delegation for tiles that hold their own links, and the one-shot
/// loader that swaps channel tiles in once their feed arrives.
const APP_JS: &str = r#"(function(){
document.addEventListener('click',function(e){
    if(e.target.closest('a'))return;
    var el=e.target.closest('[data-go]');
    if(el)window.open(el.getAttribute('data-go'),'_blank','noopener,noreferrer');
});
var seen={};
document.querySelectorAll('[data-videos]').forEach(function(el){
    var url=el.getAttribute('data-videos');
    if(seen[url])return;
    seen[url]=true;
    var matching=function(){
        return Array.prototype.filter.call(document.querySelectorAll('[data-videos]'),function(n){
            return n.getAttribute('data-videos')===url;
        });
    };
    fetch(url).then(function(r){
        if(!r.ok)throw new Error(r.status);
        return r.json();
    }).then(function(d){
        matching().forEach(function(n){
            if(!n.isConnected)return;
            var t=document.createElement('template');
            t.innerHTML=d.html;
            var fresh=t.content.firstElementChild;
            if(fresh)n.replaceWith(fresh);
        });
        if(window.bentoTilt)window.bentoTilt(document);
    }).catch(function(){
        matching().forEach(function(n){
            n.removeAttribute('data-videos');
            n.querySelectorAll('.spin').forEach(function(s){s.remove();});
        });
    });
});
})();"#;

/// Browser half of page-view tracking: collects what only the client knows
/// and hands it to `/api/track`.
const ANALYTICS_JS: &str = r#"(function(){
var q=new URLSearchParams(window.location.search);
var u=function(k){return q.get(k)||undefined;};
var payload={
    event:'page_view',
    pageUrl:window.location.href,
    referrer:document.referrer||undefined,
    utm:{source:u('utm_source'),medium:u('utm_medium'),campaign:u('utm_campaign'),term:u('utm_term'),content:u('utm_content')},
    language:navigator.language,
    screenW:window.screen&&window.screen.width,
    screenH:window.screen&&window.screen.height
};
fetch('/api/track',{method:'POST',headers:{'Content-Type':'application/json'},body:JSON.stringify(payload),keepalive:true}).catch(function(){});
})();"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::BlockRecord;

    fn block(json: &str) -> Block {
        let rec: BlockRecord = serde_json::from_str(json).unwrap();
        Block::try_from(rec).unwrap()
    }

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {}", id),
            thumbnail: feed::thumbnail_url(id),
        }
    }

    #[test]
    fn presentation_precedence() {
        let spacer = block(r#"{"id":"s","type":"SPACER"}"#);
        let icon = block(r#"{"id":"i","type":"SOCIAL_ICON","socialPlatform":"github","socialHandle":"octocat"}"#);
        let grid = block(r#"{"id":"g","type":"SOCIAL","channelId":"UC1","youtubeMode":"grid"}"#);
        let single = block(r#"{"id":"c","type":"SOCIAL","channelId":"UC1"}"#);
        let link = block(r#"{"id":"l","type":"LINK","content":"https://example.com"}"#);
        assert_eq!(Presentation::select(&spacer), Presentation::Spacer);
        assert_eq!(Presentation::select(&icon), Presentation::SocialIcon);
        assert_eq!(Presentation::select(&grid), Presentation::VideoGrid);
        assert_eq!(Presentation::select(&single), Presentation::Card);
        assert_eq!(Presentation::select(&link), Presentation::Card);
    }

    #[test]
    fn only_navigable_blocks_become_links() {
        let ok = block(r#"{"id":"ok","type":"LINK","title":"Site","content":"https://example.com"}"#);
        let html = render_block(&ok, Some(&[]));
        assert!(html.starts_with(r#"<a class="bento-card""#));
        assert!(html.contains(r#"href="/go/ok""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));

        let bad = block(r#"{"id":"bad","type":"LINK","title":"X","content":"javascript:alert(1)"}"#);
        let html = render_block(&bad, Some(&[]));
        assert!(html.starts_with(r#"<div class="bento-card""#));
        assert!(!html.contains("href="));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn pending_grid_shows_spinner_then_thumbnails() {
        let grid = block(r#"{"id":"g","type":"SOCIAL","channelId":"UC1","channelTitle":"My channel","youtubeMode":"grid"}"#);
        let pending = render_block(&grid, None);
        assert!(pending.contains(r#"data-videos="/api/blocks/g/videos""#));
        assert!(pending.contains(r#"class="spin""#));
        assert!(pending.contains("My channel"));
        assert!(pending.contains("Latest videos"));

        let vids: Vec<Video> = ["a", "b", "c", "d"].iter().map(|id| video(id)).collect();
        let loaded = render_block(&grid, Some(&vids));
        assert!(!loaded.contains("data-videos"));
        assert!(!loaded.contains(r#"class="spin""#));
        assert_eq!(loaded.matches("https://youtube.com/watch?v=").count(), 4);
        assert!(loaded.contains("img.youtube.com/vi/a/mqdefault.jpg"));
    }

    #[test]
    fn empty_feed_clears_loading() {
        let grid = block(r#"{"id":"g","type":"SOCIAL","channelId":"UC1","youtubeMode":"list"}"#);
        let html = render_block(&grid, Some(&[]));
        assert!(!html.contains("spin"));
        assert!(html.contains(">YouTube<"));
        assert!(html.contains(r#"<div class="videos"></div>"#));
    }

    #[test]
    fn rich_player_uses_poster_of_first_video() {
        let single = block(r#"{"id":"c","type":"SOCIAL","title":"Channel","channelId":"UC1"}"#);
        let vids = vec![video("xyz"), video("abc")];
        let html = render_block(&single, Some(&vids));
        assert!(html.contains("img.youtube.com/vi/xyz/maxresdefault.jpg"));
        assert!(html.contains(r#"class="play-badge""#));
        assert!(html.contains(r#"href="/go/c""#));

        // No active video yet: plain card.
        let html = render_block(&single, Some(&[]));
        assert!(!html.contains("play-badge"));
    }

    #[test]
    fn link_image_sits_at_focal_point() {
        let b = block(r#"{"id":"l","type":"LINK","title":"Shop","content":"https://example.com","imageUrl":"/assets/shop.jpg","mediaPosition":{"x":20,"y":80}}"#);
        let html = render_block(&b, Some(&[]));
        assert!(html.contains("background-position:20% 80%"));
        assert!(html.contains(r#"class="shade""#));
        assert!(html.contains(r#"<h3 class="on-image">Shop</h3>"#));
        assert!(!html.contains("bg-white"));
    }

    #[test]
    fn media_video_and_image() {
        let v = block(r#"{"id":"m","type":"MEDIA","imageUrl":"/assets/clip.MP4"}"#);
        assert!(render_block(&v, Some(&[])).contains("<video src=\"/assets/clip.MP4\""));
        let i = block(r#"{"id":"m","type":"MEDIA","title":"Hi","imageUrl":"/assets/a.png"}"#);
        let html = render_block(&i, Some(&[]));
        assert!(html.contains("<img src=\"/assets/a.png\" alt=\"Hi\""));
        assert!(html.contains("media-overlay"));
    }

    #[test]
    fn map_defaults_to_paris() {
        assert!(map_embed_url(None).contains("q=Paris&t=&z=13"));
        assert!(map_embed_url(Some("Lyon, France")).contains("q=Lyon%2C%20France&"));
        let b = block(r#"{"id":"map","type":"MAP","content":"Nantes"}"#);
        let html = render_block(&b, Some(&[]));
        assert!(html.contains("maps.google.com/maps?q=Nantes&amp;t=&amp;z=13"));
        assert!(!html.contains("href="));
    }

    #[test]
    fn social_chip_takes_brand_color() {
        let b = block(r#"{"id":"s","type":"SOCIAL","title":"GitHub","socialPlatform":"github","socialHandle":"octocat","textColor":"text-brand"}"#);
        let html = render_block(&b, Some(&[]));
        assert!(html.contains(r#"<div class="chip" style="color:#181717">"#));

        let w = block(r#"{"id":"s","type":"SOCIAL","title":"GitHub","socialPlatform":"github","textColor":"text-white"}"#);
        assert!(render_block(&w, Some(&[])).contains("chip chip-glass"));
    }

    #[test]
    fn text_is_escaped() {
        let b = block(r#"{"id":"t","type":"TEXT","title":"<b>hi</b>","content":"a & b"}"#);
        let html = render_block(&b, Some(&[]));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn spacer_is_an_empty_cell() {
        let b = block(r#"{"id":"sp","type":"SPACER","colSpan":3,"rowSpan":2}"#);
        let html = render_block(&b, None);
        assert_eq!(
            html,
            r#"<div class="bento-spacer" data-block="sp" style="border-radius:0.625rem"></div>"#
        );
    }
}
