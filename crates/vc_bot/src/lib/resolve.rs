//! # Identifier resolution
//!
//! Every place that digs an identifier out of a URL or scraped markup goes
//! through a [`Resolver`]: an ordered list of named strategies, each of which
//! either matches or passes. The first match wins.

use std::sync::LazyLock;

use regex::Regex;
use transcript_store::VideoId;

/// A single matcher. Returns the extracted identifier or `None`.
pub type Strategy = fn(&str) -> Option<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub strategy: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    strategies: Vec<(&'static str, Strategy)>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, name: &'static str, strategy: Strategy) -> Self {
        self.strategies.push((name, strategy));
        self
    }

    pub fn strategy_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|(name, _)| *name)
    }

    pub fn resolve(&self, input: &str) -> Option<Resolved> {
        self.strategies.iter().find_map(|(name, strategy)| {
            strategy(input).map(|value| Resolved {
                strategy: *name,
                value,
            })
        })
    }
}

static QUERY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[?&#])v=([A-Za-z0-9_-]{11})(?:[&#]|$)").unwrap());
static SHORT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([A-Za-z0-9_-]{11})(?:[/?&#]|$)").unwrap());
static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/embed/([A-Za-z0-9_-]{11})(?:[/?&#]|$)").unwrap());
static SHORTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/shorts/([A-Za-z0-9_-]{11})(?:[/?&#]|$)").unwrap());
static SCHEME_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^/]*").unwrap());

static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""channelId"\s*:\s*"(UC[A-Za-z0-9_-]{22})""#).unwrap());
static BROWSE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""browseId"\s*:\s*"(UC[A-Za-z0-9_-]{22})""#).unwrap());
static CANONICAL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<link\s+rel="canonical"\s+href="https?://(?:www\.|m\.)?youtube\.com/channel/(UC[A-Za-z0-9_-]{22})""#,
    )
    .unwrap()
});
static CHANNEL_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/channel/(UC[A-Za-z0-9_-]{22})(?:[/?#]|$)").unwrap());

fn first_capture(re: &Regex, input: &str) -> Option<String> {
    re.captures(input)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

fn query_param(url: &str) -> Option<String> {
    first_capture(&QUERY_PARAM_RE, url)
}

fn short_link(url: &str) -> Option<String> {
    first_capture(&SHORT_LINK_RE, url)
}

fn embed_path(url: &str) -> Option<String> {
    first_capture(&EMBED_RE, url)
}

fn shorts_path(url: &str) -> Option<String> {
    first_capture(&SHORTS_RE, url)
}

/// Last resort: any path segment that is itself a well-formed id.
fn path_segment(url: &str) -> Option<String> {
    let path = SCHEME_HOST_RE.replace(url, "");
    let path = path.split(['?', '#']).next().unwrap_or_default();

    path.split('/')
        .find_map(VideoId::parse)
        .map(|id| id.as_str().to_string())
}

fn channel_id_key(html: &str) -> Option<String> {
    first_capture(&CHANNEL_ID_RE, html)
}

fn browse_id_key(html: &str) -> Option<String> {
    first_capture(&BROWSE_ID_RE, html)
}

fn canonical_link(html: &str) -> Option<String> {
    first_capture(&CANONICAL_LINK_RE, html)
}

static VIDEO_ID_RESOLVER: LazyLock<Resolver> = LazyLock::new(|| {
    Resolver::new()
        .with_strategy("query_param", query_param)
        .with_strategy("short_link", short_link)
        .with_strategy("embed", embed_path)
        .with_strategy("shorts", shorts_path)
        .with_strategy("path_segment", path_segment)
});

static CHANNEL_ID_RESOLVER: LazyLock<Resolver> = LazyLock::new(|| {
    Resolver::new()
        .with_strategy("channelId", channel_id_key)
        .with_strategy("browseId", browse_id_key)
        .with_strategy("canonical_link", canonical_link)
});

pub fn video_id_resolver() -> &'static Resolver {
    &VIDEO_ID_RESOLVER
}

pub fn channel_id_resolver() -> &'static Resolver {
    &CHANNEL_ID_RESOLVER
}

/// Pulls the 11 character video id out of any of the usual YouTube URL shapes.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    video_id_resolver()
        .resolve(url.trim())
        .and_then(|resolved| VideoId::parse(&resolved.value))
}

/// Finds the canonical `UC…` channel id in a fetched channel page.
pub fn resolve_channel_id(html: &str) -> Option<String> {
    channel_id_resolver().resolve(html).map(|resolved| {
        tracing::debug!(strategy = resolved.strategy, "Resolved channel id");
        resolved.value
    })
}

/// Channel id carried directly by a `/channel/UC…` URL, no fetch needed.
pub fn channel_id_from_url(url: &str) -> Option<String> {
    first_capture(&CHANNEL_URL_RE, url.trim())
}

/// Accepts `@handle`, a bare `handle`, `youtube.com/@handle` or full URLs.
pub fn normalize_channel_locator(locator: &str) -> String {
    let locator = locator.trim();

    if locator.starts_with('@') {
        format!("https://www.youtube.com/{locator}")
    } else if !locator.contains(['/', '.']) {
        format!("https://www.youtube.com/@{locator}")
    } else if locator.starts_with("http://") || locator.starts_with("https://") {
        locator.to_string()
    } else {
        format!("https://{locator}")
    }
}
