//! Video link rewriting

use std::sync::LazyLock;

use regex::Regex;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

static WATCH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.|m\.|music\.)?youtube\.com/watch/?\?(?:[^#]*&)?v=([A-Za-z0-9_-]+)")
        .expect("valid watch url regex")
});

static SHORT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?youtu\.be/([A-Za-z0-9_-]+)").expect("valid short url regex")
});

static PATH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.|m\.)?youtube(?:-nocookie)?\.com/(?:shorts|embed|live|v)/([A-Za-z0-9_-]+)")
        .expect("valid path url regex")
});

/// Rewrite a YouTube link to its embeddable form
///
/// Query strings and fragments are dropped. Anything that is not a
/// recognized video link comes back unchanged.
pub fn to_embed_url(url: &str) -> String {
    let trimmed = url.trim();
    [&*WATCH_URL, &*SHORT_URL, &*PATH_URL]
        .iter()
        .find_map(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|id| format!("{EMBED_BASE}{}", id.as_str()))
        .unwrap_or_else(|| url.to_string())
}
