// src/feed/normalize.rs
//! Canonicalization of raw feed items. The upstream changes shape often:
//! fields sometimes sit one level down under a `content` wrapper, and the
//! article URL arrives under either of two sub-objects. Everything downstream
//! sees only the `Headline` produced here.

use serde_json::Value;

pub const NO_TITLE: &str = "No Title";
pub const NO_LINK: &str = "No Link";
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Canonical form of one raw feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub link: String,
    pub publisher: String,
    pub published: String,
}

/// Extract a `Headline` from a raw item. Never fails: every field access
/// is defaulted, so malformed input degrades to placeholders.
pub fn extract_headline(raw: &Value) -> Headline {
    // Unwrap the optional `content` box.
    let data = raw.get("content").filter(|v| v.is_object()).unwrap_or(raw);

    let title = data
        .get("title")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(normalize_title)
        .unwrap_or_else(|| NO_TITLE.to_string());

    // URL lives under `clickThroughUrl` or `canonicalUrl`, checked in order.
    let link = ["clickThroughUrl", "canonicalUrl"]
        .iter()
        .find_map(|k| {
            data.get(*k)
                .and_then(|o| o.get("url"))
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| NO_LINK.to_string());

    let publisher = data
        .get("provider")
        .and_then(|p| p.get("displayName"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string());

    let published = data
        .get("pubDate")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    Headline {
        title,
        link,
        publisher,
        published,
    }
}

/// Normalize headline text: decode entities, strip tags, collapse whitespace.
/// The title doubles as a dedup key on the hosted backend, so this must be
/// deterministic.
pub fn normalize_title(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}
