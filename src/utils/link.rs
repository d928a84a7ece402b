// src/utils/link.rs

//! Link normalization.

use url::Url;

/// Resolve a potentially relative href against a base URL.
///
/// Absolute http(s) hrefs come back unchanged.
/// Returns `None` for an empty href or one that cannot be joined.
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(href) {
        if matches!(url.scheme(), "http" | "https") {
            return Some(href.to_string());
        }
    }
    base.join(href).ok().map(|u| u.to_string())
}
