//! Canonical link resolution for feed items.

use url::Url;

/// Query parameters that carry the real target of a redirect link.
const EMBEDDED_URL_PARAMS: &[&str] = &["url", "u"];

/// Query parameters that never change what a link points at.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "ocid", "cmpid", "ref", "src"];

/// Return the URL embedded in an aggregator redirect link, or the input
/// unchanged. Never fails.
pub fn unwrap_link(link: &str) -> String {
    let Ok(url) = Url::parse(link.trim()) else {
        return link.to_string();
    };

    for (key, value) in url.query_pairs() {
        let key: &str = &key;
        if EMBEDDED_URL_PARAMS.contains(&key) && is_absolute_http(&value) {
            return value.into_owned();
        }
    }

    link.to_string()
}

/// Deduplication key: unwrapped, without tracking parameters or fragment.
pub fn canonical_key(link: &str) -> String {
    let unwrapped = unwrap_link(link);
    let Ok(mut url) = Url::parse(unwrapped.trim()) else {
        return unwrapped.trim().to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.set_fragment(None);

    url.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

fn is_absolute_http(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}
