//! Federated video search: relevance query, normalized retry, then a
//! title filter over the recent-activity mirror.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::app::Result;
use crate::catalog::mirror::{filter_by_title, RecentMirror};
use crate::catalog::{CatalogApi, SearchOrder};
use crate::domain::video::retain_unique_ids;
use crate::domain::VideoSummary;
use crate::fallback::try_first_non_empty;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass<'q> {
    Remote(&'q str),
    Mirror(&'q str),
}

/// Typographic quotes folded to ASCII and whitespace collapsed.
pub fn normalize_query(query: &str) -> String {
    let folded: String = query
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{00B4}' | '\u{0060}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}' | '\u{00BB}' => '"',
            other => other,
        })
        .collect();
    WHITESPACE.replace_all(folded.trim(), " ").into_owned()
}

/// Run the three search passes, stopping at the first with results.
/// Only configuration errors escape; a failing remote pass counts as empty.
pub async fn federated_search(
    api: &dyn CatalogApi,
    mirror: &RecentMirror,
    channel_id: &str,
    query: &str,
    max: usize,
) -> Result<Vec<VideoSummary>> {
    let raw = query.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let normalized = normalize_query(raw);
    let passes = [Pass::Remote(raw), Pass::Remote(&normalized), Pass::Mirror(&normalized)];

    let mut videos = try_first_non_empty(passes.into_iter().enumerate(), |(index, pass)| async move {
        let found = match pass {
            Pass::Remote(q) => match api.search(channel_id, q, max, SearchOrder::Relevance).await {
                Ok(found) => found,
                Err(e) if e.is_configuration() => return Err(e),
                Err(e) => {
                    warn!(pass = index + 1, error = %e, "Remote search failed");
                    Vec::new()
                }
            },
            Pass::Mirror(q) => filter_by_title(mirror.fetch().await, q, max),
        };
        debug!(pass = index + 1, found = found.len(), "Search pass");
        Ok(found)
    })
    .await?;

    retain_unique_ids(&mut videos);
    videos.truncate(max);
    Ok(videos)
}
