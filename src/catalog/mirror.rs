use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::domain::video::retain_unique_ids;
use crate::domain::VideoSummary;
use crate::fetcher::{fetch_feed, Fetcher};
use crate::normalizer::{Block, blocks, capture, clean_text, element, parse_timestamp, plain_text};

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| element("yt:videoId"));
static ENTRY_ID: LazyLock<Regex> = LazyLock::new(|| element("id"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| element("title"));
static PUBLISHED: LazyLock<Regex> = LazyLock::new(|| element("published"));
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| element("media:description"));
static THUMBNAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<media:thumbnail\b[^>]*?url\s*=\s*["']([^"']+)["']"#)
        .expect("static pattern is valid")
});

/// The channel's public recent-activity feed: a short, credential-free
/// list of the newest uploads.
pub struct RecentMirror {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    url: String,
}

impl RecentMirror {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, url: String) -> Self {
        Self { fetcher, url }
    }

    /// Newest-first videos, or nothing when the feed is unavailable.
    pub async fn fetch(&self) -> Vec<VideoSummary> {
        let Some(raw) = fetch_feed(self.fetcher.as_ref(), &self.url).await else {
            return Vec::new();
        };
        let videos = parse_mirror(&raw);
        debug!(url = %self.url, count = videos.len(), "Recent mirror read");
        videos
    }
}

pub fn parse_mirror(raw: &str) -> Vec<VideoSummary> {
    let mut videos: Vec<VideoSummary> = blocks(raw, Block::Entry)
        .into_iter()
        .filter_map(|block| {
            let id = capture(block, &VIDEO_ID)
                .map(clean_text)
                .or_else(|| {
                    capture(block, &ENTRY_ID)
                        .map(clean_text)
                        .and_then(|id| id.strip_prefix("yt:video:").map(String::from))
                })
                .filter(|id| !id.is_empty())?;
            let title = capture(block, &TITLE).map(clean_text).unwrap_or_default();

            let mut video = VideoSummary::new(id, title);
            video.published_at = capture(block, &PUBLISHED).and_then(parse_timestamp);
            video.thumbnail_url = capture(block, &THUMBNAIL).map(clean_text);
            video.description = capture(block, &DESCRIPTION)
                .map(plain_text)
                .filter(|d| !d.is_empty());
            Some(video)
        })
        .collect();

    retain_unique_ids(&mut videos);
    videos
}

/// Mirror videos whose title contains `query`, case-insensitively.
pub fn filter_by_title(videos: Vec<VideoSummary>, query: &str, max: usize) -> Vec<VideoSummary> {
    let needle = query.to_lowercase();
    videos
        .into_iter()
        .filter(|v| v.title.to_lowercase().contains(&needle))
        .take(max)
        .collect()
}
