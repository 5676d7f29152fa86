use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A video as listed by the catalog. Detail fields stay `None` until
/// [`VideoSummary::enrich`] runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_live: bool,
    pub description: Option<String>,
    pub view_count: Option<u64>,
    /// ISO 8601 duration as reported upstream, e.g. `PT12M3S`.
    pub duration: Option<String>,
}

impl VideoSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            thumbnail_url: None,
            published_at: None,
            is_live: false,
            description: None,
            view_count: None,
            duration: None,
        }
    }

    pub fn enrich(&mut self, details: &VideoDetails) {
        if details.description.is_some() {
            self.description = details.description.clone();
        }
        if details.view_count.is_some() {
            self.view_count = details.view_count;
        }
        if details.duration.is_some() {
            self.duration = details.duration.clone();
        }
        if self.thumbnail_url.is_none() {
            self.thumbnail_url = details.thumbnail_url.clone();
        }
        self.is_live = self.is_live || details.is_live;
    }
}

/// Secondary attributes only available from the batch detail lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub description: Option<String>,
    pub view_count: Option<u64>,
    pub duration: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_live: bool,
    pub live_start: Option<DateTime<Utc>>,
}

/// One page of the channel's uploads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoPage {
    /// 1-based page index; `None` when resumed from a token.
    pub page: Option<usize>,
    pub videos: Vec<VideoSummary>,
    pub has_next_page: bool,
    /// URL-safe continuation token for the batch after the last one read.
    /// There is no previous-page token; earlier pages are re-walked.
    pub next_token: Option<String>,
}

/// Drop entries with an empty id and keep the first of any duplicate id.
pub fn retain_unique_ids(videos: &mut Vec<VideoSummary>) {
    let mut seen = HashSet::new();
    videos.retain(|v| !v.id.is_empty() && seen.insert(v.id.clone()));
}
