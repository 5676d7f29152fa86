use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A headline pulled from one of the configured feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
    pub excerpt: Option<String>,
}

impl NewsItem {
    /// Returns `None` unless both title and link are non-empty.
    pub fn new(title: &str, link: &str, source: &str) -> Option<Self> {
        let title = title.trim();
        let link = link.trim();
        if title.is_empty() || link.is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            link: link.to_string(),
            published_at: None,
            source: source.to_string(),
            excerpt: None,
        })
    }

    /// Case-insensitive match against title and excerpt. `needle` must
    /// already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        let haystack = format!("{} {}", self.title, self.excerpt.as_deref().unwrap_or(""));
        haystack.to_lowercase().contains(needle)
    }
}

/// Newest first, undated items last. Stable, so ties keep input order.
pub fn sort_by_recency(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
