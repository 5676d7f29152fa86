use serde::{Deserialize, Serialize};

use crate::app::{PaddockError, Result};

/// Settings for the video catalog API and its recent-activity mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API key; catalog calls fail with a configuration error without it.
    pub api_key: Option<String>,

    /// Channel whose uploads are listed and searched.
    pub channel_id: Option<String>,

    /// Root of the catalog REST API.
    pub base_url: String,

    /// Public recent-activity feed; `{channel_id}` is substituted.
    pub mirror_url_template: String,

    /// Videos per page handed to callers (default: 18)
    pub page_size: usize,

    /// Items requested per upstream listing call (default: 50, upstream max)
    pub batch_size: usize,

    /// Ids per detail lookup call (default: 50, upstream max)
    pub details_batch: usize,

    /// Upper bound for a single search call (default: 50)
    pub search_max: usize,

    /// Cap for a full walk of the uploads collection (default: 1000)
    pub upload_id_limit: usize,
}

pub const UPSTREAM_MAX_BATCH: usize = 50;

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            channel_id: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            mirror_url_template: "https://www.youtube.com/feeds/videos.xml?channel_id={channel_id}"
                .to_string(),
            page_size: 18,
            batch_size: UPSTREAM_MAX_BATCH,
            details_batch: UPSTREAM_MAX_BATCH,
            search_max: UPSTREAM_MAX_BATCH,
            upload_id_limit: 1000,
        }
    }
}

impl CatalogConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(PaddockError::MissingCredential("catalog.api_key is not set"))
    }

    pub fn require_channel_id(&self) -> Result<&str> {
        self.channel_id
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PaddockError::Config("catalog.channel_id is not set".into()))
    }

    pub fn mirror_url(&self) -> Result<String> {
        let channel_id = self.require_channel_id()?;
        Ok(self.mirror_url_template.replace("{channel_id}", channel_id))
    }

    /// Page size clamped to at least one item.
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Listing batch, never smaller than a page and never above the upstream max.
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .clamp(1, UPSTREAM_MAX_BATCH)
            .max(self.page_size().min(UPSTREAM_MAX_BATCH))
    }

    pub fn details_batch(&self) -> usize {
        self.details_batch.clamp(1, UPSTREAM_MAX_BATCH)
    }
}

/// Settings shared by every outbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Identity sent as the User-Agent header
    pub user_agent: String,

    /// Concurrent source fetches (default: 8)
    pub workers: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (compatible; PaddockBot/1.0)".to_string(),
            workers: crate::fetcher::parallel::DEFAULT_WORKERS,
        }
    }
}
