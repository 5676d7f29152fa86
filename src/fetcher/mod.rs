pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::app::Result;

/// What the caller expects back, used to pick the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Item or entry syndication markup.
    Feed,
    /// Catalog API responses.
    Json,
}

#[async_trait]
pub trait Fetcher {
    /// GET `url` and return the body. Non-success statuses are errors.
    async fn fetch(&self, url: &str, kind: ContentKind) -> Result<String>;
}

/// GET a feed, collapsing every failure to `None`.
pub async fn fetch_feed(fetcher: &(dyn Fetcher + Send + Sync), url: &str) -> Option<String> {
    match fetcher.fetch(url, ContentKind::Feed).await {
        Ok(body) => {
            debug!(url, bytes = body.len(), "Fetched feed");
            Some(body)
        }
        Err(e) => {
            warn!(url, error = %e, "Feed unavailable");
            None
        }
    }
}
