use std::sync::Arc;

use tracing::debug;

use crate::domain::{Endpoint, NewsItem, SourceDescriptor};
use crate::fallback::first_non_empty;
use crate::fetcher::{fetch_feed, Fetcher};
use crate::normalizer::link::unwrap_link;
use crate::normalizer::Normalizer;

/// Walks a source's endpoints until one yields items.
#[derive(Clone)]
pub struct FallbackChain {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
}

impl FallbackChain {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, normalizer: Normalizer) -> Self {
        Self { fetcher, normalizer }
    }

    /// Items from the first endpoint that produces any after filtering.
    /// An exhausted chain is an empty list, not an error.
    pub async fn run(&self, source: &SourceDescriptor) -> Vec<NewsItem> {
        let items = first_non_empty(source.endpoints.iter().enumerate(), |(index, endpoint)| {
            self.attempt(source, index, endpoint)
        })
        .await;

        if items.is_empty() {
            debug!(source = %source.name, "All endpoints exhausted");
        }
        items
    }

    async fn attempt(&self, source: &SourceDescriptor, index: usize, endpoint: &Endpoint) -> Vec<NewsItem> {
        let Some(raw) = fetch_feed(self.fetcher.as_ref(), &endpoint.url).await else {
            return Vec::new();
        };

        let mut items = self.normalizer.normalize(&raw, endpoint.format, &source.name);
        let parsed = items.len();

        if endpoint.unwrap_links {
            for item in &mut items {
                item.link = unwrap_link(&item.link);
            }
        }
        if endpoint.filter_domain {
            items.retain(|item| source.owns_link(&item.link));
        }

        debug!(
            source = %source.name,
            endpoint = index,
            url = %endpoint.url,
            parsed,
            kept = items.len(),
            "Endpoint attempted"
        );
        items
    }
}
