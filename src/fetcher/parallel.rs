use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::fetcher::{fetch_feed, Fetcher};

pub const DEFAULT_WORKERS: usize = 8;

/// Bounded fan-out whose output keeps the input order, so merged results
/// never depend on which request finished first.
#[derive(Clone)]
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    workers: usize,
}

impl ParallelFetcher {
    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
        }
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher + Send + Sync> {
        &self.fetcher
    }

    /// Run `task` over every input with at most `workers` in flight.
    pub async fn run_ordered<I, T, F, Fut>(&self, inputs: I, task: F) -> Vec<T>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        stream::iter(inputs)
            .map(task)
            .buffered(self.workers)
            .collect()
            .await
    }

    /// Fetch every feed URL; unavailable ones yield `None` in place.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<(String, Option<String>)> {
        self.run_ordered(urls.iter(), |url| {
            let fetcher = self.fetcher.clone();
            async move {
                let body = fetch_feed(fetcher.as_ref(), url).await;
                (url.clone(), body)
            }
        })
        .await
    }
}
