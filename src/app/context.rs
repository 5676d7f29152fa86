use std::sync::Arc;

use crate::app::Result;
use crate::catalog::{VideoCatalog, YouTubeApi};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::Fetcher;
use crate::news::NewsAggregator;

/// Wires the fetcher, news aggregation and video catalog from one
/// [`Config`] value.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub news: NewsAggregator,
    pub catalog: VideoCatalog,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.http)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), config.http.workers);
        let news = NewsAggregator::new(parallel, config.news.clone());

        let api = Arc::new(YouTubeApi::new(fetcher.clone(), &config.catalog));
        let catalog = VideoCatalog::new(api, fetcher.clone(), config.catalog.clone());

        Self {
            config,
            fetcher,
            news,
            catalog,
        }
    }
}
