//! News aggregation: per-source fallback chains fanned out concurrently,
//! then merged, filtered, deduplicated and ranked.

pub mod chain;

use std::collections::HashSet;

use tracing::info;

pub use chain::FallbackChain;

use crate::config::NewsConfig;
use crate::domain::news::sort_by_recency;
use crate::domain::source::link_on_domains;
use crate::domain::{FeedFormat, NewsItem};
use crate::fetcher::parallel::ParallelFetcher;
use crate::normalizer::link::canonical_key;
use crate::normalizer::Normalizer;

pub struct NewsAggregator {
    parallel: ParallelFetcher,
    chain: FallbackChain,
    normalizer: Normalizer,
    config: NewsConfig,
}

impl NewsAggregator {
    pub fn new(parallel: ParallelFetcher, config: NewsConfig) -> Self {
        let normalizer = Normalizer::new(config.excerpt_chars);
        let chain = FallbackChain::new(parallel.fetcher().clone(), normalizer.clone());
        Self {
            parallel,
            chain,
            normalizer,
            config,
        }
    }

    /// Latest headlines across every configured source, newest first.
    pub async fn get_news(&self, limit: usize) -> Vec<NewsItem> {
        let per_source = self
            .parallel
            .run_ordered(self.config.sources.iter(), |source| self.chain.run(source))
            .await;

        for (source, items) in self.config.sources.iter().zip(&per_source) {
            info!(source = %source.name, count = items.len(), "Source collected");
        }

        let merged: Vec<NewsItem> = per_source.into_iter().flatten().collect();
        rank(merged, &self.config.known_domains(), limit)
    }

    /// Headlines from the search feeds whose title or excerpt contains
    /// `query`, newest first.
    pub async fn search_news(&self, query: &str, limit: usize) -> Vec<NewsItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let urls: Vec<String> = self.config.search_feeds.iter().map(|f| f.url.clone()).collect();
        let bodies = self.parallel.fetch_all(&urls).await;

        let mut matches: Vec<NewsItem> = self
            .config
            .search_feeds
            .iter()
            .zip(bodies)
            .filter_map(|(feed, (_, body))| body.map(|raw| (feed, raw)))
            .flat_map(|(feed, raw)| self.normalizer.normalize(&raw, FeedFormat::Auto, &feed.name))
            .filter(|item| item.matches(&needle))
            .collect();

        sort_by_recency(&mut matches);
        matches.truncate(limit);
        info!(query, count = matches.len(), "News search finished");
        matches
    }
}

/// Keep items on `domains`, drop later duplicates of a canonical link,
/// order newest first and cap at `limit`.
pub fn rank(items: Vec<NewsItem>, domains: &[String], limit: usize) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| link_on_domains(&item.link, domains))
        .filter(|item| seen.insert(canonical_key(&item.link)))
        .collect();

    sort_by_recency(&mut ranked);
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::config::SearchFeed;
    use crate::domain::{Endpoint, SourceDescriptor};
    use crate::fetcher::testing::StaticFetcher;

    fn item(link: &str, date: Option<(i32, u32, u32)>) -> NewsItem {
        let mut item = NewsItem::new("Story", link, "Test").unwrap();
        item.published_at = date.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
        item
    }

    fn domains() -> Vec<String> {
        vec!["planetf1.com".into(), "racingnews365.com".into()]
    }

    #[test]
    fn test_rank_dedups_tracking_variants() {
        let items = vec![
            item("https://www.planetf1.com/news/a?utm_source=rss", Some((2024, 1, 1))),
            item("https://www.planetf1.com/news/a?utm_source=gn&fbclid=9", Some((2024, 2, 1))),
        ];
        let ranked = rank(items, &domains(), 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].link, "https://www.planetf1.com/news/a?utm_source=rss");
    }

    #[test]
    fn test_rank_orders_by_recency() {
        let items = vec![
            item("https://www.planetf1.com/jan", Some((2024, 1, 1))),
            item("https://www.planetf1.com/mar", Some((2024, 3, 1))),
            item("https://www.planetf1.com/none", None),
        ];
        let ranked = rank(items, &domains(), 10);
        let links: Vec<_> = ranked.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://www.planetf1.com/mar",
                "https://www.planetf1.com/jan",
                "https://www.planetf1.com/none",
            ]
        );
    }

    #[test]
    fn test_rank_filters_foreign_domains_and_limits() {
        let items = vec![
            item("https://www.planetf1.com/1", Some((2024, 1, 3))),
            item("https://elsewhere.example/2", Some((2024, 1, 4))),
            item("https://racingnews365.com/3", Some((2024, 1, 2))),
            item("https://racingnews365.com/4", Some((2024, 1, 1))),
        ];
        let ranked = rank(items, &domains(), 2);
        let links: Vec<_> = ranked.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, vec!["https://www.planetf1.com/1", "https://racingnews365.com/3"]);
    }

    fn aggregator(fetcher: StaticFetcher, config: NewsConfig) -> NewsAggregator {
        NewsAggregator::new(ParallelFetcher::with_workers(Arc::new(fetcher), 4), config)
    }

    #[tokio::test]
    async fn test_get_news_isolates_failing_source() {
        let planet = "<rss><item><title>Planet</title><link>https://www.planetf1.com/p</link>\
                      <pubDate>Fri, 01 Mar 2024 00:00:00 GMT</pubDate></item></rss>";
        let fetcher = StaticFetcher::new().with("https://www.planetf1.com/feed/", planet);
        let config = NewsConfig {
            sources: vec![
                SourceDescriptor {
                    name: "PlanetF1".into(),
                    domains: vec!["planetf1.com".into()],
                    endpoints: vec![Endpoint::new("https://www.planetf1.com/feed/", FeedFormat::Item)],
                },
                SourceDescriptor {
                    name: "RacingNews365".into(),
                    domains: vec!["racingnews365.com".into()],
                    endpoints: vec![Endpoint::new("https://racingnews365.com/rss", FeedFormat::Auto)],
                },
            ],
            ..Default::default()
        };

        let news = aggregator(fetcher, config).get_news(10).await;
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].source, "PlanetF1");
    }

    #[tokio::test]
    async fn test_get_news_is_deterministic() {
        let feed = |host: &str| {
            format!(
                "<rss><item><title>A</title><link>https://{host}/a</link></item>\
                 <item><title>B</title><link>https://{host}/b</link></item></rss>"
            )
        };
        let fetcher = StaticFetcher::new()
            .with("https://www.planetf1.com/feed/", &feed("www.planetf1.com"))
            .with("https://racingnews365.com/rss", &feed("racingnews365.com"));
        let config = NewsConfig {
            sources: vec![
                SourceDescriptor {
                    name: "PlanetF1".into(),
                    domains: vec!["planetf1.com".into()],
                    endpoints: vec![Endpoint::new("https://www.planetf1.com/feed/", FeedFormat::Item)],
                },
                SourceDescriptor {
                    name: "RacingNews365".into(),
                    domains: vec!["racingnews365.com".into()],
                    endpoints: vec![Endpoint::new("https://racingnews365.com/rss", FeedFormat::Item)],
                },
            ],
            ..Default::default()
        };
        let aggregator = aggregator(fetcher, config);

        let first = aggregator.get_news(10).await;
        let second = aggregator.get_news(10).await;
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
        assert_eq!(first[0].link, "https://www.planetf1.com/a");
        assert_eq!(first[3].link, "https://racingnews365.com/b");
    }

    #[tokio::test]
    async fn test_search_news_filters_by_query() {
        let feed = "<rss>\
            <item><title>Verstappen wins again</title><link>https://m.example/1</link></item>\
            <item><title>Pit stop</title><link>https://m.example/2</link>\
              <description>Max VERSTAPPEN pits early</description></item>\
            <item><title>Unrelated</title><link>https://m.example/3</link></item>\
            </rss>";
        let fetcher = StaticFetcher::new().with("https://m.example/rss", feed);
        let config = NewsConfig {
            search_feeds: vec![
                SearchFeed { name: "M".into(), url: "https://m.example/rss".into() },
                SearchFeed { name: "Down".into(), url: "https://down.example/rss".into() },
            ],
            ..Default::default()
        };
        let aggregator = aggregator(fetcher, config);

        let found = aggregator.search_news("  Verstappen ", 10).await;
        assert_eq!(found.len(), 2);
        assert!(aggregator.search_news("", 10).await.is_empty());
        assert_eq!(aggregator.search_news("verstappen", 1).await.len(), 1);
    }
}
