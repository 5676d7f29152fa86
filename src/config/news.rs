use serde::{Deserialize, Serialize};

use crate::domain::{Endpoint, FeedFormat, SourceDescriptor};
use crate::normalizer::DEFAULT_EXCERPT_CHARS;

/// A single feed scanned by keyword news search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFeed {
    pub name: String,
    pub url: String,
}

/// News aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Items returned when the caller gives no limit (default: 40)
    pub default_limit: usize,

    /// Excerpt length in characters (default: 220)
    pub excerpt_chars: usize,

    /// Sources, each with its ordered fallback endpoints
    pub sources: Vec<SourceDescriptor>,

    /// Feeds scanned by keyword search
    pub search_feeds: Vec<SearchFeed>,

    /// Results returned by keyword search when no limit is given (default: 20)
    pub search_limit: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            default_limit: 40,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            sources: default_sources(),
            search_feeds: default_search_feeds(),
            search_limit: 20,
        }
    }
}

impl NewsConfig {
    /// Every domain any configured source publishes under.
    pub fn known_domains(&self) -> Vec<String> {
        self.sources
            .iter()
            .flat_map(|s| s.domains.iter().cloned())
            .collect()
    }
}

fn aggregator_search(domain: &str) -> Endpoint {
    Endpoint::new(
        format!("https://news.google.com/rss/search?q=site:{domain}&hl=en-GB&gl=GB&ceid=GB:en"),
        FeedFormat::Item,
    )
    .mirror()
}

pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor {
            name: "PlanetF1".to_string(),
            domains: vec!["planetf1.com".to_string()],
            endpoints: vec![
                Endpoint::new("https://www.planetf1.com/feed/", FeedFormat::Item),
                aggregator_search("planetf1.com"),
            ],
        },
        SourceDescriptor {
            name: "RacingNews365".to_string(),
            domains: vec!["racingnews365.com".to_string()],
            endpoints: vec![
                Endpoint::new("https://www.racingnews365.com/rss", FeedFormat::Auto),
                Endpoint::new("https://racingnews365.com/rss", FeedFormat::Auto),
                Endpoint::new("https://racingnews365.com/en/rss.xml", FeedFormat::Auto),
                aggregator_search("racingnews365.com"),
            ],
        },
    ]
}

pub fn default_search_feeds() -> Vec<SearchFeed> {
    vec![
        SearchFeed {
            name: "Motorsport.com".to_string(),
            url: "https://www.motorsport.com/rss/f1/news/".to_string(),
        },
        SearchFeed {
            name: "F1Oversteer".to_string(),
            url: "https://f1oversteer.com/feed/".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_end_with_mirror() {
        for source in default_sources() {
            let last = source.endpoints.last().unwrap();
            assert!(last.filter_domain, "{} should end with a filtered mirror", source.name);
            assert!(source.endpoints[..source.endpoints.len() - 1]
                .iter()
                .all(|e| !e.filter_domain));
        }
    }

    #[test]
    fn test_known_domains() {
        let config = NewsConfig::default();
        assert_eq!(config.known_domains(), vec!["planetf1.com", "racingnews365.com"]);
    }
}
