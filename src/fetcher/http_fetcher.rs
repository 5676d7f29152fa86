use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;

use crate::app::{PaddockError, Result};
use crate::config::HttpConfig;
use crate::fetcher::{ContentKind, Fetcher};

const FEED_ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/xml, text/xml, text/html; charset=utf-8";
const JSON_ACCEPT: &str = "application/json";

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, kind: ContentKind) -> Result<String> {
        let accept = match kind {
            ContentKind::Feed => FEED_ACCEPT,
            ContentKind::Json => JSON_ACCEPT,
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(accept))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaddockError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
