//! Video catalog access: uploads pagination, detail enrichment and
//! federated search, with the channel's recent-activity feed as the
//! degraded data source.

pub mod cursor;
pub mod enricher;
pub mod mirror;
pub mod paginator;
pub mod search;
pub mod youtube;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

pub use mirror::RecentMirror;
pub use paginator::UploadsPaginator;
pub use youtube::YouTubeApi;

use crate::app::Result;
use crate::config::CatalogConfig;
use crate::domain::video::retain_unique_ids;
use crate::domain::{VideoDetails, VideoPage, VideoSummary};
use crate::fetcher::Fetcher;

/// One listing call's worth of uploads.
#[derive(Debug, Clone, Default)]
pub struct UploadsBatch {
    pub videos: Vec<VideoSummary>,
    /// Opaque cursor for the following batch; `None` on the last one.
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    Relevance,
    Date,
}

impl SearchOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
        }
    }
}

/// The remote catalog's read operations. Every call needs the API
/// credential and fails with a configuration error without it.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Id of the collection holding the channel's uploads, newest first.
    async fn uploads_collection(&self, channel_id: &str) -> Result<String>;

    async fn list_batch(&self, collection_id: &str, batch_size: usize, cursor: Option<&str>) -> Result<UploadsBatch>;

    /// Details for at most one upstream batch of ids. Unknown ids are
    /// simply missing from the map.
    async fn video_details(&self, ids: &[String]) -> Result<HashMap<String, VideoDetails>>;

    async fn search(&self, channel_id: &str, query: &str, max: usize, order: SearchOrder) -> Result<Vec<VideoSummary>>;
}

/// Entry point for video collaborators. Transient upstream failures are
/// absorbed here; only configuration errors reach the caller.
pub struct VideoCatalog {
    api: Arc<dyn CatalogApi>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    config: CatalogConfig,
}

impl VideoCatalog {
    pub fn new(api: Arc<dyn CatalogApi>, fetcher: Arc<dyn Fetcher + Send + Sync>, config: CatalogConfig) -> Self {
        Self { api, fetcher, config }
    }

    fn paginator(&self) -> UploadsPaginator<'_> {
        UploadsPaginator::new(self.api.as_ref(), self.config.page_size(), self.config.batch_size())
    }

    fn mirror(&self) -> Result<RecentMirror> {
        Ok(RecentMirror::new(self.fetcher.clone(), self.config.mirror_url()?))
    }

    /// Page `page` (1-based, clamped) of the channel's uploads, enriched
    /// with details where available.
    pub async fn get_video_page(&self, page: usize) -> Result<VideoPage> {
        let channel_id = self.config.require_channel_id()?;
        let page = page.max(1);

        match self.paginator().page(channel_id, page).await {
            Ok(mut result) => {
                self.enrich(&mut result.videos).await?;
                info!(page, count = result.videos.len(), has_next = result.has_next_page, "Video page built");
                Ok(result)
            }
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                warn!(page, error = %e, "Uploads listing failed, using recent mirror");
                let recent = self.mirror()?.fetch().await;
                Ok(paginator::slice_page(recent, page, self.config.page_size()))
            }
        }
    }

    /// Up to `limit` uploads following the position encoded in `token`.
    /// A malformed token lists from the newest upload.
    pub async fn uploads_after(&self, token: &str, limit: usize) -> Result<VideoPage> {
        let channel_id = self.config.require_channel_id()?;
        let cursor = cursor::decode(token);
        if cursor.is_none() {
            warn!(token, "Unreadable continuation token, listing from the start");
        }

        let limit = limit.clamp(1, self.config.batch_size());
        match self.paginator().resume(channel_id, cursor.as_deref(), limit).await {
            Ok(mut result) => {
                self.enrich(&mut result.videos).await?;
                Ok(result)
            }
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                warn!(error = %e, "Resuming uploads failed");
                Ok(VideoPage::default())
            }
        }
    }

    pub async fn search_videos(&self, query: &str, limit: usize) -> Result<Vec<VideoSummary>> {
        let channel_id = self.config.require_channel_id()?;
        let max = limit.clamp(1, self.config.search_max.max(1));
        let mirror = self.mirror()?;
        search::federated_search(self.api.as_ref(), &mirror, channel_id, query, max).await
    }

    pub async fn get_video_details(&self, ids: &[String]) -> Result<HashMap<String, VideoDetails>> {
        enricher::fetch_details(self.api.as_ref(), ids, self.config.details_batch()).await
    }

    /// The `count` newest uploads with live state resolved.
    pub async fn latest_videos(&self, count: usize) -> Result<Vec<VideoSummary>> {
        let channel_id = self.config.require_channel_id()?;
        let count = count.clamp(1, self.config.search_max.max(1));

        match self.api.search(channel_id, "", count, SearchOrder::Date).await {
            Ok(mut videos) => {
                retain_unique_ids(&mut videos);
                self.enrich(&mut videos).await?;
                Ok(videos)
            }
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                warn!(error = %e, "Latest uploads search failed, using recent mirror");
                let mut recent = self.mirror()?.fetch().await;
                recent.truncate(count);
                Ok(recent)
            }
        }
    }

    /// Every upload id, newest first, up to `hard_limit`.
    pub async fn all_upload_ids(&self, hard_limit: usize) -> Result<Vec<String>> {
        let channel_id = self.config.require_channel_id()?;
        self.paginator().all_ids(channel_id, hard_limit).await
    }

    async fn enrich(&self, videos: &mut [VideoSummary]) -> Result<()> {
        let ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();
        let details = self.get_video_details(&ids).await?;
        for video in videos.iter_mut() {
            if let Some(d) = details.get(&video.id) {
                video.enrich(d);
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::mirror::fixtures::mirror_feed;
    use super::testing::FakeCatalog;
    use super::*;
    use crate::app::PaddockError;
    use crate::fetcher::testing::StaticFetcher;

    const MIRROR_URL: &str = "https://www.youtube.com/feeds/videos.xml?channel_id=UC1";

    fn config() -> CatalogConfig {
        CatalogConfig {
            api_key: Some("k".into()),
            channel_id: Some("UC1".into()),
            ..Default::default()
        }
    }

    fn catalog(api: FakeCatalog, fetcher: StaticFetcher) -> (Arc<FakeCatalog>, VideoCatalog) {
        let api = Arc::new(api);
        let catalog = VideoCatalog::new(api.clone(), Arc::new(fetcher), config());
        (api, catalog)
    }

    fn recent(count: usize) -> String {
        let entries: Vec<(String, String)> = (0..count)
            .map(|i| (format!("r{i}"), format!("Recent {i}")))
            .collect();
        let borrowed: Vec<(&str, &str)> = entries.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        mirror_feed(&borrowed)
    }

    #[tokio::test]
    async fn test_video_page_is_enriched() {
        let (_, catalog) = catalog(FakeCatalog::with_uploads(40), StaticFetcher::new());
        let page = catalog.get_video_page(1).await.unwrap();

        assert_eq!(page.page, Some(1));
        assert_eq!(page.videos.len(), 18);
        assert!(page.has_next_page);
        assert!(page.videos.iter().all(|v| v.duration.as_deref() == Some("PT5M")));
    }

    #[tokio::test]
    async fn test_video_page_zero_is_first_page() {
        let (_, catalog) = catalog(FakeCatalog::with_uploads(40), StaticFetcher::new());
        let page = catalog.get_video_page(0).await.unwrap();
        assert_eq!(page.page, Some(1));
        assert_eq!(page.videos[0].id, "v0");
    }

    #[tokio::test]
    async fn test_video_page_falls_back_to_mirror() {
        let api = FakeCatalog {
            fail_transiently: true,
            ..FakeCatalog::with_uploads(40)
        };
        let (_, catalog) = catalog(api, StaticFetcher::new().with(MIRROR_URL, &recent(15)));

        let first = catalog.get_video_page(1).await.unwrap();
        assert_eq!(first.videos.len(), 15);
        assert!(!first.has_next_page);
        assert!(first.next_token.is_none());

        let second = catalog.get_video_page(2).await.unwrap();
        assert!(second.videos.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_propagates() {
        let api = FakeCatalog {
            missing_key: true,
            ..FakeCatalog::with_uploads(40)
        };
        let (_, catalog) = catalog(api, StaticFetcher::new().with(MIRROR_URL, &recent(3)));

        let err = catalog.get_video_page(1).await.unwrap_err();
        assert!(matches!(err, PaddockError::MissingCredential(_)));
        assert!(catalog.latest_videos(5).await.is_err());
        assert!(catalog.search_videos("monaco", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_channel_is_configuration_error() {
        let catalog = VideoCatalog::new(
            Arc::new(FakeCatalog::with_uploads(3)),
            Arc::new(StaticFetcher::new()),
            CatalogConfig {
                api_key: Some("k".into()),
                ..Default::default()
            },
        );
        let err = catalog.get_video_page(1).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_uploads_after_token() {
        let (api, catalog) = catalog(FakeCatalog::with_uploads(40), StaticFetcher::new());
        let token = cursor::encode("offset:30");

        let page = catalog.uploads_after(&token, 18).await.unwrap();
        assert_eq!(page.page, None);
        assert_eq!(page.videos.len(), 10);
        assert_eq!(page.videos[0].id, "v30");
        assert!(!page.has_next_page);
        assert_eq!(*api.list_calls.lock().unwrap(), vec![Some("offset:30".to_string())]);
    }

    #[tokio::test]
    async fn test_uploads_after_bad_token_starts_over() {
        let (_, catalog) = catalog(FakeCatalog::with_uploads(40), StaticFetcher::new());
        let page = catalog.uploads_after("%%%", 5).await.unwrap();
        assert_eq!(page.videos[0].id, "v0");
        assert!(page.has_next_page);
        assert_eq!(page.next_token.as_deref().and_then(cursor::decode).as_deref(), Some("offset:5"));
    }

    #[tokio::test]
    async fn test_latest_videos_marks_live() {
        let mut api = FakeCatalog::with_uploads(3);
        api.uploads[1].id = "live".into();
        let (_, catalog) = catalog(api, StaticFetcher::new());

        let latest = catalog.latest_videos(2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert!(!latest[0].is_live);
        assert!(latest[1].is_live);
    }

    #[tokio::test]
    async fn test_latest_videos_falls_back_to_mirror() {
        let api = FakeCatalog {
            fail_transiently: true,
            ..Default::default()
        };
        let (_, catalog) = catalog(api, StaticFetcher::new().with(MIRROR_URL, &recent(15)));

        let latest = catalog.latest_videos(9).await.unwrap();
        assert_eq!(latest.len(), 9);
        assert_eq!(latest[0].id, "r0");
    }

    #[tokio::test]
    async fn test_all_upload_ids() {
        let (api, catalog) = catalog(FakeCatalog::with_uploads(120), StaticFetcher::new());
        let ids = catalog.all_upload_ids(1000).await.unwrap();
        assert_eq!(ids.len(), 120);
        assert_eq!(api.list_call_count(), 3);

        let capped = catalog.all_upload_ids(60).await.unwrap();
        assert_eq!(capped.len(), 60);
    }

    #[tokio::test]
    async fn test_all_upload_ids_transient_failure_is_empty() {
        let api = FakeCatalog {
            fail_transiently: true,
            ..FakeCatalog::with_uploads(40)
        };
        let (_, catalog) = catalog(api, StaticFetcher::new());
        assert_eq!(catalog.all_upload_ids(1000).await.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_huge_page_index_does_not_panic() {
        let (_, catalog) = catalog(FakeCatalog::with_uploads(40), StaticFetcher::new());
        let page = catalog.get_video_page(usize::MAX).await.unwrap();
        assert!(page.videos.is_empty());
        assert!(!page.has_next_page);
    }
}
