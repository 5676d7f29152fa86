//! Page-number access to the channel's uploads collection.
//!
//! The upstream collection only offers forward continuation cursors, so
//! page N is reached by walking batches from the newest upload and
//! counting. There is no backwards cursor: an earlier page is a fresh
//! walk from the start.

use tracing::{debug, warn};

use crate::app::Result;
use crate::catalog::{cursor, CatalogApi};
use crate::domain::video::retain_unique_ids;
use crate::domain::{VideoPage, VideoSummary};

pub struct UploadsPaginator<'a> {
    api: &'a dyn CatalogApi,
    page_size: usize,
    batch_size: usize,
}

impl<'a> UploadsPaginator<'a> {
    pub fn new(api: &'a dyn CatalogApi, page_size: usize, batch_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            api,
            page_size,
            batch_size: batch_size.max(page_size),
        }
    }

    /// Page `page` (1-based) of uploads, newest first.
    pub async fn page(&self, channel_id: &str, page: usize) -> Result<VideoPage> {
        let page = page.max(1);
        let collection = self.api.uploads_collection(channel_id).await?;
        let Some(start) = (page - 1).checked_mul(self.page_size) else {
            debug!(page, "Page index beyond any collection");
            return Ok(VideoPage {
                page: Some(page),
                ..Default::default()
            });
        };

        let mut offset = 0;
        let mut cursor: Option<String> = None;
        let mut collected: Vec<VideoSummary> = Vec::with_capacity(self.page_size);
        let mut leftover = false;

        loop {
            let batch = self
                .api
                .list_batch(&collection, self.batch_size, cursor.as_deref())
                .await?;
            let received = batch.videos.len();
            debug!(offset, received, "Uploads batch");

            if offset + received <= start {
                offset += received;
            } else {
                for video in batch.videos {
                    if offset >= start {
                        if collected.len() == self.page_size {
                            leftover = true;
                            break;
                        }
                        collected.push(video);
                    }
                    offset += 1;
                }
            }

            cursor = batch.next_cursor;
            if collected.len() == self.page_size || cursor.is_none() || received == 0 {
                break;
            }
        }

        let has_next_page = collected.len() == self.page_size && (leftover || cursor.is_some());
        retain_unique_ids(&mut collected);

        Ok(VideoPage {
            page: Some(page),
            videos: collected,
            has_next_page,
            next_token: cursor.as_deref().map(cursor::encode),
        })
    }

    /// One batch of up to `limit` uploads starting at `cursor`.
    pub async fn resume(&self, channel_id: &str, cursor: Option<&str>, limit: usize) -> Result<VideoPage> {
        let collection = self.api.uploads_collection(channel_id).await?;
        let batch = self.api.list_batch(&collection, limit.max(1), cursor).await?;

        let mut videos = batch.videos;
        retain_unique_ids(&mut videos);

        Ok(VideoPage {
            page: None,
            videos,
            has_next_page: batch.next_cursor.is_some(),
            next_token: batch.next_cursor.as_deref().map(cursor::encode),
        })
    }

    /// Ids of every upload up to `hard_limit`. A transient failure ends the
    /// walk with what was collected, possibly nothing.
    pub async fn all_ids(&self, channel_id: &str, hard_limit: usize) -> Result<Vec<String>> {
        let collection = match self.api.uploads_collection(channel_id).await {
            Ok(collection) => collection,
            Err(e) if e.is_configuration() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Uploads collection lookup failed");
                return Ok(Vec::new());
            }
        };
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        while ids.len() < hard_limit {
            let batch = match self.api.list_batch(&collection, self.batch_size, cursor.as_deref()).await {
                Ok(batch) => batch,
                Err(e) if e.is_configuration() => return Err(e),
                Err(e) => {
                    warn!(collected = ids.len(), error = %e, "Upload walk cut short");
                    break;
                }
            };

            let received = batch.videos.len();
            ids.extend(batch.videos.into_iter().map(|v| v.id));
            cursor = batch.next_cursor;
            if cursor.is_none() || received == 0 {
                break;
            }
        }

        ids.truncate(hard_limit);
        Ok(ids)
    }
}

/// Page `page` cut out of an already-fetched list, for the degraded path.
pub fn slice_page(videos: Vec<VideoSummary>, page: usize, page_size: usize) -> VideoPage {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let Some(start) = (page - 1).checked_mul(page_size) else {
        return VideoPage {
            page: Some(page),
            ..Default::default()
        };
    };
    let has_next_page = videos.len() > start.saturating_add(page_size);

    VideoPage {
        page: Some(page),
        videos: videos.into_iter().skip(start).take(page_size).collect(),
        has_next_page,
        next_token: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;

    fn ids(page: &VideoPage) -> Vec<&str> {
        page.videos.iter().map(|v| v.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_first_page_of_forty() {
        let api = FakeCatalog::with_uploads(40);
        let page = UploadsPaginator::new(&api, 18, 50).page("UC1", 1).await.unwrap();

        assert_eq!(page.videos.len(), 18);
        assert!(page.has_next_page);
        assert_eq!(page.videos[0].id, "v0");
        assert_eq!(page.videos[17].id, "v17");
        // The single batch held everything, so there is no upstream cursor.
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn test_final_page_of_forty() {
        let api = FakeCatalog::with_uploads(40);
        let page = UploadsPaginator::new(&api, 18, 50).page("UC1", 3).await.unwrap();

        assert_eq!(ids(&page), vec!["v36", "v37", "v38", "v39"]);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_page_spans_batch_boundary() {
        let api = FakeCatalog::with_uploads(100);
        let paginator = UploadsPaginator::new(&api, 18, 20);

        let page = paginator.page("UC1", 2).await.unwrap();
        let expected: Vec<String> = (18..36).map(|i| format!("v{i}")).collect();
        assert_eq!(ids(&page), expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(page.has_next_page);
        assert_eq!(api.list_call_count(), 2);
        assert_eq!(page.next_token.as_deref().and_then(cursor::decode).as_deref(), Some("offset:40"));
    }

    #[tokio::test]
    async fn test_page_exactly_at_end_has_no_next() {
        let api = FakeCatalog::with_uploads(36);
        let page = UploadsPaginator::new(&api, 18, 18).page("UC1", 2).await.unwrap();

        assert_eq!(page.videos.len(), 18);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_full_page_at_batch_end_with_cursor_has_next() {
        let api = FakeCatalog::with_uploads(37);
        let page = UploadsPaginator::new(&api, 18, 18).page("UC1", 2).await.unwrap();

        assert_eq!(page.videos.len(), 18);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let api = FakeCatalog::with_uploads(10);
        let page = UploadsPaginator::new(&api, 18, 50).page("UC1", 4).await.unwrap();

        assert!(page.videos.is_empty());
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_earlier_page_rewalks_from_start() {
        let api = FakeCatalog::with_uploads(100);
        let paginator = UploadsPaginator::new(&api, 10, 10);

        paginator.page("UC1", 3).await.unwrap();
        paginator.page("UC1", 2).await.unwrap();

        let calls = api.list_calls.lock().unwrap().clone();
        assert_eq!(calls.iter().filter(|c| c.is_none()).count(), 2);
        assert_eq!(calls.len(), 5);
    }

    #[tokio::test]
    async fn test_resume_from_cursor() {
        let api = FakeCatalog::with_uploads(30);
        let page = UploadsPaginator::new(&api, 18, 50)
            .resume("UC1", Some("offset:10"), 5)
            .await
            .unwrap();

        assert_eq!(ids(&page), vec!["v10", "v11", "v12", "v13", "v14"]);
        assert!(page.has_next_page);
        assert_eq!(page.next_token.as_deref().and_then(cursor::decode).as_deref(), Some("offset:15"));
    }

    #[tokio::test]
    async fn test_all_ids_stops_at_limit() {
        let api = FakeCatalog::with_uploads(75);
        let paginator = UploadsPaginator::new(&api, 18, 50);

        assert_eq!(paginator.all_ids("UC1", 1000).await.unwrap().len(), 75);
        assert_eq!(paginator.all_ids("UC1", 10).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_transient_failure_propagates_to_caller() {
        let api = FakeCatalog {
            fail_transiently: true,
            ..FakeCatalog::with_uploads(10)
        };
        let err = UploadsPaginator::new(&api, 18, 50).page("UC1", 1).await.unwrap_err();
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn test_huge_page_index_is_empty() {
        let api = FakeCatalog::with_uploads(40);
        let page = UploadsPaginator::new(&api, 18, 50).page("UC1", usize::MAX).await.unwrap();

        assert_eq!(page.page, Some(usize::MAX));
        assert!(page.videos.is_empty());
        assert!(!page.has_next_page);
        assert_eq!(api.list_call_count(), 0);
    }

    #[tokio::test]
    async fn test_all_ids_transient_failure_is_empty() {
        let api = FakeCatalog {
            fail_transiently: true,
            ..FakeCatalog::with_uploads(10)
        };
        let ids = UploadsPaginator::new(&api, 18, 50).all_ids("UC1", 1000).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_all_ids_missing_key_propagates() {
        let api = FakeCatalog {
            missing_key: true,
            ..FakeCatalog::with_uploads(10)
        };
        let err = UploadsPaginator::new(&api, 18, 50).all_ids("UC1", 1000).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_slice_page_huge_index() {
        let videos: Vec<VideoSummary> = (0..5).map(|i| VideoSummary::new(format!("r{i}"), "t")).collect();
        let page = slice_page(videos.clone(), usize::MAX, 10);
        assert!(page.videos.is_empty());
        assert!(!page.has_next_page);

        let page = slice_page(videos, usize::MAX / 10 + 1, 10);
        assert!(page.videos.is_empty());
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_slice_page() {
        let videos: Vec<VideoSummary> = (0..15)
            .map(|i| VideoSummary::new(format!("r{i}"), "t"))
            .collect();

        let first = slice_page(videos.clone(), 1, 10);
        assert_eq!(first.videos.len(), 10);
        assert!(first.has_next_page);

        let second = slice_page(videos, 2, 10);
        assert_eq!(second.videos.len(), 5);
        assert!(!second.has_next_page);
    }
}
