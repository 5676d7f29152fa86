//! YouTube Data API v3 client.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::app::{PaddockError, Result};
use crate::catalog::{CatalogApi, SearchOrder, UploadsBatch};
use crate::config::CatalogConfig;
use crate::domain::{VideoDetails, VideoSummary};
use crate::fetcher::{ContentKind, Fetcher};
use crate::normalizer::parse_timestamp;

pub struct YouTubeApi {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    config: CatalogConfig,
}

impl YouTubeApi {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, config: &CatalogConfig) -> Self {
        Self {
            fetcher,
            config: config.clone(),
        }
    }

    /// Resource URL without the credential. This is the form that may
    /// appear in errors and logs.
    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{resource}"))?;
        url.query_pairs_mut().extend_pairs(params.iter().copied());
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T> {
        let key = self.config.require_api_key()?;
        let public = self.endpoint(resource, params)?;
        let mut signed = public.clone();
        signed.query_pairs_mut().append_pair("key", key);

        debug!(resource, "Catalog request");
        let body = self
            .fetcher
            .fetch(signed.as_str(), ContentKind::Json)
            .await
            .map_err(|e| redact(e, &public))?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Swap the signed URL in a fetch error for the unsigned one.
fn redact(err: PaddockError, public: &Url) -> PaddockError {
    match err {
        PaddockError::Status { status, .. } => PaddockError::Status {
            url: public.to_string(),
            status,
        },
        PaddockError::Http(e) => PaddockError::Http(e.without_url()),
        other => other,
    }
}

#[async_trait]
impl CatalogApi for YouTubeApi {
    async fn uploads_collection(&self, channel_id: &str) -> Result<String> {
        let response: ListResponse<ChannelResource> = self
            .get("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        response
            .items
            .into_iter()
            .find_map(|c| c.content_details.related_playlists.uploads)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PaddockError::Upstream(format!("no uploads collection for channel {channel_id}")))
    }

    async fn list_batch(&self, collection_id: &str, batch_size: usize, cursor: Option<&str>) -> Result<UploadsBatch> {
        let max_results = batch_size.to_string();
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", collection_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(cursor) = cursor {
            params.push(("pageToken", cursor));
        }

        let response: ListResponse<PlaylistItemResource> = self.get("playlistItems", &params).await?;
        let videos = response
            .items
            .into_iter()
            .filter_map(PlaylistItemResource::into_summary)
            .collect();

        Ok(UploadsBatch {
            videos,
            next_cursor: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video_details(&self, ids: &[String]) -> Result<HashMap<String, VideoDetails>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = ids.join(",");
        let response: ListResponse<VideoResource> = self
            .get(
                "videos",
                &[
                    ("part", "snippet,contentDetails,statistics,liveStreamingDetails"),
                    ("id", joined.as_str()),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter(|v| !v.id.is_empty())
            .map(|v| {
                let id = v.id.clone();
                (id, v.into_details())
            })
            .collect())
    }

    async fn search(&self, channel_id: &str, query: &str, max: usize, order: SearchOrder) -> Result<Vec<VideoSummary>> {
        let max_results = max.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("channelId", channel_id),
            ("type", "video"),
            ("order", order.as_param()),
            ("maxResults", max_results.as_str()),
        ];
        if !query.is_empty() {
            params.push(("q", query));
        }

        let response: ListResponse<SearchResource> = self.get("search", &params).await?;
        Ok(response
            .items
            .into_iter()
            .filter_map(SearchResource::into_summary)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelResource {
    #[serde(default)]
    content_details: ChannelContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    #[serde(default)]
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Default, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    standard: Option<Thumbnail>,
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Highest resolution available.
    fn best(&self) -> Option<String> {
        [&self.maxres, &self.standard, &self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .find_map(|t| t.url.clone().filter(|u| !u.is_empty()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    description: Option<String>,
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
    live_broadcast_content: Option<String>,
    resource_id: Option<ResourceId>,
}

impl Snippet {
    fn is_live(&self) -> bool {
        self.live_broadcast_content.as_deref() == Some("live")
    }

    fn into_summary(self, id: String) -> VideoSummary {
        let mut video = VideoSummary::new(id, self.title.trim());
        video.thumbnail_url = self.thumbnails.best();
        video.published_at = self.published_at.as_deref().and_then(parse_timestamp);
        video.is_live = self.is_live();
        video
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    #[serde(default)]
    snippet: Snippet,
    content_details: Option<ResourceId>,
}

impl PlaylistItemResource {
    fn into_summary(mut self) -> Option<VideoSummary> {
        let id = self
            .content_details
            .take()
            .and_then(|c| c.video_id)
            .or_else(|| self.snippet.resource_id.take().and_then(|r| r.video_id))
            .filter(|id| !id.is_empty())?;
        Some(self.snippet.into_summary(id))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResource {
    id: Option<ResourceId>,
    #[serde(default)]
    snippet: Snippet,
}

impl SearchResource {
    fn into_summary(self) -> Option<VideoSummary> {
        let id = self.id.and_then(|r| r.video_id).filter(|id| !id.is_empty())?;
        let description = self.snippet.description.clone().filter(|d| !d.is_empty());
        let mut video = self.snippet.into_summary(id);
        video.description = description;
        Some(video)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: Snippet,
    content_details: Option<VideoContentDetails>,
    statistics: Option<Statistics>,
    live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveStreamingDetails {
    actual_start_time: Option<String>,
    scheduled_start_time: Option<String>,
}

impl VideoResource {
    fn into_details(self) -> VideoDetails {
        let live_start = self.live_streaming_details.and_then(|l| {
            l.actual_start_time
                .or(l.scheduled_start_time)
                .as_deref()
                .and_then(parse_timestamp)
        });

        VideoDetails {
            is_live: self.snippet.is_live(),
            description: self.snippet.description.filter(|d| !d.is_empty()),
            thumbnail_url: self.snippet.thumbnails.best(),
            view_count: self
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|v| v.parse().ok()),
            duration: self.content_details.and_then(|c| c.duration),
            live_start,
        }
    }
}
