use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::app::Result;
use crate::catalog::CatalogApi;
use crate::domain::VideoDetails;

/// Details for `ids`, requested `batch` ids at a time. Ids the catalog does
/// not return, and ids in a batch that failed transiently, are absent from
/// the map.
pub async fn fetch_details(
    api: &dyn CatalogApi,
    ids: &[String],
    batch: usize,
) -> Result<HashMap<String, VideoDetails>> {
    let mut seen = HashSet::new();
    let unique: Vec<String> = ids
        .iter()
        .filter(|id| !id.is_empty() && seen.insert(id.as_str()))
        .cloned()
        .collect();

    let mut details = HashMap::with_capacity(unique.len());
    for chunk in unique.chunks(batch.max(1)) {
        match api.video_details(chunk).await {
            Ok(found) => {
                debug!(requested = chunk.len(), found = found.len(), "Detail batch");
                details.extend(found);
            }
            Err(e) if e.is_configuration() => return Err(e),
            Err(e) => {
                warn!(requested = chunk.len(), error = %e, "Detail batch failed, leaving those videos unenriched");
            }
        }
    }

    Ok(details)
}
