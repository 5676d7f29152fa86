use serde::Serialize;

use crate::app::{AppContext, PaddockError, Result};
use crate::config::Config;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn news(ctx: &AppContext, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.news.default_limit);
    print_json(&ctx.news.get_news(limit).await)
}

pub async fn search_news(ctx: &AppContext, query: &str, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.news.search_limit);
    print_json(&ctx.news.search_news(query, limit).await)
}

pub async fn videos(ctx: &AppContext, page: usize) -> Result<()> {
    print_json(&ctx.catalog.get_video_page(page).await?)
}

pub async fn after(ctx: &AppContext, token: &str, limit: usize) -> Result<()> {
    print_json(&ctx.catalog.uploads_after(token, limit).await?)
}

pub async fn search_videos(ctx: &AppContext, query: &str, limit: usize) -> Result<()> {
    print_json(&ctx.catalog.search_videos(query, limit).await?)
}

pub async fn latest(ctx: &AppContext, count: usize) -> Result<()> {
    print_json(&ctx.catalog.latest_videos(count).await?)
}

pub async fn details(ctx: &AppContext, ids: &[String]) -> Result<()> {
    let details = ctx.catalog.get_video_details(ids).await?;
    // Keep the caller's order in the output.
    let ordered: Vec<_> = ids
        .iter()
        .filter_map(|id| details.get(id).map(|d| (id, d)))
        .collect();
    print_json(&ordered)
}

pub async fn upload_ids(ctx: &AppContext, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.catalog.upload_id_limit);
    print_json(&ctx.catalog.all_upload_ids(limit).await?)
}

pub fn init_config(path: Option<&std::path::Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path().map_err(|e| PaddockError::Config(e.to_string()))?,
    };
    Config::write_default(&path).map_err(|e| PaddockError::Config(e.to_string()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
