use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use paddock::app::AppContext;
use paddock::cli::{commands, Cli, Commands};
use paddock::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        commands::init_config(cli.config.as_deref())?;
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(workers) = cli.workers {
        config.http.workers = workers;
    }
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::News { limit } => {
            commands::news(&ctx, limit).await?;
        }
        Commands::SearchNews { query, limit } => {
            commands::search_news(&ctx, &query, limit).await?;
        }
        Commands::Videos { page } => {
            commands::videos(&ctx, page).await?;
        }
        Commands::After { token, limit } => {
            commands::after(&ctx, &token, limit).await?;
        }
        Commands::SearchVideos { query, limit } => {
            commands::search_videos(&ctx, &query, limit).await?;
        }
        Commands::Latest { count } => {
            commands::latest(&ctx, count).await?;
        }
        Commands::Details { ids } => {
            commands::details(&ctx, &ids).await?;
        }
        Commands::UploadIds { limit } => {
            commands::upload_ids(&ctx, limit).await?;
        }
        Commands::InitConfig => {}
    }

    Ok(())
}
