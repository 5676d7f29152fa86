pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "paddock")]
#[command(about = "Aggregate motorsport headlines and a channel's video catalog", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default: ~/.config/paddock/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers for fetching feeds
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Latest headlines across all sources
    News {
        /// Maximum number of headlines
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Headlines matching a keyword
    SearchNews {
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// A page of the channel's uploads
    Videos {
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Uploads following a continuation token from a previous page
    After {
        token: String,
        #[arg(short, long, default_value_t = 18)]
        limit: usize,
    },
    /// Search the channel's videos
    SearchVideos {
        query: String,
        #[arg(short, long, default_value_t = 18)]
        limit: usize,
    },
    /// Newest uploads with live status
    Latest {
        #[arg(short = 'n', long, default_value_t = 9)]
        count: usize,
    },
    /// Views, duration and description for video ids
    Details {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Every upload id, newest first
    UploadIds {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Write a commented default configuration file
    InitConfig,
}
