//! Configuration loading.
//!
//! Configuration is read from `~/.config/paddock/config.toml` (or an
//! explicit path). A missing file means defaults. Environment overrides
//! are applied here and nowhere else; the rest of the crate only sees the
//! resulting [`Config`] value.

pub mod catalog;
pub mod news;

pub use catalog::{CatalogConfig, HttpConfig};
pub use news::{NewsConfig, SearchFeed};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "PADDOCK_API_KEY";
pub const CHANNEL_ID_ENV: &str = "PADDOCK_CHANNEL_ID";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub news: NewsConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load from `path`, or from the default location when `None`, then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Overlay credentials and channel from `lookup` (the process
    /// environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.catalog.api_key = Some(key);
        }
        if let Some(channel) = lookup(CHANNEL_ID_ENV).filter(|v| !v.is_empty()) {
            self.catalog.channel_id = Some(channel);
        }
    }

    /// Get the default config file path: `~/.config/paddock/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("paddock").join("config.toml"))
    }

    /// Write the commented default configuration to `path`. Refuses to
    /// overwrite an existing file.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# Paddock configuration
#
# Credentials can also be supplied through PADDOCK_API_KEY and
# PADDOCK_CHANNEL_ID, which take precedence over this file.

[http]
timeout_secs = 10
user_agent = "Mozilla/5.0 (compatible; PaddockBot/1.0)"
workers = 8

[news]
default_limit = 40
excerpt_chars = 220
search_limit = 20

# Each source tries its endpoints in order and stops at the first one that
# yields items. format is "item", "entry" or "auto".
# filter_domain drops items whose link is not on one of the source's domains.
# unwrap_links resolves aggregator redirect links first.
[[news.sources]]
name = "PlanetF1"
domains = ["planetf1.com"]

[[news.sources.endpoints]]
url = "https://www.planetf1.com/feed/"
format = "item"

[[news.sources.endpoints]]
url = "https://news.google.com/rss/search?q=site:planetf1.com&hl=en-GB&gl=GB&ceid=GB:en"
format = "item"
filter_domain = true
unwrap_links = true

[[news.sources]]
name = "RacingNews365"
domains = ["racingnews365.com"]

[[news.sources.endpoints]]
url = "https://www.racingnews365.com/rss"

[[news.sources.endpoints]]
url = "https://racingnews365.com/rss"

[[news.sources.endpoints]]
url = "https://racingnews365.com/en/rss.xml"

[[news.sources.endpoints]]
url = "https://news.google.com/rss/search?q=site:racingnews365.com&hl=en-GB&gl=GB&ceid=GB:en"
format = "item"
filter_domain = true
unwrap_links = true

[[news.search_feeds]]
name = "Motorsport.com"
url = "https://www.motorsport.com/rss/f1/news/"

[[news.search_feeds]]
name = "F1Oversteer"
url = "https://f1oversteer.com/feed/"

[catalog]
# api_key = "..."
# channel_id = "UC..."
base_url = "https://www.googleapis.com/youtube/v3"
mirror_url_template = "https://www.youtube.com/feeds/videos.xml?channel_id={channel_id}"
page_size = 18
batch_size = 50
details_batch = 50
search_max = 50
upload_id_limit = 1000
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config file already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
