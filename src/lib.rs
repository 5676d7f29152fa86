//! # Paddock
//!
//! Headline aggregation for motorsport news sites and a paginated view
//! over one YouTube channel's uploads.
//!
//! ## Architecture
//!
//! ```text
//! news:    Fetcher → FallbackChain → Normalizer → rank (filter, dedup, sort)
//! videos:  CatalogApi → UploadsPaginator → enricher ─┐
//!          RecentMirror (channel feed) ──────────────┴→ VideoPage
//! ```
//!
//! Each news source is a list of endpoints tried in order until one yields
//! at least one usable item. Sources are fetched concurrently and merged
//! deterministically. The video catalog degrades to the channel's public
//! feed when the data API is unreachable, but a missing API key is always
//! reported to the caller.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write ~/.config/paddock/config.toml
//! paddock init-config
//!
//! # Latest 20 headlines
//! paddock news --limit 20
//!
//! # Second page of uploads
//! PADDOCK_API_KEY=... paddock videos --page 2
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the fetcher, the news aggregator
/// and the video catalog from one configuration.
pub mod app;

/// Video catalog: upload pagination, detail enrichment, search and the
/// recent-uploads mirror.
pub mod catalog;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/paddock/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`NewsItem`](domain::NewsItem): a normalized headline
/// - [`SourceDescriptor`](domain::SourceDescriptor): a news source and its ordered endpoints
/// - [`VideoSummary`](domain::VideoSummary) and [`VideoPage`](domain::VideoPage)
pub mod domain;

/// Ordered "first non-empty result wins" evaluation.
pub mod fallback;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for retrieving documents
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): bounded, order-preserving fan-out
pub mod fetcher;

/// News aggregation across sources.
pub mod news;

/// Feed parsing and normalization.
///
/// Accepts item-style (RSS) and entry-style (Atom) documents and produces
/// [`NewsItem`](domain::NewsItem) values. Malformed input yields an empty list.
pub mod normalizer;
