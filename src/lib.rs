//! # Panreel
//!
//! Turns a movie crawler's text log into a self-contained, paginated HTML
//! report with Douban posters, cloud-storage share links and link health.
//!
//! ## Architecture
//!
//! ```text
//! Log → Parser → Reconciler → Status merge → Poster fetch (cache, scraper) → Renderer
//! ```
//!
//! - [`parser`]: line state machine over the crawler log
//! - [`reconcile`]: flags titles absent from the previous run
//! - [`status`]: merges the link checker and violation logs
//! - [`fetcher`] + [`scraper`] + [`cache`]: bounded, retrying poster lookup
//! - [`render`]: single-file HTML report
//!
//! ## Quick Start
//!
//! ```bash
//! # Full run: fetch posters and write ../index.html
//! panreel report
//!
//! # Inspect what the log contains, no network
//! panreel list --log ./report.log
//!
//! # Drop expired poster cache entries
//! panreel sweep
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// the poster cache, the HTTP fetcher and the parallel fetcher.
pub mod app;

/// Command-line interface using clap.
///
/// - `report` - Run the pipeline and write the HTML report
/// - `list` - Print parsed records with status and new markers
/// - `sweep` - Delete expired cache entries
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/panreel/config.toml` with `[report]`, `[cache]`
/// and `[scraper]` sections.
pub mod config;

/// Core domain models.
///
/// - [`MovieRecord`](domain::MovieRecord): one parsed movie block
/// - [`LinkStatus`](domain::LinkStatus): share link health
/// - [`Report`](domain::Report): everything the renderer consumes
pub mod domain;

/// Crawler log parsing and backup.
pub mod parser;

/// New-entry detection against the previous run's log.
pub mod reconcile;

/// Link checker and violation log merging.
pub mod status;

/// Disk-backed poster cache with a time-to-live.
pub mod cache;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Douban poster scraping with retries, jitter and header rotation.
pub mod scraper;

/// HTML report rendering.
pub mod render;

/// End-to-end report run.
pub mod pipeline;
