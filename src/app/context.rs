use std::sync::Arc;

use crate::app::error::Result;
use crate::cache::DiskCache;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::Fetcher;
use crate::scraper::PosterScraper;

pub struct AppContext {
    pub config: Config,
    pub cache: Arc<DiskCache>,
    pub parallel_fetcher: ParallelFetcher,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(config.scraper.timeout())?);
        Self::with_fetcher(config, fetcher)
    }

    /// Wire everything around a caller-supplied fetcher.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let cache = Arc::new(DiskCache::new(&config.cache.dir, config.cache.ttl())?);
        let scraper = Arc::new(PosterScraper::new(fetcher, config.scraper.clone()));
        let parallel_fetcher = ParallelFetcher::with_workers(
            scraper,
            cache.clone(),
            config.scraper.max_concurrency,
        );

        Ok(Self {
            config,
            cache,
            parallel_fetcher,
        })
    }
}
