//! Poster scraping from Douban subject pages.
//!
//! # Architecture
//!
//! ```text
//! MovieRecord.douban_url → PosterScraper → (jitter, rotate headers, fetch, extract) × attempts → PosterOutcome
//! ```
//!
//! Failures never escape: an exhausted retry budget resolves to the
//! "no image" placeholder, and a redirect to the anti-bot host resolves to the
//! "verification required" placeholder without further attempts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use panreel::scraper::{PosterScraper, ScraperConfig};
//!
//! let scraper = PosterScraper::new(fetcher, ScraperConfig::default());
//! let resolution = scraper.resolve("https://movie.douban.com/subject/1291546/").await;
//! println!("{} after {} attempts", resolution.poster_url(), resolution.attempts);
//! ```

mod config;
mod extractor;
mod headers;
mod retry;

pub use config::ScraperConfig;
pub use extractor::PosterExtractor;
pub use headers::HeaderRotation;
pub use retry::RetryPolicy;

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::app::{PanreelError, Result};
use crate::domain::Placeholder;
use crate::fetcher::Fetcher;

/// Final state of a poster lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterOutcome {
    Found(String),
    VerificationRequired,
    Unavailable,
}

impl PosterOutcome {
    pub fn poster_url(&self) -> &str {
        match self {
            PosterOutcome::Found(url) => url,
            PosterOutcome::VerificationRequired => Placeholder::VerificationRequired.data_uri(),
            PosterOutcome::Unavailable => Placeholder::NoImage.data_uri(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterResolution {
    pub outcome: PosterOutcome,
    pub attempts: u32,
}

impl PosterResolution {
    pub fn unavailable(attempts: u32) -> Self {
        Self {
            outcome: PosterOutcome::Unavailable,
            attempts,
        }
    }

    pub fn poster_url(&self) -> &str {
        self.outcome.poster_url()
    }
}

/// What a single successful request produced
enum PageOutcome {
    Poster(String),
    Verification,
}

pub struct PosterScraper {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    config: ScraperConfig,
    retry: RetryPolicy,
    headers: HeaderRotation,
    extractor: PosterExtractor,
}

impl PosterScraper {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, config: ScraperConfig) -> Self {
        Self {
            fetcher,
            retry: config.retry_policy(),
            headers: HeaderRotation::new(&config),
            extractor: PosterExtractor::new(),
            config,
        }
    }

    /// Resolve a poster for one subject page. Never fails.
    pub async fn resolve(&self, douban_url: &str) -> PosterResolution {
        if douban_url.is_empty() {
            debug!("{}", PanreelError::MissingDoubanUrl);
            return PosterResolution::unavailable(0);
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            tokio::time::sleep(self.config.jitter()).await;

            match self.attempt(douban_url).await {
                Ok(PageOutcome::Poster(url)) => {
                    debug!(douban_url, attempt, "poster found");
                    return PosterResolution {
                        outcome: PosterOutcome::Found(url),
                        attempts: attempt,
                    };
                }
                Ok(PageOutcome::Verification) => {
                    warn!(douban_url, "redirected to verification page");
                    return PosterResolution {
                        outcome: PosterOutcome::VerificationRequired,
                        attempts: attempt,
                    };
                }
                Err(e) if self.retry.should_retry(attempt, &e) => {
                    warn!(
                        douban_url,
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %e,
                        "poster fetch failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => {
                    warn!(douban_url, attempt, error = %e, "poster fetch failed, giving up");
                    return PosterResolution::unavailable(attempt);
                }
            }
        }
    }

    async fn attempt(&self, douban_url: &str) -> Result<PageOutcome> {
        let response = self.fetcher.fetch(douban_url, self.headers.rotate()).await?;

        if self.is_verification(&response.final_url) {
            return Ok(PageOutcome::Verification);
        }
        if response.status != 200 {
            return Err(PanreelError::UnexpectedStatus(response.status));
        }

        self.extractor
            .extract(&response.body)
            .map(PageOutcome::Poster)
            .ok_or(PanreelError::PosterNotFound)
    }

    fn is_verification(&self, final_url: &str) -> bool {
        let host = self.config.verification_host.as_str();
        Url::parse(final_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
            .is_some_and(|h| h == host || h.ends_with(&format!(".{}", host)))
    }
}
