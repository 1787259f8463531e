use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::scraper::RetryPolicy;

/// Configuration for poster scraping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Maximum detail-page requests in flight (default: 5)
    pub max_concurrency: usize,

    /// Attempts per record, including the first (default: 3)
    pub max_attempts: u32,

    /// Pause between a failed attempt and the next one, in seconds (default: 5)
    pub retry_delay_secs: u64,

    /// Lower bound of the random pause before each attempt, in milliseconds (default: 1000)
    pub min_jitter_ms: u64,

    /// Upper bound of the random pause before each attempt, in milliseconds (default: 3000)
    pub max_jitter_ms: u64,

    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Host Douban redirects to when it wants a captcha solved
    pub verification_host: String,

    /// Referer sent with every request
    pub referer: String,

    /// Pool of user agents; one is picked at random per attempt
    pub user_agents: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            max_attempts: 3,
            retry_delay_secs: 5,
            min_jitter_ms: 1000,
            max_jitter_ms: 3000,
            timeout_secs: 10,
            verification_host: "sec.douban.com".to_string(),
            referer: "https://movie.douban.com".to_string(),
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
                    .to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
                    .to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0"
                    .to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
                 (KHTML, like Gecko) Version/17.2.1 Safari/605.1.15"
                    .to_string(),
            ],
        }
    }
}

impl ScraperConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    fn jitter_range(&self) -> RangeInclusive<u64> {
        let low = self.min_jitter_ms.min(self.max_jitter_ms);
        let high = self.min_jitter_ms.max(self.max_jitter_ms);
        low..=high
    }

    /// Random pre-attempt pause within the configured bounds
    pub fn jitter(&self) -> Duration {
        Duration::from_millis(rand::rng().random_range(self.jitter_range()))
    }

    /// Same settings with every pause removed
    pub fn without_delays(self) -> Self {
        Self {
            retry_delay_secs: 0,
            min_jitter_ms: 0,
            max_jitter_ms: 0,
            ..self
        }
    }
}
