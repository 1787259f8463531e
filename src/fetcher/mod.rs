pub mod http_fetcher;
pub mod parallel;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::app::Result;

/// A fetched detail page.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    /// URL after following redirects
    pub final_url: String,
    /// Empty unless the status is 200
    pub body: String,
}

#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str, headers: HeaderMap) -> Result<FetchResult>;
}
