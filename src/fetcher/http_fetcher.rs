use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use crate::app::Result;
use crate::fetcher::{FetchResult, Fetcher};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: HeaderMap) -> Result<FetchResult> {
        let response = self.client.get(url).headers(headers).send().await?;

        let status = response.status();
        let final_url = response.url().to_string();

        let body = if status == StatusCode::OK {
            response.text().await?
        } else {
            String::new()
        };

        Ok(FetchResult {
            status: status.as_u16(),
            final_url,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_client() {
        assert!(HttpFetcher::new(Duration::from_secs(10)).is_ok());
    }
}
