use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE, REFERER,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use tracing::warn;

use crate::scraper::ScraperConfig;

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "zh-CN,zh;q=0.9,en;q=0.8";
const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
const BID_LEN: usize = 11;
const HEX: &[u8] = b"0123456789abcdef";

/// Builds a fresh header set for every attempt: random user agent and session cookie.
pub struct HeaderRotation {
    user_agents: Vec<HeaderValue>,
    referer: Option<HeaderValue>,
}

impl HeaderRotation {
    pub fn new(config: &ScraperConfig) -> Self {
        let mut user_agents: Vec<HeaderValue> = config
            .user_agents
            .iter()
            .filter_map(|ua| match HeaderValue::from_str(ua) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(user_agent = %ua, error = %e, "dropping invalid user agent");
                    None
                }
            })
            .collect();
        if user_agents.is_empty() {
            user_agents.push(HeaderValue::from_static(FALLBACK_USER_AGENT));
        }

        let referer = HeaderValue::from_str(&config.referer).ok();

        Self {
            user_agents,
            referer,
        }
    }

    pub fn rotate(&self) -> HeaderMap {
        let mut rng = rand::rng();
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
        if let Some(referer) = &self.referer {
            headers.insert(REFERER, referer.clone());
        }
        if let Some(user_agent) = self.user_agents.choose(&mut rng) {
            headers.insert(USER_AGENT, user_agent.clone());
        }

        let bid: String = (0..BID_LEN)
            .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
            .collect();
        if let Ok(cookie) = HeaderValue::from_str(&format!("bid={}", bid)) {
            headers.insert(COOKIE, cookie);
        }

        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("document"));
        headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("navigate"));
        headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("none"));
        headers.insert(HeaderName::from_static("sec-fetch-user"), HeaderValue::from_static("?1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_sets_navigation_headers() {
        let rotation = HeaderRotation::new(&ScraperConfig::default());
        let headers = rotation.rotate();

        assert_eq!(headers.get(ACCEPT_LANGUAGE).unwrap(), ACCEPT_LANGUAGE_VALUE);
        assert_eq!(headers.get(REFERER).unwrap(), "https://movie.douban.com");
        assert_eq!(headers.get("sec-fetch-mode").unwrap(), "navigate");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "max-age=0");
    }

    #[test]
    fn test_user_agent_comes_from_pool() {
        let config = ScraperConfig::default();
        let rotation = HeaderRotation::new(&config);
        for _ in 0..20 {
            let headers = rotation.rotate();
            let ua = headers.get(USER_AGENT).unwrap().to_str().unwrap();
            assert!(config.user_agents.iter().any(|u| u == ua));
        }
    }

    #[test]
    fn test_cookie_is_random_bid() {
        let rotation = HeaderRotation::new(&ScraperConfig::default());
        let cookie = rotation.rotate().get(COOKIE).unwrap().to_str().unwrap().to_string();

        let bid = cookie.strip_prefix("bid=").unwrap();
        assert_eq!(bid.len(), BID_LEN);
        assert!(bid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_pool_falls_back() {
        let config = ScraperConfig {
            user_agents: Vec::new(),
            ..Default::default()
        };
        let headers = HeaderRotation::new(&config).rotate();
        assert_eq!(headers.get(USER_AGENT).unwrap(), FALLBACK_USER_AGENT);
    }
}
