//! Scripted in-memory fetcher for tests.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::app::{PanreelError, Result};
use crate::fetcher::{FetchResult, Fetcher};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this HTML at the requested URL
    Page(String),
    /// Non-200 status
    Status(u16),
    /// Redirected to another URL, served with 200 and an empty body
    Redirect(String),
    /// Transport error
    Fail,
    /// The fetch panics
    Panic,
}

pub fn poster_page(src: &str) -> String {
    format!(r#"<html><body><div id="mainpic"><img src="{}"></div></body></html>"#, src)
}

/// Replies per URL in order; once a queue drains its last reply repeats.
#[derive(Default)]
pub struct MockFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Duration,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn script(self, url: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Status(404)),
            None => Reply::Status(404),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, _headers: HeaderMap) -> Result<FetchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let reply = self.next_reply(url);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Reply::Page(body) => Ok(FetchResult {
                status: 200,
                final_url: url.to_string(),
                body,
            }),
            Reply::Status(status) => Ok(FetchResult {
                status,
                final_url: url.to_string(),
                body: String::new(),
            }),
            Reply::Redirect(to) => Ok(FetchResult {
                status: 200,
                final_url: to,
                body: String::new(),
            }),
            Reply::Fail => Err(PanreelError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset",
            ))),
            Reply::Panic => panic!("scripted panic for {}", url),
        }
    }
}
