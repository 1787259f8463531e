//! Poster URL cache.
//!
//! - [`PosterCache`]: the handle the fetch fan-out consults and populates
//! - [`DiskCache`]: one JSON file per cache key with a time-to-live

pub mod disk;

pub use disk::DiskCache;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::app::Result;

pub const DEFAULT_TTL_DAYS: u32 = 30;

/// Persisted poster lookup. Field names match the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "image_url")]
    pub poster_url: String,
    #[serde(rename = "timestamp", default)]
    pub captured_at: i64,
    #[serde(default)]
    pub douban_id: String,
    #[serde(rename = "name", default)]
    pub title: String,
}

impl CacheEntry {
    pub fn is_fresh(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        self.captured_at.saturating_add(ttl.num_seconds()) > now.timestamp()
    }
}

/// Outcome of one sweep over the cache directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub scanned: usize,
    pub removed: usize,
    pub failed: usize,
    /// Temporary files left by interrupted writes
    pub orphans: usize,
}

pub trait PosterCache: Send + Sync {
    /// A fresh entry whose Douban id matches `douban_id`, if any.
    fn get(&self, key: &str, douban_id: &str) -> Option<CacheEntry>;

    /// Store a poster URL under `key`. Last write wins.
    fn put(&self, key: &str, poster_url: &str, douban_id: &str, title: &str) -> Result<()>;

    /// Delete every expired entry.
    fn sweep(&self) -> SweepStats;
}
