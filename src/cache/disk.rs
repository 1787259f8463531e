use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::cache::{CacheEntry, PosterCache, SweepStats};

const ENTRY_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = ".json.tmp";

/// Temporary files younger than this may still belong to an in-progress write.
const TMP_GRACE_SECS: i64 = 600;

/// Directory-backed cache: `<dir>/<key>.json`.
pub struct DiskCache {
    dir: PathBuf,
    ttl: TimeDelta,
}

impl DiskCache {
    /// Open the cache, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P, ttl: TimeDelta) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ENTRY_EXTENSION))
    }

    fn read_entry(path: &Path) -> Result<CacheEntry> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn get_at(&self, key: &str, douban_id: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let entry = match Self::read_entry(&path) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "failed to read cache entry");
                return None;
            }
        };

        if !entry.is_fresh(self.ttl, now) {
            debug!(key, "cache entry expired");
            return None;
        }
        if entry.douban_id != douban_id {
            debug!(key, cached = %entry.douban_id, current = douban_id, "cache entry belongs to another subject");
            return None;
        }

        Some(entry)
    }

    pub fn put_at(
        &self,
        key: &str,
        poster_url: &str,
        douban_id: &str,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let entry = CacheEntry {
            poster_url: poster_url.to_string(),
            captured_at: now.timestamp(),
            douban_id: douban_id.to_string(),
            title: title.to_string(),
        };

        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Readers never see a half-written entry.
        let tmp = self.dir.join(format!("{}{}", key, TMP_SUFFIX));
        fs::write(&tmp, serde_json::to_string_pretty(&entry)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn sweep_at(&self, now: DateTime<Utc>) -> SweepStats {
        let mut stats = SweepStats::default();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "failed to list cache directory");
                return stats;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if Self::is_tmp_file(&path) {
                self.sweep_orphan(&path, now, &mut stats);
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            stats.scanned += 1;

            let cached = match Self::read_entry(&path) {
                Ok(cached) => cached,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read cache entry during sweep");
                    stats.failed += 1;
                    continue;
                }
            };

            if cached.is_fresh(self.ttl, now) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed expired cache entry");
                    stats.removed += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove expired cache entry");
                    stats.failed += 1;
                }
            }
        }

        info!(
            scanned = stats.scanned,
            removed = stats.removed,
            failed = stats.failed,
            orphans = stats.orphans,
            "cache sweep complete"
        );
        stats
    }

    fn is_tmp_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(TMP_SUFFIX))
    }

    /// Remove a temporary file left behind by an interrupted write.
    fn sweep_orphan(&self, path: &Path, now: DateTime<Utc>, stats: &mut SweepStats) {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to stat temporary cache file");
                stats.failed += 1;
                return;
            }
        };
        if (now - modified).num_seconds() < TMP_GRACE_SECS {
            return;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed orphaned temporary cache file");
                stats.orphans += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove temporary cache file");
                stats.failed += 1;
            }
        }
    }
}

impl PosterCache for DiskCache {
    fn get(&self, key: &str, douban_id: &str) -> Option<CacheEntry> {
        self.get_at(key, douban_id, Utc::now())
    }

    fn put(&self, key: &str, poster_url: &str, douban_id: &str, title: &str) -> Result<()> {
        self.put_at(key, poster_url, douban_id, title, Utc::now())
    }

    fn sweep(&self) -> SweepStats {
        self.sweep_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTER: &str = "https://img1.doubanio.com/view/photo/s_ratio_poster/public/p1.jpg";

    fn cache(dir: &Path) -> DiskCache {
        DiskCache::new(dir.join("cache"), TimeDelta::days(30)).unwrap()
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        assert!(cache.dir().is_dir());
    }

    #[test]
    fn test_get_after_put_hits() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());

        cache.put("douban_1", POSTER, "1", "Foo").unwrap();
        let entry = cache.get("douban_1", "1").unwrap();

        assert_eq!(entry.poster_url, POSTER);
        assert_eq!(entry.douban_id, "1");
        assert_eq!(entry.title, "Foo");
    }

    #[test]
    fn test_get_misses_after_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        let now = Utc::now();

        cache.put_at("douban_1", POSTER, "1", "Foo", now).unwrap();

        assert!(cache.get_at("douban_1", "1", now + TimeDelta::days(29)).is_some());
        assert!(cache.get_at("douban_1", "1", now + TimeDelta::days(30)).is_none());
        assert!(cache.get_at("douban_1", "1", now + TimeDelta::days(31)).is_none());
    }

    #[test]
    fn test_put_with_other_douban_id_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());

        cache.put("name_abc", POSTER, "1", "Foo").unwrap();
        cache.put("name_abc", "https://example.com/other.jpg", "2", "Foo").unwrap();

        assert!(cache.get("name_abc", "1").is_none());
        assert_eq!(
            cache.get("name_abc", "2").unwrap().poster_url,
            "https://example.com/other.jpg"
        );
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        fs::write(cache.entry_path("douban_9"), "{not json").unwrap();
        assert!(cache.get("douban_9", "9").is_none());
    }

    #[test]
    fn test_reads_existing_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        let json = format!(
            r#"{{"image_url": "{}", "timestamp": {}, "douban_id": "7", "name": "旧条目"}}"#,
            POSTER,
            Utc::now().timestamp()
        );
        fs::write(cache.entry_path("douban_7"), json).unwrap();

        let entry = cache.get("douban_7", "7").unwrap();
        assert_eq!(entry.title, "旧条目");
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        let now = Utc::now();

        cache.put_at("douban_old", POSTER, "old", "Old", now - TimeDelta::days(40)).unwrap();
        cache.put_at("douban_new", POSTER, "new", "New", now).unwrap();
        fs::write(cache.entry_path("douban_bad"), "garbage").unwrap();
        fs::write(cache.dir().join("notes.txt"), "ignored").unwrap();

        let stats = cache.sweep_at(now);

        assert_eq!(stats.scanned, 3);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.failed, 1);
        assert!(!cache.entry_path("douban_old").exists());
        assert!(cache.entry_path("douban_new").exists());
        assert!(cache.entry_path("douban_bad").exists());
    }

    #[test]
    fn test_sweep_removes_stale_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        let orphan = cache.dir().join("douban_3.json.tmp");
        fs::write(&orphan, "{\"image_url\":").unwrap();
        let now = Utc::now();

        let stats = cache.sweep_at(now);
        assert_eq!(stats.orphans, 0);
        assert_eq!(stats.scanned, 0);
        assert!(orphan.exists());

        let stats = cache.sweep_at(now + TimeDelta::hours(1));
        assert_eq!(stats.orphans, 1);
        assert_eq!(stats.failed, 0);
        assert!(!orphan.exists());
    }

    #[test]
    fn test_put_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());

        cache.put("douban_1", POSTER, "1", "Foo").unwrap();

        let names: Vec<_> = fs::read_dir(cache.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["douban_1.json".to_string()]);
    }
}
