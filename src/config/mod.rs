//! Configuration management for panreel.
//!
//! Configuration is read from `~/.config/panreel/config.toml` unless a path is
//! given explicitly. If the default file doesn't exist, one with comments is
//! created. Every section is optional; missing fields use default values.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;

use crate::cache::DEFAULT_TTL_DAYS;
use crate::render::DEFAULT_PAGE_SIZE;
use crate::scraper::ScraperConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub cache: CacheConfig,
    pub scraper: ScraperConfig,
}

/// Input and output locations plus report layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Crawler log to render
    pub log_path: PathBuf,
    /// Where the HTML report is written
    pub output_path: PathBuf,
    /// Link checker log, `name=link=status` per line
    pub status_log_path: PathBuf,
    /// Transfer task log listing policy removals
    pub violation_log_path: PathBuf,
    /// Cards per page
    pub page_size: usize,
    /// Appended to `log_path` to locate the previous run's snapshot
    pub backup_suffix: String,
    /// Without a previous snapshot, badge every record as new
    pub mark_all_new_on_first_run: bool,
    /// Match checker entries against parenthetical-stripped titles too
    pub status_base_title_fallback: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./report.log"),
            output_path: PathBuf::from("../index.html"),
            status_log_path: PathBuf::from("../kua-main/check_links.log"),
            violation_log_path: PathBuf::from("../kua-main/quark_save.log"),
            page_size: DEFAULT_PAGE_SIZE,
            backup_suffix: ".bak".to_string(),
            mark_all_new_on_first_run: false,
            status_base_title_fallback: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub dir: PathBuf,
    pub ttl_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./cache"),
            ttl_days: DEFAULT_TTL_DAYS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.ttl_days))
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. At the default location a commented
    /// config is created on first use.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::create_default_config(&config_path)?;
                    return Ok(Self::default());
                }
                Self::load_from(&config_path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/panreel/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("panreel").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# panreel configuration
#
# Relative paths are resolved against the working directory.

[report]
# Crawler log to render
log_path = "./report.log"

# HTML report destination
output_path = "../index.html"

# Link checker output, one "name=link=status" line per share
status_log_path = "../kua-main/check_links.log"

# Transfer task log; tasks flagged for policy violations are listed separately
violation_log_path = "../kua-main/quark_save.log"

# Cards per page
page_size = 25

# The previous run's log is kept at log_path + backup_suffix
backup_suffix = ".bak"

# With no previous log to compare against, mark every movie as new
mark_all_new_on_first_run = false

# Link checker entries match exact titles only; enable to also match
# "Title (2019)" against a "Title" entry
status_base_title_fallback = false

[cache]
# One JSON file per movie
dir = "./cache"

# Entries older than this are refetched and swept
ttl_days = 30

[scraper]
# Maximum concurrent Douban requests
max_concurrency = 5

# Attempts per movie, including the first
max_attempts = 3

# Pause after a failed attempt (seconds)
retry_delay_secs = 5

# Random pause before every attempt (milliseconds)
min_jitter_ms = 1000
max_jitter_ms = 3000

# Request timeout (seconds)
timeout_secs = 10

# Redirects to this host mean Douban wants a captcha solved
verification_host = "sec.douban.com"

referer = "https://movie.douban.com"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.report.page_size, 25);
        assert_eq!(config.report.backup_suffix, ".bak");
        assert_eq!(config.cache.ttl_days, 30);
        assert_eq!(config.scraper.max_concurrency, 5);
        assert_eq!(config.scraper.retry_delay_secs, 5);
        // Not listed in the file, falls back to the built-in pool
        assert_eq!(config.scraper.user_agents.len(), 4);
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
[report]
log_path = "/srv/crawl/report.log"

[scraper]
max_attempts = 5
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.report.log_path, PathBuf::from("/srv/crawl/report.log"));
        assert_eq!(config.report.output_path, PathBuf::from("../index.html"));
        assert_eq!(config.scraper.max_attempts, 5);
        assert_eq!(config.scraper.max_concurrency, 5);
        assert_eq!(config.cache.ttl(), TimeDelta::days(30));
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.report.page_size, DEFAULT_PAGE_SIZE);
        assert!(!config.report.mark_all_new_on_first_run);
        assert!(!config.report.status_base_title_fallback);
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_explicit_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report\nlog_path = ").unwrap();
        assert!(matches!(
            Config::load(Some(&path)).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }
}
