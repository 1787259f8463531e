use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::placeholder::Placeholder;
use crate::domain::LinkStatus;

static DOUBAN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/subject/(\d+)/").expect("valid douban id pattern"));

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("valid parenthetical pattern"));

/// Cloud-storage provider a share link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Quark,
    Baidu,
    Uc,
}

impl StorageProvider {
    /// Providers in the order their lines appear inside a log block.
    pub const ALL: [StorageProvider; 3] =
        [StorageProvider::Quark, StorageProvider::Baidu, StorageProvider::Uc];

    /// Label used by the crawler log, e.g. `夸克网盘链接:`.
    pub fn log_label(self) -> &'static str {
        match self {
            StorageProvider::Quark => "夸克网盘链接:",
            StorageProvider::Baidu => "百度网盘链接:",
            StorageProvider::Uc => "uc网盘链接:",
        }
    }

    /// Short button caption in the report.
    pub fn display_name(self) -> &'static str {
        match self {
            StorageProvider::Quark => "夸克",
            StorageProvider::Baidu => "百度",
            StorageProvider::Uc => "UC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub base_title: String,
    pub storage_links: BTreeMap<StorageProvider, String>,
    pub douban_url: String,
    pub douban_id: String,
    pub cache_key: String,
    pub poster_url: String,
    pub status: LinkStatus,
    pub is_new: bool,
}

impl MovieRecord {
    pub fn new(
        title: impl Into<String>,
        storage_links: BTreeMap<StorageProvider, String>,
        douban_url: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let douban_url = douban_url.into();
        let douban_id = extract_douban_id(&douban_url);
        let cache_key = cache_key(&douban_id, &title);

        Self {
            base_title: base_title(&title),
            title,
            storage_links,
            douban_url,
            douban_id,
            cache_key,
            poster_url: Placeholder::Loading.data_uri().to_string(),
            status: LinkStatus::Unknown,
            is_new: false,
        }
    }

    pub fn link(&self, provider: StorageProvider) -> Option<&str> {
        self.storage_links.get(&provider).map(String::as_str)
    }

    pub fn has_douban(&self) -> bool {
        !self.douban_url.is_empty()
    }
}

/// Numeric Douban subject id from a detail-page URL, or empty.
pub fn extract_douban_id(url: &str) -> String {
    DOUBAN_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Title with every parenthetical qualifier removed.
pub fn base_title(title: &str) -> String {
    PARENTHETICAL.replace_all(title, "").trim().to_string()
}

/// Stable cache identity: the Douban id when known, otherwise a hash of the exact title.
pub fn cache_key(douban_id: &str, title: &str) -> String {
    if !douban_id.is_empty() {
        return format!("douban_{}", douban_id);
    }

    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    format!("name_{}", hex::encode(hasher.finalize()))
}
