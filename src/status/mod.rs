//! Auxiliary checker logs.
//!
//! - the status log holds one `name=<link>=<status>` line per checked share
//! - the violation log is the transfer tool's task log; tasks whose files were
//!   removed for policy reasons carry a fixed marker phrase
//!
//! Both are optional inputs: read or parse failures yield empty data.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::domain::{LinkStatus, MovieRecord};

pub const VIOLATION_MARKER: &str = "：文件涉及违规内容";
pub const TASK_NAME_LABEL: &str = "任务名称:";

static TASK_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\d+------------------\n").expect("valid task delimiter"));

/// Status assigned to records the checker never mentioned.
pub const DEFAULT_STATUS: LinkStatus = LinkStatus::Invalid;

/// Name to status lookup built from the checker's status log.
#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    statuses: HashMap<String, LinkStatus>,
    base_title_fallback: bool,
}

impl StatusMap {
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let map = Self::parse(&content);
                info!(path = %path.display(), entries = map.len(), "loaded status log");
                map
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read status log, treating as empty");
                Self::default()
            }
        }
    }

    /// Lines need at least three `=`-separated fields; only the first and third are used.
    pub fn parse(content: &str) -> Self {
        let statuses = content
            .lines()
            .filter_map(|line| {
                let mut fields = line.trim().split('=');
                let name = fields.next()?.trim();
                let status = fields.nth(1)?.trim();
                (!name.is_empty()).then(|| (name.to_string(), LinkStatus::from_label(status)))
            })
            .collect();
        Self {
            statuses,
            base_title_fallback: false,
        }
    }

    /// Also try the parenthetical-stripped title when the exact one is unknown.
    pub fn with_base_title_fallback(mut self, enabled: bool) -> Self {
        self.base_title_fallback = enabled;
        self
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Status for the record's exact title, [`DEFAULT_STATUS`] when absent.
    pub fn lookup(&self, record: &MovieRecord) -> LinkStatus {
        self.statuses
            .get(&record.title)
            .or_else(|| {
                self.base_title_fallback
                    .then(|| self.statuses.get(&record.base_title))
                    .flatten()
            })
            .copied()
            .unwrap_or(DEFAULT_STATUS)
    }

    pub fn apply(&self, records: &mut [MovieRecord]) {
        for record in records.iter_mut() {
            record.status = self.lookup(record);
        }
    }
}

/// Titles flagged as removed for policy reasons, deduplicated in first-seen order.
pub fn load_violations(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let titles = parse_violations(&content);
            info!(path = %path.display(), count = titles.len(), "found violation titles");
            titles
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read violation log, treating as empty");
            Vec::new()
        }
    }
}

pub fn parse_violations(content: &str) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();

    for block in TASK_DELIMITER.split(content) {
        if !block.contains(VIOLATION_MARKER) {
            continue;
        }
        let name = block
            .lines()
            .find_map(|line| line.split_once(TASK_NAME_LABEL).map(|(_, rest)| rest.trim()));
        if let Some(name) = name {
            if !name.is_empty() && !titles.iter().any(|t| t == name) {
                titles.push(name.to_string());
            }
        }
    }

    titles
}
