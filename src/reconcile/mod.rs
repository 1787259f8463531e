use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{base_title, MovieRecord};
use crate::parser::TITLE_LABEL;

/// Flags records whose base title was absent from the previous run's log.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReconciler {
    previous: Option<HashSet<String>>,
    mark_all_new_on_first_run: bool,
}

impl SnapshotReconciler {
    /// Load the previous snapshot. A missing or unreadable backup means "no snapshot".
    pub fn from_backup(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_log_text(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no previous snapshot, nothing to diff against");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read previous snapshot");
                Self::default()
            }
        }
    }

    pub fn from_log_text(content: &str) -> Self {
        let titles = content
            .lines()
            .filter_map(|line| line.trim().strip_prefix(TITLE_LABEL))
            .map(|title| base_title(title.trim()))
            .collect();
        Self::with_previous(titles)
    }

    pub fn with_previous(titles: HashSet<String>) -> Self {
        Self {
            previous: Some(titles),
            mark_all_new_on_first_run: false,
        }
    }

    /// Without a snapshot, mark every record new instead of none.
    pub fn mark_all_new_on_first_run(mut self, enabled: bool) -> Self {
        self.mark_all_new_on_first_run = enabled;
        self
    }

    pub fn has_snapshot(&self) -> bool {
        self.previous.is_some()
    }

    /// Set `is_new` on every record and return how many are new.
    pub fn mark_new(&self, records: &mut [MovieRecord]) -> usize {
        let mut count = 0;
        for record in records.iter_mut() {
            record.is_new = match &self.previous {
                Some(previous) => !previous.contains(&record.base_title),
                None => self.mark_all_new_on_first_run,
            };
            if record.is_new {
                count += 1;
            }
        }
        count
    }
}
