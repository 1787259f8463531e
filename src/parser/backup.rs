use std::fs;
use std::path::{Path, PathBuf};

use crate::app::{PanreelError, Result};

/// Backup location for a log: the log path with `suffix` appended to its file name.
pub fn backup_path(log_path: &Path, suffix: &str) -> PathBuf {
    let mut name = log_path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Read the primary log. Failure here is the one fatal error of a run.
pub fn read_log(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| PanreelError::LogRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite the backup with the raw log text.
pub fn write_backup(content: &str, backup: &Path) -> Result<()> {
    if let Some(parent) = backup.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(backup, content)?;
    Ok(())
}
