use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanreelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    #[error("No poster found on page")]
    PosterNotFound,

    #[error("Record has no Douban link")]
    MissingDoubanUrl,

    #[error("Failed to read log {path}: {source}")]
    LogRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PanreelError {
    /// Whether another attempt at the same request could succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, PanreelError::MissingDoubanUrl)
    }
}

pub type Result<T> = std::result::Result<T, PanreelError>;
