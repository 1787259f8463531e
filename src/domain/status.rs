use serde::{Deserialize, Serialize};

/// Share-link validity as reported by the external link checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Valid,
    Blocked,
    Invalid,
    #[default]
    Unknown,
}

impl LinkStatus {
    /// Map a checker label (Chinese or English) onto a status.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "有效" | "正常" | "valid" | "ok" => LinkStatus::Valid,
            "屏蔽" | "封禁" | "违规" | "blocked" => LinkStatus::Blocked,
            "失效" | "无效" | "invalid" => LinkStatus::Invalid,
            _ => LinkStatus::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkStatus::Valid => "valid",
            LinkStatus::Blocked => "blocked",
            LinkStatus::Invalid => "invalid",
            LinkStatus::Unknown => "unknown",
        }
    }

    /// Badge text in the report.
    pub fn label(self) -> &'static str {
        match self {
            LinkStatus::Valid => "有效",
            LinkStatus::Blocked => "屏蔽",
            LinkStatus::Invalid => "失效",
            LinkStatus::Unknown => "未知",
        }
    }
}
