use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum PipelineStatus {
    Running,
    Success,
    Failed,
    Cancelled,
    Timeout,
    Unknown,
}

impl PipelineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Running => "RUNNING",
            PipelineStatus::Success => "SUCCESS",
            PipelineStatus::Failed => "FAILED",
            PipelineStatus::Cancelled => "CANCELLED",
            PipelineStatus::Timeout => "TIMEOUT",
            PipelineStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Unrecognized values coerce to `Unknown` instead of failing the record.
impl From<&str> for PipelineStatus {
    fn from(s: &str) -> Self {
        match s {
            "RUNNING" => PipelineStatus::Running,
            "SUCCESS" => PipelineStatus::Success,
            "FAILED" => PipelineStatus::Failed,
            "CANCELLED" => PipelineStatus::Cancelled,
            "TIMEOUT" => PipelineStatus::Timeout,
            _ => PipelineStatus::Unknown,
        }
    }
}

impl From<String> for PipelineStatus {
    fn from(s: String) -> Self {
        PipelineStatus::from(s.as_str())
    }
}
