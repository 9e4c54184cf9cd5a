use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity vocabulary for alerts. The detector currently only produces
/// `Medium` and `High`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub pipeline_id: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub team: String,
    pub timestamp: DateTime<Utc>,
}
