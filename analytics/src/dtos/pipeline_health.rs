use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineHealth {
    pub pipeline_id: String,
    pub success_rate: f64,
    pub total_executions: u64,
    pub failed_executions: u64,
    pub avg_duration: f64,
    pub avg_records_processed: f64,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub last_execution: Option<DateTime<FixedOffset>>,
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineHealthSummary {
    pub success_rate: f64,
    pub total_executions: u64,
    pub team: Option<String>,
}

/// Writes the offset numerically, so UTC renders as `+00:00` rather than `Z`.
fn serialize_rfc3339<S: Serializer>(
    value: &Option<DateTime<FixedOffset>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(timestamp) => serializer.serialize_some(&timestamp.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}
