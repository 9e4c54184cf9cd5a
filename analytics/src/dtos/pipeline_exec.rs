use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;

use super::PipelineStatus;

/// A single pipeline execution as read from the execution log.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineExec {
    pub execution_id: String,
    pub pipeline_id: String,
    pub status: PipelineStatus,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: Option<DateTime<FixedOffset>>,
    /// Seconds, 0 when the log omits it.
    pub duration: i64,
    pub records_processed: i64,
    pub team: Option<String>,
}

/// Wire shape of one log line, before timestamps are parsed and defaults applied.
#[derive(Debug, Deserialize)]
pub struct PipelineExecLine {
    pub execution_id: String,
    pub pipeline_id: String,
    pub status: PipelineStatus,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub records_processed: Option<i64>,
    /// The key is required, but `null` is accepted.
    #[serde(deserialize_with = "Option::deserialize")]
    pub team: Option<String>,
}

/// Parses an ISO-8601 timestamp. A `Z` suffix or explicit offset is honoured,
/// a timestamp without offset is taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).or_else(|rfc3339_error| {
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(|naive| naive.and_utc().fixed_offset())
            .ok_or(rfc3339_error)
    })
}

impl PipelineExec {
    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }

    pub fn started_since(&self, cutoff: DateTime<FixedOffset>) -> bool {
        self.start_time >= cutoff
    }
}
