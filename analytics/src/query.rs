use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::dtos::{Alert, PerformanceTrend, PipelineHealth, PipelineHealthSummary, TeamMetrics};

pub const DEFAULT_TREND_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    PipelineHealth,
    Anomalies,
    TeamMetrics,
    PerformanceTrends,
    TotalExecutions,
}

impl QueryKind {
    pub const ALL: [QueryKind; 5] = [
        QueryKind::PipelineHealth,
        QueryKind::Anomalies,
        QueryKind::TeamMetrics,
        QueryKind::PerformanceTrends,
        QueryKind::TotalExecutions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::PipelineHealth => "pipeline_health",
            QueryKind::Anomalies => "anomalies",
            QueryKind::TeamMetrics => "team_metrics",
            QueryKind::PerformanceTrends => "performance_trends",
            QueryKind::TotalExecutions => "total_executions",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedQuery(pub String);

impl fmt::Display for UnsupportedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown query: {}", self.0)
    }
}

impl FromStr for QueryKind {
    type Err = UnsupportedQuery;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnsupportedQuery(s.to_string()))
    }
}

/// Optional arguments shared by every query kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub pipeline_id: Option<String>,
    pub days: i64,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            pipeline_id: None,
            days: DEFAULT_TREND_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    PipelineHealth { pipeline_id: Option<String> },
    Anomalies,
    TeamMetrics,
    PerformanceTrends { pipeline_id: String, days: i64 },
    TotalExecutions,
}

impl Query {
    pub fn new(kind: QueryKind, params: QueryParams) -> Self {
        match kind {
            QueryKind::PipelineHealth => Query::PipelineHealth {
                pipeline_id: params.pipeline_id,
            },
            QueryKind::Anomalies => Query::Anomalies,
            QueryKind::TeamMetrics => Query::TeamMetrics,
            QueryKind::PerformanceTrends => Query::PerformanceTrends {
                pipeline_id: params.pipeline_id.unwrap_or_default(),
                days: params.days,
            },
            QueryKind::TotalExecutions => Query::TotalExecutions,
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Query::PipelineHealth { .. } => QueryKind::PipelineHealth,
            Query::Anomalies => QueryKind::Anomalies,
            Query::TeamMetrics => QueryKind::TeamMetrics,
            Query::PerformanceTrends { .. } => QueryKind::PerformanceTrends,
            Query::TotalExecutions => QueryKind::TotalExecutions,
        }
    }
}

/// `{"error": ...}` payload for recovered lookups that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    PipelineHealth(PipelineHealth),
    HealthSummary(IndexMap<String, PipelineHealthSummary>),
    Anomalies(Vec<Alert>),
    TeamMetrics(IndexMap<String, TeamMetrics>),
    PerformanceTrend(PerformanceTrend),
    TotalExecutions(usize),
    Error(ErrorResult),
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_parse_from_their_names() {
        for kind in QueryKind::ALL {
            assert_eq!(kind.as_str().parse::<QueryKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_describes_itself() {
        let error = "slowest_pipelines".parse::<QueryKind>().unwrap_err();
        assert_eq!(error.to_string(), "Unknown query: slowest_pipelines");
    }

    #[test]
    fn trends_without_pipeline_use_empty_id() {
        let query = Query::new(QueryKind::PerformanceTrends, QueryParams::default());
        assert_eq!(
            query,
            Query::PerformanceTrends {
                pipeline_id: String::new(),
                days: DEFAULT_TREND_DAYS,
            }
        );
        assert_eq!(query.kind(), QueryKind::PerformanceTrends);
    }

    #[test]
    fn results_serialize_without_tags() {
        assert_eq!(
            serde_json::to_value(QueryResult::TotalExecutions(12)).unwrap(),
            json!(12)
        );
        assert_eq!(
            serde_json::to_value(QueryResult::Error(ErrorResult::new("Pipeline x not found")))
                .unwrap(),
            json!({"error": "Pipeline x not found"})
        );
    }
}
