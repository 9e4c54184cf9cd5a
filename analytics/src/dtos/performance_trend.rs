use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceTrend {
    pub pipeline_id: String,
    pub total_executions: usize,
    pub success_rate: f64,
    pub avg_duration: f64,
    pub min_duration: i64,
    pub max_duration: i64,
    pub days_analyzed: i64,
}
