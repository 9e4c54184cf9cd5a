use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::aggregator::MetricsAggregator;
use crate::anomaly::{AnomalyDetector, DetectorConfig};
use crate::dtos::{Alert, PerformanceTrend, PipelineExec, TeamMetrics};
use crate::error::Result;
use crate::ingest;
use crate::query::{ErrorResult, Query, QueryKind, QueryParams, QueryResult};

/// Owns the execution log and the metrics built from it, and answers queries
/// over both.
#[derive(Debug, Clone, Default)]
pub struct PipelineMonitor {
    executions: Vec<PipelineExec>,
    metrics: MetricsAggregator,
    detector: AnomalyDetector,
}

impl PipelineMonitor {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            executions: Vec::new(),
            metrics: MetricsAggregator::new(),
            detector: AnomalyDetector::new(config),
        }
    }

    /// Loads a newline-delimited JSON log. Nothing is ingested unless every
    /// line parses.
    pub fn load_executions<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let executions = ingest::read_executions(path)?;
        let count = executions.len();

        self.extend(executions);
        info!(
            "Tracking {} pipelines across {} executions",
            self.metrics.len(),
            self.executions.len()
        );

        Ok(count)
    }

    pub fn extend<I: IntoIterator<Item = PipelineExec>>(&mut self, executions: I) {
        for exec in executions {
            self.ingest(exec);
        }
    }

    pub fn ingest(&mut self, exec: PipelineExec) {
        self.metrics.ingest(&exec);
        self.executions.push(exec);
    }

    pub fn metrics(&self) -> &MetricsAggregator {
        &self.metrics
    }

    pub fn pipeline_health(&self, pipeline_id: Option<&str>) -> QueryResult {
        match pipeline_id {
            Some(pipeline_id) => match self.metrics.health(pipeline_id) {
                Some(health) => QueryResult::PipelineHealth(health),
                None => QueryResult::Error(ErrorResult::new(format!(
                    "Pipeline {pipeline_id} not found"
                ))),
            },
            None => QueryResult::HealthSummary(self.metrics.health_summary()),
        }
    }

    pub fn detect_anomalies(&self) -> Vec<Alert> {
        self.detect_anomalies_at(Utc::now())
    }

    pub fn detect_anomalies_at(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.detector.detect_at(&self.metrics, now)
    }

    /// Rolls pipelines up by team. The success rate is computed from the
    /// summed counts so busy pipelines weigh more than quiet ones.
    pub fn team_metrics(&self) -> IndexMap<String, TeamMetrics> {
        let mut teams: IndexMap<String, TeamMetrics> = IndexMap::new();

        for (_, metrics) in self.metrics.iter() {
            let team = metrics.team.as_deref().unwrap_or("unknown");
            let rollup = teams.entry(team.to_string()).or_default();

            rollup.total_pipelines += 1;
            rollup.total_executions += metrics.total_executions;
            rollup.successful_executions += metrics.successful_executions;
            rollup.failed_executions += metrics.failed_executions;
        }

        for rollup in teams.values_mut() {
            if rollup.total_executions > 0 {
                rollup.avg_success_rate =
                    rollup.successful_executions as f64 / rollup.total_executions as f64 * 100.0;
            }
        }

        teams
    }

    pub fn performance_trends(&self, pipeline_id: &str, days: i64) -> QueryResult {
        self.performance_trends_at(pipeline_id, days, Utc::now())
    }

    /// Summarizes executions of `pipeline_id` that started within `days` of
    /// `now`. The cutoff is expressed in the offset of the first loaded
    /// execution.
    pub fn performance_trends_at(
        &self,
        pipeline_id: &str,
        days: i64,
        now: DateTime<Utc>,
    ) -> QueryResult {
        let now = match self.executions.first() {
            Some(first) => now.with_timezone(first.start_time.offset()),
            None => now.fixed_offset(),
        };
        // A window too wide to represent covers the whole log.
        let cutoff = TimeDelta::try_days(days).and_then(|window| now.checked_sub_signed(window));
        debug!("Trend window for {pipeline_id} starts at {cutoff:?}");

        let recent: Vec<&PipelineExec> = self
            .executions
            .iter()
            .filter(|exec| exec.pipeline_id == pipeline_id)
            .filter(|exec| cutoff.map_or(true, |cutoff| exec.started_since(cutoff)))
            .collect();

        if recent.is_empty() {
            return QueryResult::Error(ErrorResult::new(format!(
                "No executions found for {pipeline_id} in the last {days} days"
            )));
        }

        let durations: Vec<i64> = recent
            .iter()
            .map(|exec| exec.duration)
            .filter(|duration| *duration > 0)
            .collect();
        let successes = recent.iter().filter(|exec| exec.is_success()).count();

        let avg_duration = if durations.is_empty() {
            0.0
        } else {
            let total: f64 = durations.iter().map(|duration| *duration as f64).sum();
            total / durations.len() as f64
        };

        QueryResult::PerformanceTrend(PerformanceTrend {
            pipeline_id: pipeline_id.to_string(),
            total_executions: recent.len(),
            success_rate: successes as f64 / recent.len() as f64 * 100.0,
            avg_duration,
            min_duration: durations.iter().copied().min().unwrap_or(0),
            max_duration: durations.iter().copied().max().unwrap_or(0),
            days_analyzed: days,
        })
    }

    pub fn total_executions(&self) -> usize {
        self.executions.len()
    }

    pub fn query(&self, query: &Query) -> QueryResult {
        self.query_at(query, Utc::now())
    }

    pub fn query_at(&self, query: &Query, now: DateTime<Utc>) -> QueryResult {
        debug!("Running {} query", query.kind());

        match query {
            Query::PipelineHealth { pipeline_id } => self.pipeline_health(pipeline_id.as_deref()),
            Query::Anomalies => QueryResult::Anomalies(self.detect_anomalies_at(now)),
            Query::TeamMetrics => QueryResult::TeamMetrics(self.team_metrics()),
            Query::PerformanceTrends { pipeline_id, days } => {
                self.performance_trends_at(pipeline_id, *days, now)
            }
            Query::TotalExecutions => QueryResult::TotalExecutions(self.total_executions()),
        }
    }

    /// Runs a query named by string. Unknown names produce a descriptive
    /// string result instead of an error.
    pub fn query_named(&self, kind: &str, params: QueryParams) -> QueryResult {
        match kind.parse::<QueryKind>() {
            Ok(kind) => self.query(&Query::new(kind, params)),
            Err(unsupported) => QueryResult::Unsupported(unsupported.to_string()),
        }
    }
}
