use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use tracing::debug;

use crate::dtos::{PipelineExec, PipelineHealth, PipelineHealthSummary, PipelineStatus};

/// Running statistics for one pipeline, updated in O(1) per execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMetrics {
    pub total_executions: u64,
    pub successful_executions: u64,
    pub failed_executions: u64,
    pub avg_duration: f64,
    pub avg_records_processed: f64,
    pub last_execution: Option<DateTime<FixedOffset>>,
    pub team: Option<String>,
}

impl PipelineMetrics {
    /// Percentage of successful executions, 0 when nothing ran.
    pub fn success_rate(&self) -> f64 {
        if self.total_executions == 0 {
            return 0.0;
        }

        self.successful_executions as f64 / self.total_executions as f64 * 100.0
    }

    fn record(&mut self, exec: &PipelineExec) {
        self.total_executions += 1;
        self.team = exec.team.clone();

        match exec.status {
            PipelineStatus::Success => self.successful_executions += 1,
            PipelineStatus::Failed => self.failed_executions += 1,
            _ => {}
        }

        // The divisor counts every execution, including those that carry no
        // positive sample.
        let n = self.total_executions as f64;
        if exec.duration > 0 {
            self.avg_duration = fold_mean(self.avg_duration, exec.duration as f64, n);
        }
        if exec.records_processed > 0 {
            self.avg_records_processed =
                fold_mean(self.avg_records_processed, exec.records_processed as f64, n);
        }

        self.last_execution = Some(exec.start_time);
    }
}

fn fold_mean(current: f64, sample: f64, n: f64) -> f64 {
    (current * (n - 1.0) + sample) / n
}

/// Per-pipeline metrics keyed by pipeline id, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    pipelines: IndexMap<String, PipelineMetrics>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the metrics for `pipeline_id`, inserting a zeroed entry first
    /// if the pipeline has not been seen yet.
    pub fn entry(&mut self, pipeline_id: &str) -> &mut PipelineMetrics {
        self.pipelines
            .entry(pipeline_id.to_string())
            .or_insert_with(|| {
                debug!("Tracking new pipeline {pipeline_id}");
                PipelineMetrics::default()
            })
    }

    pub fn ingest(&mut self, exec: &PipelineExec) {
        self.entry(&exec.pipeline_id).record(exec);
    }

    pub fn get(&self, pipeline_id: &str) -> Option<&PipelineMetrics> {
        self.pipelines.get(pipeline_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PipelineMetrics)> {
        self.pipelines
            .iter()
            .map(|(pipeline_id, metrics)| (pipeline_id.as_str(), metrics))
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn health(&self, pipeline_id: &str) -> Option<PipelineHealth> {
        let metrics = self.get(pipeline_id)?;

        Some(PipelineHealth {
            pipeline_id: pipeline_id.to_string(),
            success_rate: metrics.success_rate(),
            total_executions: metrics.total_executions,
            failed_executions: metrics.failed_executions,
            avg_duration: metrics.avg_duration,
            avg_records_processed: metrics.avg_records_processed,
            last_execution: metrics.last_execution,
            team: metrics.team.clone(),
        })
    }

    pub fn health_summary(&self) -> IndexMap<String, PipelineHealthSummary> {
        self.iter()
            .map(|(pipeline_id, metrics)| {
                (
                    pipeline_id.to_string(),
                    PipelineHealthSummary {
                        success_rate: metrics.success_rate(),
                        total_executions: metrics.total_executions,
                        team: metrics.team.clone(),
                    },
                )
            })
            .collect()
    }
}
