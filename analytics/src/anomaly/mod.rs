//! Peer-population anomaly detection.
//!
//! Each [`Metric`] is judged independently: the eligible pipelines form a
//! peer sample, a directional `mean ± k·stdev` threshold is derived from it,
//! and every eligible pipeline beyond the threshold produces an [`Alert`].

mod metric;

pub use metric::{Direction, Metric};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{MetricsAggregator, PipelineMetrics};
use crate::dtos::Alert;
use crate::stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Executions a pipeline needs before it joins the peer population.
    pub min_executions: u64,
    /// Peer sample size below which a metric produces no alerts.
    pub min_data_points: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_executions: 5,
            min_data_points: 3,
        }
    }
}

/// Mean, spread and derived threshold of one metric's peer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerStatistics {
    pub sample_size: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    fn is_eligible(&self, metrics: &PipelineMetrics) -> bool {
        metrics.total_executions >= self.config.min_executions
    }

    pub fn detect(&self, pipelines: &MetricsAggregator) -> Vec<Alert> {
        self.detect_at(pipelines, Utc::now())
    }

    /// Runs every metric pass and stamps the alerts with `now`.
    pub fn detect_at(&self, pipelines: &MetricsAggregator, now: DateTime<Utc>) -> Vec<Alert> {
        Metric::ALL
            .into_iter()
            .flat_map(|metric| self.detect_metric(metric, pipelines, now))
            .collect()
    }

    /// Statistics of the peer sample for `metric`, or `None` when the sample
    /// is too small to be trusted.
    pub fn peer_statistics(
        &self,
        metric: Metric,
        pipelines: &MetricsAggregator,
    ) -> Option<PeerStatistics> {
        let values: Vec<f64> = pipelines
            .iter()
            .filter(|(_, metrics)| self.is_eligible(metrics))
            .filter_map(|(_, metrics)| metric.peer_value(metrics))
            .collect();

        if values.len() < self.config.min_data_points {
            debug!(
                "Skipping {} anomalies: {} peers, {} required",
                metric.name(),
                values.len(),
                self.config.min_data_points
            );
            return None;
        }

        let mean = stats::mean(&values)?;
        let Some(std_dev) = stats::sample_std_dev(&values) else {
            debug!(
                "Skipping {} anomalies: a single peer has no spread",
                metric.name()
            );
            return None;
        };

        Some(PeerStatistics {
            sample_size: values.len(),
            mean,
            std_dev,
            threshold: metric.threshold(mean, std_dev),
        })
    }

    pub fn detect_metric(
        &self,
        metric: Metric,
        pipelines: &MetricsAggregator,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let Some(peers) = self.peer_statistics(metric, pipelines) else {
            return Vec::new();
        };

        debug!(
            "{} peers: n={} mean={:.3} stdev={:.3} threshold={:.3}",
            metric.name(),
            peers.sample_size,
            peers.mean,
            peers.std_dev,
            peers.threshold
        );

        pipelines
            .iter()
            .filter(|(_, metrics)| self.is_eligible(metrics))
            .filter_map(|(pipeline_id, metrics)| {
                let value = metric.current_value(metrics)?;
                if !metric.is_outlier(value, peers.threshold) {
                    return None;
                }

                let deviation = (peers.mean - value).abs();
                Some(Alert {
                    pipeline_id: pipeline_id.to_string(),
                    severity: metric.classify(deviation),
                    message: metric.message(value, peers.threshold, peers.mean),
                    team: metrics
                        .team
                        .clone()
                        .unwrap_or_else(|| "unknown".to_string()),
                    timestamp: now,
                })
            })
            .collect()
    }
}
