use crate::aggregator::PipelineMetrics;
use crate::dtos::AlertSeverity;

/// Which side of the peer mean counts as anomalous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Low,
    High,
}

/// A metric the detector compares across peer pipelines, together with the
/// policy used to judge it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    SuccessRate,
    AvgDuration,
    AvgRecordsProcessed,
}

impl Metric {
    /// Detection order.
    pub const ALL: [Metric; 3] = [
        Metric::SuccessRate,
        Metric::AvgDuration,
        Metric::AvgRecordsProcessed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::SuccessRate => "success_rate",
            Metric::AvgDuration => "avg_duration",
            Metric::AvgRecordsProcessed => "avg_records_processed",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Metric::SuccessRate | Metric::AvgRecordsProcessed => Direction::Low,
            Metric::AvgDuration => Direction::High,
        }
    }

    fn sigma(self) -> f64 {
        match self {
            Metric::SuccessRate => 1.0,
            Metric::AvgDuration | Metric::AvgRecordsProcessed => 2.0,
        }
    }

    /// Standard deviation substituted when every peer has the same value.
    fn zero_spread_fallback(self) -> Option<f64> {
        match self {
            Metric::SuccessRate => Some(5.0),
            Metric::AvgDuration | Metric::AvgRecordsProcessed => None,
        }
    }

    /// Distance from the peer mean above which an outlier is `High`.
    fn high_severity_delta(self) -> f64 {
        match self {
            Metric::SuccessRate => 30.0,
            Metric::AvgDuration => 100.0,
            Metric::AvgRecordsProcessed => 1000.0,
        }
    }

    /// Contribution of an eligible pipeline to the peer sample.
    pub fn peer_value(self, metrics: &PipelineMetrics) -> Option<f64> {
        match self {
            Metric::SuccessRate => {
                (metrics.total_executions > 0).then(|| metrics.success_rate())
            }
            Metric::AvgDuration => Some(metrics.avg_duration).filter(|value| *value > 0.0),
            Metric::AvgRecordsProcessed => {
                Some(metrics.avg_records_processed).filter(|value| *value > 0.0)
            }
        }
    }

    /// Value of an eligible pipeline checked against the threshold. Unlike the
    /// peer sample, zero averages are still checked.
    pub fn current_value(self, metrics: &PipelineMetrics) -> Option<f64> {
        match self {
            Metric::SuccessRate => {
                (metrics.total_executions > 0).then(|| metrics.success_rate())
            }
            Metric::AvgDuration => Some(metrics.avg_duration),
            Metric::AvgRecordsProcessed => Some(metrics.avg_records_processed),
        }
    }

    pub fn threshold(self, mean: f64, std_dev: f64) -> f64 {
        let std_dev = match self.zero_spread_fallback() {
            Some(fallback) if std_dev <= 0.0 => fallback,
            _ => std_dev,
        };

        match self.direction() {
            Direction::Low => mean - self.sigma() * std_dev,
            Direction::High => mean + self.sigma() * std_dev,
        }
    }

    pub fn is_outlier(self, value: f64, threshold: f64) -> bool {
        match self.direction() {
            Direction::Low => value < threshold,
            Direction::High => value > threshold,
        }
    }

    pub fn classify(self, deviation: f64) -> AlertSeverity {
        if deviation > self.high_severity_delta() {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        }
    }

    pub fn message(self, value: f64, threshold: f64, mean: f64) -> String {
        match self {
            Metric::SuccessRate => format!(
                "Anomalous success rate: {value:.1}% (threshold: {threshold:.1}%, peer mean: {mean:.1}%)"
            ),
            Metric::AvgDuration => format!(
                "Anomalous high duration: {value:.1}s (threshold: {threshold:.1}s, peer mean: {mean:.1}s)"
            ),
            Metric::AvgRecordsProcessed => format!(
                "Anomalous low records processed: {value:.1} (threshold: {threshold:.1}, peer mean: {mean:.1})"
            ),
        }
    }
}
