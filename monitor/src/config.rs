use std::path::PathBuf;

use analytics::{DetectorConfig, QueryKind, QueryParams, DEFAULT_TREND_DAYS};
use clap::{Parser, ValueEnum};
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "monitor", about = "Monitor data pipeline executions")]
#[command(version)]
pub struct Cli {
    /// Path to the newline-delimited JSON execution log
    #[arg(long, env = "MONITOR_DATA_FILE")]
    pub data_file: PathBuf,

    /// Type of analysis to perform
    #[arg(long, value_enum, env = "MONITOR_QUERY")]
    pub query: QueryArg,

    /// Specific pipeline for targeted queries
    #[arg(long, env = "MONITOR_PIPELINE_ID")]
    pub pipeline_id: Option<String>,

    /// Number of days for trend analysis
    #[arg(
        long,
        env = "MONITOR_DAYS",
        default_value_t = DEFAULT_TREND_DAYS,
        allow_negative_numbers = true
    )]
    pub days: i64,

    /// Executions a pipeline needs before it is compared with its peers
    #[arg(long, env = "MONITOR_MIN_EXECUTIONS", default_value_t = 5)]
    pub min_executions: u64,

    /// Smallest peer population that anomaly statistics are computed for
    #[arg(long, env = "MONITOR_MIN_DATA_POINTS", default_value_t = 3)]
    pub min_data_points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum QueryArg {
    PipelineHealth,
    Anomalies,
    TeamMetrics,
    PerformanceTrends,
    TotalExecutions,
}

impl From<QueryArg> for QueryKind {
    fn from(arg: QueryArg) -> Self {
        match arg {
            QueryArg::PipelineHealth => QueryKind::PipelineHealth,
            QueryArg::Anomalies => QueryKind::Anomalies,
            QueryArg::TeamMetrics => QueryKind::TeamMetrics,
            QueryArg::PerformanceTrends => QueryKind::PerformanceTrends,
            QueryArg::TotalExecutions => QueryKind::TotalExecutions,
        }
    }
}

impl Cli {
    /// Trend window, with non-positive values replaced by the default.
    pub fn days(&self) -> i64 {
        if self.days <= 0 {
            warn!(
                "Invalid days value {}, defaulting to {DEFAULT_TREND_DAYS}",
                self.days
            );
            return DEFAULT_TREND_DAYS;
        }

        self.days
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            min_executions: self.min_executions,
            min_data_points: self.min_data_points,
        }
    }

    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            pipeline_id: self.pipeline_id.clone().filter(|id| !id.is_empty()),
            days: self.days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("monitor").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_apply() {
        let cli = parse(&["--data-file", "runs.jsonl", "--query", "team_metrics"]);

        assert_eq!(cli.query, QueryArg::TeamMetrics);
        assert_eq!(cli.days(), 7);
        assert_eq!(cli.detector_config(), DetectorConfig::default());
        assert_eq!(cli.query_params(), QueryParams::default());
    }

    #[test]
    fn query_names_are_snake_case() {
        for (name, kind) in [
            ("pipeline_health", QueryKind::PipelineHealth),
            ("anomalies", QueryKind::Anomalies),
            ("team_metrics", QueryKind::TeamMetrics),
            ("performance_trends", QueryKind::PerformanceTrends),
            ("total_executions", QueryKind::TotalExecutions),
        ] {
            let cli = parse(&["--data-file", "runs.jsonl", "--query", name]);
            assert_eq!(QueryKind::from(cli.query), kind);
        }
    }

    #[test]
    fn unknown_query_is_rejected() {
        let result = Cli::try_parse_from([
            "monitor",
            "--data-file",
            "runs.jsonl",
            "--query",
            "slowest",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn non_positive_days_fall_back_to_default() {
        let cli = parse(&[
            "--data-file",
            "runs.jsonl",
            "--query",
            "performance_trends",
            "--days",
            "-3",
        ]);
        assert_eq!(cli.days, -3);
        assert_eq!(cli.days(), 7);

        let cli = parse(&[
            "--data-file",
            "runs.jsonl",
            "--query",
            "performance_trends",
            "--days",
            "0",
        ]);
        assert_eq!(cli.days(), 7);
    }

    #[test]
    fn empty_pipeline_id_is_ignored() {
        let cli = parse(&[
            "--data-file",
            "runs.jsonl",
            "--query",
            "pipeline_health",
            "--pipeline-id",
            "",
        ]);
        assert_eq!(cli.query_params().pipeline_id, None);

        let cli = parse(&[
            "--data-file",
            "runs.jsonl",
            "--query",
            "pipeline_health",
            "--pipeline-id",
            "etl",
            "--days",
            "30",
            "--min-executions",
            "10",
        ]);
        assert_eq!(
            cli.query_params(),
            QueryParams {
                pipeline_id: Some("etl".to_string()),
                days: 30,
            }
        );
        assert_eq!(cli.detector_config().min_executions, 10);
    }
}
