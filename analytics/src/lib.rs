pub mod aggregator;
pub mod anomaly;
pub mod dtos;
pub mod error;
pub mod ingest;
pub mod monitor;
pub mod query;
pub mod stats;

pub use aggregator::{MetricsAggregator, PipelineMetrics};
pub use anomaly::{AnomalyDetector, DetectorConfig, Metric};
pub use error::{Error, Result};
pub use monitor::PipelineMonitor;
pub use query::{Query, QueryKind, QueryParams, QueryResult, DEFAULT_TREND_DAYS};
