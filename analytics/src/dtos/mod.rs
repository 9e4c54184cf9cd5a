mod alert;
mod exec_status;
mod performance_trend;
mod pipeline_exec;
mod pipeline_health;
mod team_metrics;

pub use alert::*;
pub use exec_status::*;
pub use performance_trend::*;
pub use pipeline_exec::*;
pub use pipeline_health::*;
pub use team_metrics::*;
