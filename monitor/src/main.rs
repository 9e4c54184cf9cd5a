use std::io;
use std::process::ExitCode;

use analytics::{PipelineMonitor, Query};
use anyhow::{bail, Context};
use clap::Parser;
use config::Cli;
use dotenvy::dotenv;
use tracing::{debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

mod config;
mod render;

fn main() -> ExitCode {
    dotenv().ok();

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_line_number(true)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("{error:#}");
            println!("{}", render::render_error(&error));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    if !cli.data_file.is_file() {
        bail!("Data file not found: {}", cli.data_file.display());
    }

    let query = Query::new(cli.query.into(), cli.query_params());

    let mut monitor = PipelineMonitor::new(cli.detector_config());
    monitor
        .load_executions(&cli.data_file)
        .context("Failed to load executions")?;
    debug!("Running {query:?}");

    let result = monitor.query(&query);
    render::render(&result).context("Failed to render query result")
}
