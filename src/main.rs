mod cli;
mod config;
mod error;
mod event;
mod model;
mod pipeline;
mod projects;
mod report;
mod resolver;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use report::Reporter;

fn init_tracing() {
    // The runner sets RUNNER_DEBUG=1 when step debug logging is enabled.
    let level = if std::env::var("RUNNER_DEBUG").as_deref() == Ok("1") {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("add_to_project={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let mut reporter = Reporter::stdout();

    if let Err(err) = cli::run(cli, &mut reporter).await {
        reporter.set_failed(&format!("{err:#}"));
    }

    if reporter.has_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
