use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use shortlink_registry::cli::Cli;
use shortlink_registry::config::{DEFAULT_CONFIG_PATH, get_config, init_config_from};
use shortlink_registry::errors::ShortLinkError;
use shortlink_registry::interfaces::cli::run_cli;
use shortlink_registry::system::logging::init_logging;

fn bootstrap(cli: &Cli) -> anyhow::Result<WorkerGuard> {
    dotenvy::dotenv().ok();

    let path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    init_config_from(path).with_context(|| format!("Failed to load configuration from {}", path))?;

    init_logging(&get_config().logging).context("Failed to initialize logging")
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ShortLinkError>() {
        Some(e) if err.chain().count() == 1 => eprintln!("{}", e.format_colored()),
        _ => eprintln!("Error: {:#}", err),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match bootstrap(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_cli(cli.command).await {
        report(&e);
        std::process::exit(1);
    }
}
