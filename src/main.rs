use clap::Parser;
use sortdir::cli::{Cli, default_log_filter, run_cli};
use sortdir::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(&cli).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run_cli(&cli) {
        Ok(summary) if summary.is_complete_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
