//! Command-line interface module for sortdir.
//!
//! Parses arguments, loads configuration, drives an [`Organizer`] run and
//! renders the result. Nothing in here feeds back into the organizer's
//! decisions.

use crate::category::CategoryTable;
use crate::config::{Config, ConfigError};
use crate::organizer::{ConfigurationError, Organizer, Progress};
use crate::output::OutputFormatter;
use crate::report::Summary;
use clap::Parser;
use std::path::PathBuf;

/// Sort the files of a directory into category folders by extension.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory to organize
    #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub path: PathBuf,

    /// Configuration file (defaults to ./.sortdirrc.toml, then ~/.config/sortdir/config.toml)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Print debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print the summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Errors that end a CLI run before any summary exists.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] ConfigurationError),
    #[error("Failed to render summary: {0}")]
    Render(#[from] serde_json::Error),
}

/// Runs one organization pass as described by `cli`.
///
/// Returns the run summary; the caller decides the exit status from it.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use sortdir::cli::{run_cli, Cli};
///
/// let cli = Cli::parse_from(["sortdir", "/path/to/directory", "--quiet"]);
/// match run_cli(&cli) {
///     Ok(summary) => println!("{} files organized", summary.total),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<Summary, CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let mut organizer =
        Organizer::with_table(&cli.path, CategoryTable::default(), config.organizer)?;

    let show_progress = !cli.quiet && !cli.json;
    if show_progress {
        OutputFormatter::info(&format!(
            "Organizing files in: {}",
            organizer.root().display()
        ));
    }

    let mut progress_bar = None;
    let summary = organizer.organize_with(|progress| {
        if !show_progress {
            return;
        }
        match progress {
            Progress::Started { total: 0 } => OutputFormatter::info("No files to organize!"),
            Progress::Started { total } => {
                progress_bar = Some(OutputFormatter::create_progress_bar(total as u64));
            }
            Progress::Moved {
                entry, category, ..
            } => {
                if let Some(pb) = &progress_bar {
                    pb.set_message(format!("{} → {}/", entry.name, category));
                    pb.inc(1);
                }
            }
            Progress::Failed { entry, .. } => {
                if let Some(pb) = &progress_bar {
                    pb.set_message(format!("{} ✗", entry.name));
                    pb.inc(1);
                }
            }
        }
    })?;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        OutputFormatter::summary_table(&summary);
        let closing = OutputFormatter::closing_message(&summary);
        if summary.is_complete_success() {
            OutputFormatter::success(closing);
        } else {
            OutputFormatter::warning(closing);
        }
    }

    Ok(summary)
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter(cli: &Cli) -> &'static str {
    if cli.verbose {
        "sortdir=debug"
    } else {
        "sortdir=warn"
    }
}
