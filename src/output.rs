//! Output formatting and styling module.
//!
//! All console output of the CLI goes through here: colored status lines,
//! the progress bar for a run, and the final summary table.

use crate::report::Summary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::success("Your files have been organized.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar over `total` files.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Renders the summary table as lines, without color codes applied to
    /// the layout. Separate from printing so it can be checked in tests.
    pub fn summary_lines(summary: &Summary) -> Vec<String> {
        let width = summary
            .categories
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        let mut lines = Vec::new();
        lines.push(format!("{:<width$} | Files", "Category"));
        lines.push("-".repeat(width + 10));
        for category in &summary.categories {
            lines.push(format!(
                "{:<width$} | {} {}",
                category.name,
                category.count,
                file_word(category.count)
            ));
        }
        lines.push("-".repeat(width + 10));
        lines.push(format!(
            "{:<width$} | {} {}",
            "Total",
            summary.total,
            file_word(summary.total)
        ));
        if summary.errors > 0 {
            lines.push(format!("{:<width$} | {}", "Errors", summary.errors));
        }
        lines
    }

    /// Prints the summary table, followed by any per-file failures.
    pub fn summary_table(summary: &Summary) {
        Self::header("SUMMARY");
        let lines = Self::summary_lines(summary);
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            if i == 0 || (summary.errors == 0 && i == last) {
                println!("{}", line.bold());
            } else if summary.errors > 0 && i == last {
                println!("{}", line.red().bold());
            } else {
                println!("{}", line);
            }
        }

        for line in Self::failure_lines(summary) {
            Self::error(&line);
        }
    }

    /// One line per file that could not be moved.
    pub fn failure_lines(summary: &Summary) -> Vec<String> {
        summary.failures.iter().map(ToString::to_string).collect()
    }

    /// Message printed after the summary table.
    pub fn closing_message(summary: &Summary) -> &'static str {
        if summary.is_complete_success() {
            "Done! Your files have been organized."
        } else {
            "Some files could not be organized; they are listed above and were left in place."
        }
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RunAccounting;

    #[test]
    fn test_summary_lines_layout() {
        let mut accounting = RunAccounting::new();
        accounting.record_move("Images");
        accounting.record_move("Images");
        accounting.record_move("Miscellaneous");

        let lines = OutputFormatter::summary_lines(&accounting.summary());
        assert_eq!(lines[0], "Category      | Files");
        assert_eq!(lines[2], "Images        | 2 files");
        assert_eq!(lines[3], "Miscellaneous | 1 file");
        assert_eq!(lines.last().unwrap(), "Total         | 3 files");
    }

    #[test]
    fn test_summary_lines_empty_run() {
        let lines = OutputFormatter::summary_lines(&RunAccounting::new().summary());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "Total    | 0 files");
    }

    #[test]
    fn test_failures_listed_once_after_table() {
        use crate::report::{MoveFailure, MoveFailureKind};
        use std::path::PathBuf;

        let mut accounting = RunAccounting::new();
        accounting.record_move("Images");
        accounting.record_failure(MoveFailure {
            source_path: PathBuf::from("locked.pdf"),
            destination: PathBuf::from("Documents/locked.pdf"),
            kind: MoveFailureKind::PermissionDenied,
            reason: "permission denied".to_string(),
        });
        let summary = accounting.summary();

        let failures = OutputFormatter::failure_lines(&summary);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("locked.pdf"));
        assert!(
            !OutputFormatter::summary_lines(&summary)
                .iter()
                .any(|line| line.contains("locked.pdf"))
        );
        assert!(OutputFormatter::closing_message(&summary).contains("listed above"));
    }

    #[test]
    fn test_closing_message_on_success() {
        let summary = RunAccounting::new().summary();
        assert_eq!(
            OutputFormatter::closing_message(&summary),
            "Done! Your files have been organized."
        );
    }

    #[test]
    fn test_file_word() {
        assert_eq!(file_word(0), "files");
        assert_eq!(file_word(1), "file");
        assert_eq!(file_word(2), "files");
    }
}
