//! Output formatting and styling module.
//!
//! All user-facing text goes through [`OutputFormatter`] so styling stays
//! consistent between the organize and cleanup passes.

use crate::organize::{LargeFile, OrganizeReport};
use crate::reconcile::ReconcileReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗, on stderr)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for the move plan
/// - Report and summary tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use downloads_organizer::output::OutputFormatter;
    /// OutputFormatter::success("Moved to Documents: report.pdf");
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
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` planned moves.
    ///
    /// The bar only draws on an interactive terminal. Print through
    /// `ProgressBar::suspend` while it is active so lines are not clobbered.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the large-file report, largest first.
    ///
    /// Each line reads `name: X.XX MB`.
    pub fn large_file_report(large_files: &[LargeFile], threshold: u64) {
        Self::header(&format!(
            "Large Files Report (Files over {}):",
            format_threshold(threshold)
        ));

        if large_files.is_empty() {
            println!("{}", "No large files found.".dimmed());
            return;
        }

        for file in large_files {
            println!("{}", file.to_string().yellow());
        }
    }

    /// Prints the per-category summary table for an organize pass.
    ///
    /// Categories with no files are left out; rows keep table order.
    pub fn summary_table(report: &OrganizeReport) {
        let rows: Vec<(&str, usize)> = report
            .category_counts()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect();
        let total_files: usize = rows.iter().map(|(_, count)| count).sum();

        Self::header(if report.dry_run {
            "SUMMARY (planned)"
        } else {
            "SUMMARY"
        });

        let max_category_len = rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count, "file", "files"),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files, "file", "files"),
            width = max_category_len
        );

        if !report.failures.is_empty() {
            Self::warning(&format!(
                "{} {} could not be moved. See errors above.",
                report.failures.len(),
                plural(report.failures.len(), "file", "files")
            ));
        }
    }

    /// Prints the outcome counts of a cleanup pass.
    pub fn reconcile_summary(report: &ReconcileReport) {
        if report.outcomes.is_empty() {
            Self::info("No unorganized folders found.");
            return;
        }

        let counts = report.counts();
        Self::header(if report.dry_run {
            "CLEANUP SUMMARY (planned)"
        } else {
            "CLEANUP SUMMARY"
        });
        println!("  Deleted: {}", counts.deleted);
        println!("  Moved:   {}", counts.moved);
        println!("  Skipped: {}", counts.skipped);
        if counts.failed > 0 {
            println!("  Failed:  {}", counts.failed.to_string().red());
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn format_threshold(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
