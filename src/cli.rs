//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing
//! - Resolving the target directory
//! - Loading configuration
//! - Running the organize pass, then the cleanup pass

use crate::config::{ConfigError, OrganizerConfig};
use crate::console::Console;
use crate::file_organizer::OrganizeError;
use crate::organize::{OrganizeReport, Organizer};
use crate::output::OutputFormatter;
use crate::reconcile::{ReconcileReport, Reconciler};
use clap::Parser;
use std::path::{Component, Path, PathBuf};

/// Sort a downloads folder into category subfolders by file extension.
#[derive(Debug, Parser)]
#[command(name = "downloads-organizer", version, about)]
pub struct Cli {
    /// Directory to organize [default: your Downloads folder]
    pub path: Option<PathBuf>,

    /// Show what would happen without moving or deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not offer to delete or move unorganized folders afterwards
    #[arg(long)]
    pub no_cleanup: bool,

    /// Configuration file to use instead of the per-user one
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Turns parsed arguments into run options, resolving the target directory.
    pub fn into_options(self) -> RunOptions {
        RunOptions {
            target: self
                .path
                .map(|p| expand_home(&p))
                .unwrap_or_else(default_downloads_dir),
            dry_run: self.dry_run,
            cleanup: !self.no_cleanup,
            config_path: self.config,
        }
    }
}

/// What a single run does.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The directory to organize.
    pub target: PathBuf,
    /// Report only, change nothing.
    pub dry_run: bool,
    /// Run the cleanup pass after organizing.
    pub cleanup: bool,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            dry_run: false,
            cleanup: true,
            config_path: None,
        }
    }
}

/// Reports from both passes of a run.
#[derive(Debug)]
pub struct RunSummary {
    pub organize: OrganizeReport,
    /// `None` when the cleanup pass was disabled.
    pub reconcile: Option<ReconcileReport>,
}

/// Errors that abort a run.
#[derive(Debug)]
pub enum CliError {
    /// The configuration could not be loaded or is invalid.
    Config(ConfigError),
    /// The target directory could not be read.
    Organize(OrganizeError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{}", e),
            Self::Organize(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Organize(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<OrganizeError> for CliError {
    fn from(e: OrganizeError) -> Self {
        Self::Organize(e)
    }
}

/// Runs a full organize (and optionally cleanup) pass.
///
/// Configuration comes from `options.config_path` if set, else from the
/// per-user configuration file if it exists.
///
/// # Errors
///
/// Returns an error only for problems that stop the whole run: bad
/// configuration or an unreadable target directory. Failures on single files
/// or folders are reported as they happen and collected in the summary.
///
/// # Examples
///
/// ```no_run
/// use downloads_organizer::cli::{run_cli, RunOptions};
/// use downloads_organizer::console::TerminalConsole;
///
/// let options = RunOptions::new("/home/user/Downloads");
/// match run_cli(&options, &mut TerminalConsole::new()) {
///     Ok(summary) => println!("{} files organized", summary.organize.moved.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(options: &RunOptions, console: &mut dyn Console) -> Result<RunSummary, CliError> {
    let config = OrganizerConfig::load(options.config_path.as_deref())?;
    run_with_config(options, &config, console)
}

/// Runs a pass with an already-loaded configuration.
pub fn run_with_config(
    options: &RunOptions,
    config: &OrganizerConfig,
    console: &mut dyn Console,
) -> Result<RunSummary, CliError> {
    let table = config.category_table()?;
    let filters = config.compile_filters()?;
    let base_path = options.target.as_path();

    if options.dry_run {
        OutputFormatter::info(&format!(
            "DRY RUN: Analyzing contents of: {}",
            base_path.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));
    }

    let organize = Organizer::new(&table)
        .threshold(config.large_file_threshold)
        .dry_run(options.dry_run)
        .filters(&filters)
        .run(base_path)?;

    OutputFormatter::large_file_report(&organize.large_files, config.large_file_threshold);
    OutputFormatter::summary_table(&organize);

    if options.dry_run {
        OutputFormatter::success("Dry run complete. No files were moved.");
    } else {
        OutputFormatter::success("File organization complete.");
    }

    let reconcile = if options.cleanup {
        let report = Reconciler::new(&table)
            .dry_run(options.dry_run)
            .run(base_path, console)?;
        OutputFormatter::reconcile_summary(&report);
        Some(report)
    } else {
        None
    };

    Ok(RunSummary {
        organize,
        reconcile,
    })
}

/// The platform Downloads folder, or `~/Downloads` if it cannot be determined.
pub fn default_downloads_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .or_else(|| home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Replaces a leading `~` component with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}
