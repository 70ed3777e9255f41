//! downloads-organizer - sort a downloads folder by file extension
//!
//! This library moves the files of one directory into category subfolders
//! chosen by extension, reports files over a size threshold, and walks the user
//! through folders that match no category (delete, file under a category, or
//! leave alone).

pub mod cli;
pub mod config;
pub mod console;
pub mod file_category;
pub mod file_organizer;
pub mod organize;
pub mod output;
pub mod reconcile;

pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use file_category::{Category, CategoryTable, Shortcuts};
pub use file_organizer::{FileOrganizer, OrganizeError, OrganizeResult};
pub use organize::{LargeFile, OrganizeReport, Organizer};
pub use reconcile::{FolderOutcome, ReconcileReport, Reconciler};

pub use cli::{CliError, RunOptions, RunSummary, run_cli};
