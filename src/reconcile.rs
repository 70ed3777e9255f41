//! The cleanup pass: find subfolders that are not category folders and let the
//! user delete them or file them under a category.
//!
//! Each folder goes through the same sequence: its contents are listed, the
//! user is asked whether to delete it (default no), and if not, which category
//! to move it into (default skip). Folders are handled one at a time in name
//! order. A failed delete or move is reported and leaves the folder in place.

use crate::console::Console;
use crate::file_category::{CategoryTable, Shortcuts};
use crate::file_organizer::{FileOrganizer, OrganizeResult};
use crate::output::OutputFormatter;
use std::path::Path;

/// How one unorganized folder was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// Deleted (or would be, in a dry run).
    Deleted,
    /// Moved under a category folder (or would be, in a dry run).
    Moved { category: String },
    /// Left alone at the user's request.
    Skipped,
    /// The chosen action failed; the folder is still in place.
    Failed { reason: String },
}

/// Tally of a [`ReconcileReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub deleted: usize,
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of every unorganized folder, in the order they were handled.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub dry_run: bool,
    pub outcomes: Vec<(String, FolderOutcome)>,
}

impl ReconcileReport {
    pub fn counts(&self) -> OutcomeCounts {
        self.outcomes
            .iter()
            .fold(OutcomeCounts::default(), |mut counts, (_, outcome)| {
                match outcome {
                    FolderOutcome::Deleted => counts.deleted += 1,
                    FolderOutcome::Moved { .. } => counts.moved += 1,
                    FolderOutcome::Skipped => counts.skipped += 1,
                    FolderOutcome::Failed { .. } => counts.failed += 1,
                }
                counts
            })
    }

    /// The outcome recorded for `folder`, if it was handled.
    pub fn outcome_for(&self, folder: &str) -> Option<&FolderOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == folder)
            .map(|(_, outcome)| outcome)
    }
}

/// Subfolders of `base_path` whose names are not categories, sorted by name.
///
/// # Errors
///
/// Fails if `base_path` is missing or cannot be listed.
pub fn unorganized_folders(base_path: &Path, table: &CategoryTable) -> OrganizeResult<Vec<String>> {
    Ok(FileOrganizer::subfolders(base_path)?
        .into_iter()
        .filter(|name| !table.contains(name))
        .collect())
}

/// Returns true for a "yes" answer. Anything else, including empty input, is no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Runs the cleanup pass.
pub struct Reconciler<'a> {
    table: &'a CategoryTable,
    shortcuts: Shortcuts,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self {
            table,
            shortcuts: table.shortcuts(),
            dry_run: false,
        }
    }

    /// In a dry run the questions are still asked but nothing is deleted or moved.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Handles every unorganized folder under `base_path`.
    ///
    /// # Errors
    ///
    /// Fails only if `base_path` is missing or cannot be listed. Failures on
    /// individual folders are recorded in the report.
    pub fn run(
        &self,
        base_path: &Path,
        console: &mut dyn Console,
    ) -> OrganizeResult<ReconcileReport> {
        let folders = unorganized_folders(base_path, self.table)?;

        let mut report = ReconcileReport {
            dry_run: self.dry_run,
            outcomes: Vec::with_capacity(folders.len()),
        };

        for folder in folders {
            console.clear_screen();
            let outcome = self.handle_folder(base_path, &folder, console);
            report.outcomes.push((folder, outcome));
        }

        Ok(report)
    }

    /// Walks one folder through show → delete? → move? and returns the outcome.
    pub fn handle_folder(
        &self,
        base_path: &Path,
        folder: &str,
        console: &mut dyn Console,
    ) -> FolderOutcome {
        let folder_path = base_path.join(folder);
        Self::display_folder_contents(folder, &folder_path);

        if Self::prompt_delete_folder(folder, console) {
            self.delete_folder(folder, &folder_path)
        } else {
            self.reorganize_folder(base_path, folder, &folder_path, console)
        }
    }

    fn display_folder_contents(folder: &str, folder_path: &Path) {
        OutputFormatter::plain(&format!("Contents of '{}':", folder));
        match FileOrganizer::read_entries(folder_path) {
            Ok(entries) => {
                for entry in entries {
                    OutputFormatter::plain(&format!(" - {}", entry.name));
                }
            }
            Err(e) => OutputFormatter::error(&format!("Could not list '{}': {}", folder, e)),
        }
    }

    fn prompt_delete_folder(folder: &str, console: &mut dyn Console) -> bool {
        let question = format!(
            "Found unorganized folder '{}'. Would you like to delete it? [y/N]: ",
            folder
        );
        is_yes(&Self::ask(console, &question))
    }

    fn delete_folder(&self, folder: &str, folder_path: &Path) -> FolderOutcome {
        if self.dry_run {
            OutputFormatter::dry_run_notice(&format!("Would delete '{}'.", folder));
            return FolderOutcome::Deleted;
        }

        match FileOrganizer::remove_folder(folder_path) {
            Ok(()) => {
                OutputFormatter::success(&format!("Deleted '{}'.", folder));
                FolderOutcome::Deleted
            }
            Err(e) => {
                OutputFormatter::error(&format!("Error deleting '{}': {}", folder, e));
                FolderOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn reorganize_folder(
        &self,
        base_path: &Path,
        folder: &str,
        folder_path: &Path,
        console: &mut dyn Console,
    ) -> FolderOutcome {
        OutputFormatter::plain(&format!("Skipping '{}'.", folder));
        OutputFormatter::plain(
            "Select a category to move to (use the shortcut) or press Enter to skip:",
        );
        for (shortcut, category) in self.shortcuts.entries() {
            OutputFormatter::plain(&format!("{}: {}", shortcut.to_uppercase(), category));
        }

        let answer = Self::ask(console, "Enter the shortcut of the category: ");
        let Some(category) = self.shortcuts.resolve(&answer) else {
            OutputFormatter::plain(&format!("No action taken for '{}'.", folder));
            return FolderOutcome::Skipped;
        };

        let category_dir = base_path.join(category);
        if self.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Would move '{}' to '{}'.",
                folder,
                category_dir.display()
            ));
            return FolderOutcome::Moved {
                category: category.to_string(),
            };
        }

        let moved = FileOrganizer::ensure_dir(&category_dir)
            .and_then(|()| FileOrganizer::move_into(folder_path, &category_dir));
        match moved {
            Ok(_) => {
                OutputFormatter::success(&format!(
                    "Moved '{}' to '{}'.",
                    folder,
                    category_dir.display()
                ));
                FolderOutcome::Moved {
                    category: category.to_string(),
                }
            }
            Err(e) => {
                OutputFormatter::error(&format!("Error moving '{}': {}", folder, e));
                FolderOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// An unreadable answer counts as an empty one.
    fn ask(console: &mut dyn Console, question: &str) -> String {
        console.ask(question).unwrap_or_else(|e| {
            OutputFormatter::warning(&format!("Could not read answer: {}", e));
            String::new()
        })
    }
}
