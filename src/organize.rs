//! The organize pass: classify the files of one directory level by extension
//! and move each into its category folder.
//!
//! The pass first builds an [`OrganizePlan`] without touching the filesystem,
//! then executes it. A dry run prints the plan instead of executing it, so both
//! modes report the same large files.

use crate::config::CompiledFilters;
use crate::file_category::CategoryTable;
use crate::file_organizer::{FileEntry, FileOrganizer, OrganizeResult};
use crate::output::OutputFormatter;
use std::fmt;
use std::path::{Path, PathBuf};

/// Files strictly larger than this are listed in the large-file report.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A file over the size threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeFile {
    pub name: String,
    pub size: u64,
}

impl LargeFile {
    /// Size in mebibytes.
    pub fn size_in_mb(&self) -> f64 {
        self.size as f64 / BYTES_PER_MB
    }
}

impl fmt::Display for LargeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2} MB", self.name, self.size_in_mb())
    }
}

/// A file and the category folder it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// File name within the target directory.
    pub name: String,
    /// Current path of the file.
    pub source: PathBuf,
    /// Category the file matched.
    pub category: String,
    /// Folder the file goes to.
    pub destination_dir: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

/// Everything an organize pass would do, computed without side effects.
#[derive(Debug, Clone, Default)]
pub struct OrganizePlan {
    /// Category folders, in table order.
    pub category_dirs: Vec<(String, PathBuf)>,
    /// Moves grouped by category in table order, by file name within a category.
    pub moves: Vec<PlannedMove>,
    /// Files over the threshold, largest first.
    pub large_files: Vec<LargeFile>,
}

/// Result of executing (or dry-running) an organize pass.
#[derive(Debug, Clone, Default)]
pub struct OrganizeReport {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Category names in table order.
    pub categories: Vec<String>,
    /// Moves that were performed, or that would be in a dry run.
    pub moved: Vec<PlannedMove>,
    /// Paths that could not be moved and the reason.
    pub failures: Vec<(PathBuf, String)>,
    /// Files over the threshold, largest first.
    pub large_files: Vec<LargeFile>,
}

impl OrganizeReport {
    /// `(category, files moved)` for every category, in table order.
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.categories
            .iter()
            .map(|category| {
                let count = self
                    .moved
                    .iter()
                    .filter(|m| &m.category == category)
                    .count();
                (category.as_str(), count)
            })
            .collect()
    }
}

/// Runs the organize pass over one directory.
///
/// # Examples
///
/// ```no_run
/// use downloads_organizer::file_category::CategoryTable;
/// use downloads_organizer::organize::Organizer;
/// use std::path::Path;
///
/// let table = CategoryTable::default();
/// let report = Organizer::new(&table)
///     .dry_run(true)
///     .run(Path::new("/home/user/Downloads"))
///     .expect("target directory is readable");
/// for file in &report.large_files {
///     println!("{}", file);
/// }
/// ```
pub struct Organizer<'a> {
    table: &'a CategoryTable,
    filters: Option<&'a CompiledFilters>,
    threshold: u64,
    dry_run: bool,
}

impl<'a> Organizer<'a> {
    /// Creates an organizer with the default threshold and no filters.
    pub fn new(table: &'a CategoryTable) -> Self {
        Self {
            table,
            filters: None,
            threshold: DEFAULT_LARGE_FILE_THRESHOLD,
            dry_run: false,
        }
    }

    /// Sets the large-file threshold in bytes.
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Leaves files rejected by `filters` out of the pass.
    pub fn filters(mut self, filters: &'a CompiledFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Computes the plan for `base_path` without modifying anything.
    ///
    /// Each regular file is assigned to the first category in table order whose
    /// extensions match its name; it is never considered for a later category.
    /// Directories are never planned, whatever their name.
    ///
    /// # Errors
    ///
    /// Fails if `base_path` is missing or cannot be listed.
    pub fn plan(&self, base_path: &Path) -> OrganizeResult<OrganizePlan> {
        let entries = FileOrganizer::read_entries(base_path)?;

        let category_dirs: Vec<(String, PathBuf)> = self
            .table
            .iter()
            .map(|c| (c.name().to_string(), base_path.join(c.name())))
            .collect();

        let mut assigned: Vec<(usize, &FileEntry)> = entries
            .iter()
            .filter(|entry| entry.is_file)
            .filter(|entry| self.filters.is_none_or(|f| f.should_include(&entry.name)))
            .filter_map(|entry| self.table.position(&entry.name).map(|idx| (idx, entry)))
            .collect();
        // stable sort keeps name order within a category
        assigned.sort_by_key(|(idx, _)| *idx);

        let moves: Vec<PlannedMove> = assigned
            .into_iter()
            .map(|(idx, entry)| {
                let (category, destination_dir) = &category_dirs[idx];
                PlannedMove {
                    name: entry.name.clone(),
                    source: entry.path.clone(),
                    category: category.clone(),
                    destination_dir: destination_dir.clone(),
                    size: entry.size,
                }
            })
            .collect();

        let mut large_files: Vec<LargeFile> = moves
            .iter()
            .filter(|m| m.size > self.threshold)
            .map(|m| LargeFile {
                name: m.name.clone(),
                size: m.size,
            })
            .collect();
        large_files.sort_by(|a, b| b.size.cmp(&a.size));

        Ok(OrganizePlan {
            category_dirs,
            moves,
            large_files,
        })
    }

    /// Plans and executes the pass over `base_path`.
    ///
    /// Category folders are created (all of them, even those that receive no
    /// files) and files are moved. In dry-run mode the same plan is only
    /// printed. A failed folder creation or move is reported and the pass
    /// carries on with the next file.
    ///
    /// # Errors
    ///
    /// Fails only if `base_path` is missing or cannot be listed.
    pub fn run(&self, base_path: &Path) -> OrganizeResult<OrganizeReport> {
        let plan = self.plan(base_path)?;

        let mut report = OrganizeReport {
            dry_run: self.dry_run,
            categories: plan
                .category_dirs
                .iter()
                .map(|(name, _)| name.clone())
                .collect(),
            large_files: plan.large_files,
            ..Default::default()
        };

        for (name, dir) in &plan.category_dirs {
            if self.dry_run {
                if !dir.is_dir() {
                    OutputFormatter::dry_run_notice(&format!("Would create folder {}", name));
                }
            } else if let Err(e) = FileOrganizer::ensure_dir(dir) {
                OutputFormatter::error(&format!("Error creating folder '{}': {}", name, e));
            }
        }

        let pb = OutputFormatter::create_progress_bar(plan.moves.len() as u64);
        for planned in plan.moves {
            pb.set_message(planned.name.clone());

            if self.dry_run {
                pb.suspend(|| {
                    OutputFormatter::dry_run_notice(&format!(
                        "Would move to {}: {}",
                        planned.category, planned.name
                    ))
                });
                report.moved.push(planned);
            } else {
                match FileOrganizer::move_into(&planned.source, &planned.destination_dir) {
                    Ok(_) => {
                        pb.suspend(|| {
                            OutputFormatter::success(&format!(
                                "Moved to {}: {}",
                                planned.category, planned.name
                            ))
                        });
                        report.moved.push(planned);
                    }
                    Err(e) => {
                        pb.suspend(|| {
                            OutputFormatter::error(&format!(
                                "Error moving '{}': {}",
                                planned.name, e
                            ))
                        });
                        report.failures.push((planned.source, e.to_string()));
                    }
                }
            }

            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(report)
    }
}
