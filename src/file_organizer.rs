/// Filesystem primitives used by the organize and cleanup passes.
///
/// Every primitive returns an `OrganizeResult` so callers decide whether a
/// failure is fatal (listing the target directory) or only affects one item
/// (a single move or delete).
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The base directory exists but could not be listed.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file or folder.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// The destination already holds an entry with the same name.
    NameCollision {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Failed to delete a folder.
    RemoveFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::NameCollision {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Cannot move {}: {} already exists",
                    source.display(),
                    destination.display()
                )
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "Failed to delete {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBasePath { source, .. }
            | Self::ReadDirFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::RemoveFailed { source, .. } => Some(source),
            Self::MoveFailed { source_error, .. } => Some(source_error),
            Self::NameCollision { .. } => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// One immediate child of a directory.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// The entry's file name.
    pub name: String,
    /// The full path to the entry.
    pub path: PathBuf,
    /// True for regular files, following symlinks.
    pub is_file: bool,
    /// True for directories, following symlinks.
    pub is_dir: bool,
    /// Size in bytes; zero for anything but regular files.
    pub size: u64,
}

/// Filesystem operations on a single directory level.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Lists the immediate children of `base_path`, sorted by name.
    ///
    /// Entries whose metadata cannot be read (dangling symlinks, races with
    /// external deletion) are reported as neither file nor directory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBasePath` if `base_path` is missing or not a directory,
    /// and `ReadDirFailed` if it cannot be listed.
    pub fn read_entries(base_path: &Path) -> OrganizeResult<Vec<FileEntry>> {
        Self::validate_base_path(base_path)?;

        let entries = fs::read_dir(base_path).map_err(|e| OrganizeError::ReadDirFailed {
            path: base_path.to_path_buf(),
            source: e,
        })?;

        let mut files: Vec<FileEntry> = entries
            .flatten()
            .map(|entry| {
                let path = entry.path();
                let metadata = fs::metadata(&path).ok();
                let is_file = metadata.as_ref().is_some_and(|m| m.is_file());
                FileEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: metadata.as_ref().is_some_and(|m| m.is_dir()),
                    size: metadata.filter(|_| is_file).map_or(0, |m| m.len()),
                    is_file,
                    path,
                }
            })
            .collect();

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Names of the subfolders directly under `base_path`, sorted.
    pub fn subfolders(base_path: &Path) -> OrganizeResult<Vec<String>> {
        Ok(Self::read_entries(base_path)?
            .into_iter()
            .filter(|entry| entry.is_dir)
            .map(|entry| entry.name)
            .collect())
    }

    /// Creates `path` (and missing parents) unless it is already a directory.
    pub fn ensure_dir(path: &Path) -> OrganizeResult<()> {
        if path.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Moves a file or folder into `destination_dir`, keeping its name.
    ///
    /// Nothing is overwritten: if `destination_dir` already holds an entry with
    /// the same name the move fails with `NameCollision`.
    ///
    /// # Returns
    ///
    /// The new path of the moved entry.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use downloads_organizer::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// match FileOrganizer::move_into(
    ///     Path::new("/home/user/Downloads/report.pdf"),
    ///     Path::new("/home/user/Downloads/Documents"),
    /// ) {
    ///     Ok(new_path) => println!("Moved to {}", new_path.display()),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn move_into(source: &Path, destination_dir: &Path) -> OrganizeResult<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| OrganizeError::MoveFailed {
            source: source.to_path_buf(),
            destination: destination_dir.to_path_buf(),
            source_error: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path has no name component",
            ),
        })?;

        let destination = destination_dir.join(file_name);

        if fs::symlink_metadata(&destination).is_ok() {
            return Err(OrganizeError::NameCollision {
                source: source.to_path_buf(),
                destination,
            });
        }

        fs::rename(source, &destination).map_err(|e| OrganizeError::MoveFailed {
            source: source.to_path_buf(),
            destination: destination.clone(),
            source_error: e,
        })?;

        Ok(destination)
    }

    /// Recursively deletes the folder at `path`.
    pub fn remove_folder(path: &Path) -> OrganizeResult<()> {
        fs::remove_dir_all(path).map_err(|e| OrganizeError::RemoveFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn validate_base_path(base_path: &Path) -> OrganizeResult<()> {
        if !base_path.exists() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist",
                ),
            });
        }

        if !base_path.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "base path is not a directory",
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir_path = temp_dir.path().join("Archives");

        FileOrganizer::ensure_dir(&dir_path).expect("Failed to create directory");
        assert!(dir_path.is_dir());
    }

    #[test]
    fn test_ensure_dir_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir_path = temp_dir.path().join("Archives");
        fs::create_dir(&dir_path).expect("Failed to create directory");
        fs::write(dir_path.join("kept.zip"), "zip").expect("Failed to write file");

        FileOrganizer::ensure_dir(&dir_path).expect("Existing directory should be fine");
        assert!(dir_path.join("kept.zip").exists());
    }

    #[test]
    fn test_move_into_moves_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("test_file.txt");
        fs::write(&file_path, "Test content").expect("Failed to write test file");
        let dest = base_path.join("dest");
        fs::create_dir(&dest).expect("Failed to create destination");

        let new_path = FileOrganizer::move_into(&file_path, &dest).expect("Failed to move file");

        assert!(!file_path.exists());
        assert_eq!(new_path, dest.join("test_file.txt"));
        assert_eq!(
            fs::read_to_string(&new_path).expect("Failed to read moved file"),
            "Test content"
        );
    }

    #[test]
    fn test_move_into_moves_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let source = base_path.join("source");
        fs::create_dir(&source).expect("Failed to create source");
        fs::write(source.join("inner.txt"), "x").expect("Failed to write inner file");
        let target = base_path.join("target");
        fs::create_dir(&target).expect("Failed to create target");

        FileOrganizer::move_into(&source, &target).expect("Failed to move folder");

        assert!(!source.exists());
        assert!(target.join("source").join("inner.txt").exists());
    }

    #[test]
    fn test_move_into_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("a.zip");
        fs::write(&file_path, "new").expect("Failed to write file");
        let dest = base_path.join("Archives");
        fs::create_dir(&dest).expect("Failed to create destination");
        fs::write(dest.join("a.zip"), "old").expect("Failed to write existing file");

        let result = FileOrganizer::move_into(&file_path, &dest);

        assert!(matches!(result, Err(OrganizeError::NameCollision { .. })));
        assert!(file_path.exists());
        assert_eq!(
            fs::read_to_string(dest.join("a.zip")).expect("Failed to read file"),
            "old"
        );
    }

    #[test]
    fn test_move_into_missing_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("a.zip");
        fs::write(&file_path, "zip").expect("Failed to write file");

        let result = FileOrganizer::move_into(&file_path, &temp_dir.path().join("missing"));

        assert!(matches!(result, Err(OrganizeError::MoveFailed { .. })));
        assert!(file_path.exists());
    }

    #[test]
    fn test_remove_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path().join("test_folder");
        fs::create_dir_all(folder.join("nested")).expect("Failed to create folders");
        fs::write(folder.join("nested").join("f.txt"), "x").expect("Failed to write file");

        FileOrganizer::remove_folder(&folder).expect("Failed to delete folder");
        assert!(!folder.exists());
    }

    #[test]
    fn test_remove_missing_folder_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = FileOrganizer::remove_folder(&temp_dir.path().join("gone"));
        assert!(matches!(result, Err(OrganizeError::RemoveFailed { .. })));
    }

    #[test]
    fn test_read_entries_sorted_with_sizes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("b.txt"), "12345").expect("Failed to write file");
        fs::write(base_path.join("a.txt"), "1").expect("Failed to write file");
        fs::create_dir(base_path.join("c_dir")).expect("Failed to create dir");

        let entries = FileOrganizer::read_entries(base_path).expect("Failed to read entries");
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["a.txt", "b.txt", "c_dir"]);
        assert_eq!(entries[1].size, 5);
        assert!(entries[1].is_file);
        assert!(entries[2].is_dir);
        assert!(!entries[2].is_file);
    }

    #[test]
    fn test_subfolders() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        for folder in ["folder3", "folder1", "folder2"] {
            fs::create_dir(base_path.join(folder)).expect("Failed to create folder");
        }
        fs::write(base_path.join("file.txt"), "x").expect("Failed to write file");

        let folders = FileOrganizer::subfolders(base_path).expect("Failed to list folders");
        assert_eq!(folders, vec!["folder1", "folder2", "folder3"]);
    }

    #[test]
    fn test_read_entries_invalid_base_path() {
        let result = FileOrganizer::read_entries(Path::new("/non/existent/path"));
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }

    #[test]
    fn test_read_entries_on_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("plain.txt");
        fs::write(&file_path, "x").expect("Failed to write file");

        let result = FileOrganizer::read_entries(&file_path);
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }
}
