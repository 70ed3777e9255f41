//! Organizer configuration loaded from TOML.
//!
//! Everything is optional. Without a configuration file the built-in category
//! table, a 10 MiB large-file threshold and no exclusions are used.
//!
//! # Configuration File Format
//!
//! ```toml
//! large_file_threshold = 10485760
//!
//! [[categories]]
//! name = "Archives"
//! extensions = [".zip", ".tar.gz", ".tgz"]
//!
//! [filters]
//! skip_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["desktop.ini"]
//! patterns = ["*.part", "*.crdownload"]
//! regex = []
//! ```
//!
//! When `[[categories]]` is present it replaces the built-in table entirely,
//! in the order written.

use crate::file_category::CategoryTable;
use crate::organize::DEFAULT_LARGE_FILE_THRESHOLD;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A category entry that cannot be used as a destination folder.
    InvalidCategory {
        /// The category name as written in the file.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::InvalidCategory { name, reason } => {
                write!(f, "Invalid category '{}': {}", name, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Files strictly larger than this many bytes are listed in the report.
    #[serde(default = "default_large_file_threshold")]
    pub large_file_threshold: u64,

    /// Replacement category table. Empty means use the built-in one.
    #[serde(default)]
    pub categories: Vec<CategoryRule>,

    /// Rules for leaving files out of the organize pass.
    #[serde(default)]
    pub filters: FilterRules,
}

fn default_large_file_threshold() -> u64 {
    DEFAULT_LARGE_FILE_THRESHOLD
}

/// One `[[categories]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category and destination folder name.
    pub name: String,
    /// File name suffixes, e.g. `.zip` or `.tar.gz`.
    pub extensions: Vec<String>,
}

/// Filter rules for the organize pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Leave files whose name starts with "." where they are.
    #[serde(default)]
    pub skip_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "desktop.ini").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `downloads-organizer/config.toml` in the user config directory
    /// 3. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot
    /// be read, or if any file that is found fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            return Self::load_from_file(&user_config);
        }

        Ok(Self::default())
    }

    /// Path of the per-user configuration file, if a config directory exists.
    pub fn user_config_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| {
            dirs.config_dir()
                .join("downloads-organizer")
                .join("config.toml")
        })
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category table this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategory` if a configured category is unusable.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        if self.categories.is_empty() {
            Ok(CategoryTable::default())
        } else {
            CategoryTable::from_rules(&self.categories)
        }
    }

    /// Compile the filter rules for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            large_file_threshold: DEFAULT_LARGE_FILE_THRESHOLD,
            categories: Vec::new(),
            filters: FilterRules::default(),
        }
    }
}

/// Pre-compiled filter rules.
#[derive(Debug, Default)]
pub struct CompiledFilters {
    skip_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden_files: rules.skip_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Check whether a file with this name takes part in the organize pass.
    ///
    /// Checks run in order with early exit: hidden files, exact filename,
    /// glob patterns, regex patterns. Anything not excluded is included.
    pub fn should_include(&self, file_name: &str) -> bool {
        if self.skip_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrganizerConfig::default();
        assert_eq!(config.large_file_threshold, 10 * 1024 * 1024);
        assert!(config.categories.is_empty());
        assert!(!config.filters.skip_hidden_files);
        assert_eq!(
            config.category_table().expect("default table"),
            CategoryTable::default()
        );
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = OrganizerConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.large_file_threshold, DEFAULT_LARGE_FILE_THRESHOLD);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = OrganizerConfig::from_toml(
            r#"
            large_file_threshold = 1024

            [[categories]]
            name = "Installers"
            extensions = [".DMG", "msi"]

            [[categories]]
            name = "Images"
            extensions = [".png"]

            [filters]
            skip_hidden_files = true

            [filters.exclude]
            filenames = ["desktop.ini"]
            patterns = ["*.part"]
            "#,
        )
        .expect("config parses");

        assert_eq!(config.large_file_threshold, 1024);
        let table = config.category_table().expect("valid categories");
        let names: Vec<&str> = table.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Installers", "Images"]);
        assert_eq!(
            table.classify("setup.msi").map(|c| c.name()),
            Some("Installers")
        );
        assert!(table.classify("song.mp3").is_none());

        let filters = config.compile_filters().expect("valid filters");
        assert!(!filters.should_include(".hidden.png"));
        assert!(!filters.should_include("desktop.ini"));
        assert!(!filters.should_include("movie.mkv.part"));
        assert!(filters.should_include("photo.png"));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = OrganizerConfig::from_toml("large_file_threshold = \"big\"");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let config = OrganizerConfig::from_toml(
            r#"
            [[categories]]
            name = "Images"
            extensions = [".png"]

            [[categories]]
            name = "Images"
            extensions = [".jpg"]
            "#,
        )
        .expect("config parses");

        assert!(matches!(
            config.category_table(),
            Err(ConfigError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn test_hidden_files_included_by_default() {
        let filters = OrganizerConfig::default()
            .compile_filters()
            .expect("default filters");
        assert!(filters.should_include(".config.json"));
        assert!(filters.should_include("a.zip"));
    }

    #[test]
    fn test_exclude_regex() {
        let config = OrganizerConfig {
            filters: FilterRules {
                skip_hidden_files: false,
                exclude: ExcludeRules {
                    regex: vec![r"^tmp_.*\.zip$".to_string()],
                    ..Default::default()
                },
            },
            ..Default::default()
        };
        let filters = config.compile_filters().expect("valid regex");

        assert!(!filters.should_include("tmp_build.zip"));
        assert!(filters.should_include("release.zip"));
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let config = OrganizerConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    regex: vec!["[invalid(".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let config = OrganizerConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    patterns: vec!["[invalid".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = OrganizerConfig::load(Some(Path::new("/non/existent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "large_file_threshold = 42\n").expect("Failed to write config");

        let config = OrganizerConfig::load(Some(&path)).expect("config loads");
        assert_eq!(config.large_file_threshold, 42);
    }
}
