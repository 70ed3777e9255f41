//! Category table mapping file extensions to destination folders.
//!
//! A category is a named bucket ("Images", "Archives", ...) with an ordered list
//! of file name suffixes. The table is ordered: when a file name matches several
//! categories, the first one in table order wins.
//!
//! # Examples
//!
//! ```
//! use downloads_organizer::file_category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.classify("holiday.JPG").map(|c| c.name()), Some("Images"));
//! assert_eq!(table.classify("backup.tar.gz").map(|c| c.name()), Some("Archives"));
//! assert!(table.classify("notes.unknownext").is_none());
//! ```

use crate::config::{CategoryRule, ConfigError};
use std::collections::HashSet;

/// Built-in categories, in matching order.
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Archives", &[".zip", ".tar.gz", ".tgz"]),
    (
        "Documents",
        &[".xlsx", ".docx", ".doc", ".xls", ".ppt", ".pptx", ".pdf"],
    ),
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".ai", ".heic"],
    ),
    ("Videos", &[".mp4", ".mov", ".avi", ".wmv", ".mkv"]),
    ("Models", &[".onnx", ".pth", ".tflite", ".pb", ".trt"]),
    ("Data", &[".json", ".yaml", ".csv", ".xml", ".txt", ".log"]),
    ("Books", &[".mobi", ".epub"]),
    (
        "Code",
        &[
            ".py", ".ipynb", ".c", ".cpp", ".java", ".js", ".html", ".css", ".sql", ".sh",
            ".whl", ".hpp",
        ],
    ),
    ("3D", &[".step", ".stl", ".f3z", ".obj", ".3ds"]),
    ("Audio", &[".wav", ".mp3", ".ogg", ".aac", ".flac", ".m4a"]),
];

/// A named category and the lowercase suffixes that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// The category name, which is also its destination folder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized (lowercase) extensions of this category.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns true if `lowercase_name` ends with one of this category's extensions.
    fn matches(&self, lowercase_name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| lowercase_name.ends_with(ext.as_str()))
    }
}

/// Immutable, ordered category table.
///
/// Built once per run through [`CategoryTable::normalize`] or
/// [`CategoryTable::from_rules`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Builds a normalized table from raw `(name, extensions)` pairs.
    ///
    /// Extensions are trimmed and lowercased. Category order and extension
    /// order are preserved. The input is left untouched.
    pub fn normalize<'a, I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let categories = raw
            .into_iter()
            .map(|(name, extensions)| Category {
                name: name.to_string(),
                extensions: extensions.iter().map(|ext| normalize_extension(ext)).collect(),
            })
            .collect();
        Self { categories }
    }

    /// Builds a table from user-supplied category rules.
    ///
    /// Extensions without a leading dot get one, so `"zip"` matches `a.zip`
    /// but not `gzip`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategory` for an empty or duplicate name, a
    /// name containing a path separator, or a category without extensions.
    pub fn from_rules(rules: &[CategoryRule]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(rules.len());

        for rule in rules {
            let name = rule.name.trim();
            let invalid = |reason: &str| ConfigError::InvalidCategory {
                name: rule.name.clone(),
                reason: reason.to_string(),
            };

            if name.is_empty() {
                return Err(invalid("name is empty"));
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(invalid("name must be a single folder name"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(invalid("category is defined more than once"));
            }

            let extensions: Vec<String> = rule
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .filter(|ext| !ext.is_empty())
                .map(|ext| {
                    if ext.starts_with('.') {
                        ext
                    } else {
                        format!(".{}", ext)
                    }
                })
                .collect();
            if extensions.is_empty() {
                return Err(invalid("no extensions listed"));
            }

            categories.push(Category {
                name: name.to_string(),
                extensions,
            });
        }

        Ok(Self { categories })
    }

    /// Iterates categories in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if the table has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns true if `name` is exactly a category name.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// Index of the first category matching `file_name`, case-insensitively.
    pub fn position(&self, file_name: &str) -> Option<usize> {
        let lowercase = file_name.to_lowercase();
        self.categories.iter().position(|c| c.matches(&lowercase))
    }

    /// Returns the first category whose extension list matches `file_name`.
    pub fn classify(&self, file_name: &str) -> Option<&Category> {
        self.position(file_name).map(|idx| &self.categories[idx])
    }

    /// Builds the selection shortcuts offered by the reorganize prompt.
    pub fn shortcuts(&self) -> Shortcuts {
        Shortcuts::for_names(self.categories.iter().map(|c| c.name.as_str()))
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::normalize(DEFAULT_CATEGORIES.iter().copied())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().to_lowercase()
}

/// Keyboard shortcuts for choosing a category.
///
/// Each category gets the lowercase first character of its name. When two
/// names share that character, both get the shortest prefix no other name
/// starts with (`ar` for Archives, `au` for Audio). A name that is a prefix of
/// another falls back to its full lowercase form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcuts {
    entries: Vec<(String, String)>,
}

impl Shortcuts {
    fn for_names<'a>(names: impl Iterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.collect();
        let lowered: Vec<Vec<char>> = names
            .iter()
            .map(|n| n.to_lowercase().chars().collect())
            .collect();

        let entries = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let own = &lowered[idx];
                let unique_len = (1..=own.len()).find(|&len| {
                    let prefix = &own[..len];
                    lowered
                        .iter()
                        .enumerate()
                        .all(|(other, chars)| other == idx || !chars.starts_with(prefix))
                });
                let len = unique_len.unwrap_or(own.len());
                (own[..len].iter().collect(), name.to_string())
            })
            .collect();

        Self { entries }
    }

    /// `(shortcut, category name)` pairs in table order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Resolves user input to a category name.
    ///
    /// Accepts a shortcut or a full category name, both case-insensitive.
    /// Empty or unknown input resolves to `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use downloads_organizer::file_category::CategoryTable;
    ///
    /// let shortcuts = CategoryTable::default().shortcuts();
    /// assert_eq!(shortcuts.resolve("i"), Some("Images"));
    /// assert_eq!(shortcuts.resolve("AU"), Some("Audio"));
    /// assert_eq!(shortcuts.resolve("books"), Some("Books"));
    /// assert_eq!(shortcuts.resolve(""), None);
    /// ```
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|(shortcut, _)| *shortcut == input)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(_, name)| name.to_lowercase() == input)
            })
            .map(|(_, name)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, extensions: &[&str]) -> CategoryRule {
        CategoryRule {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_table_order() {
        let table = CategoryTable::default();
        let names: Vec<&str> = table.iter().map(Category::name).collect();
        assert_eq!(
            names,
            vec![
                "Archives",
                "Documents",
                "Images",
                "Videos",
                "Models",
                "Data",
                "Books",
                "Code",
                "3D",
                "Audio"
            ]
        );
    }

    #[test]
    fn test_normalize_lowercases_without_touching_input() {
        let raw: &[(&str, &[&str])] = &[("Mixed", &[".ZIP", " .Tar.GZ "])];
        let table = CategoryTable::normalize(raw.iter().copied());

        let category = table.iter().next().expect("one category");
        assert_eq!(category.extensions(), &[".zip", ".tar.gz"]);
        assert_eq!(raw[0].1, &[".ZIP", " .Tar.GZ "]);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("REPORT.PDF").map(Category::name), Some("Documents"));
        assert_eq!(table.classify("Song.Mp3").map(Category::name), Some("Audio"));
    }

    #[test]
    fn test_classify_matches_multi_part_suffix() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("src.tar.gz").map(Category::name), Some("Archives"));
        assert_eq!(table.classify("src.tgz").map(Category::name), Some("Archives"));
    }

    #[test]
    fn test_classify_unknown_extension() {
        let table = CategoryTable::default();
        assert!(table.classify("c.unknownext").is_none());
        assert!(table.classify("README").is_none());
    }

    #[test]
    fn test_first_matching_category_wins() {
        let raw: &[(&str, &[&str])] = &[("First", &[".dup"]), ("Second", &[".dup", ".two"])];
        let table = CategoryTable::normalize(raw.iter().copied());

        assert_eq!(table.classify("a.dup").map(Category::name), Some("First"));
        assert_eq!(table.classify("a.two").map(Category::name), Some("Second"));
        assert_eq!(table.position("a.dup"), Some(0));
    }

    #[test]
    fn test_contains_is_exact() {
        let table = CategoryTable::default();
        assert!(table.contains("Images"));
        assert!(!table.contains("images"));
        assert!(!table.contains("RandomStuff"));
    }

    #[test]
    fn test_default_shortcuts_resolve_collisions() {
        let shortcuts = CategoryTable::default().shortcuts();
        let pairs: Vec<(&str, &str)> = shortcuts
            .entries()
            .iter()
            .map(|(s, n)| (s.as_str(), n.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("ar", "Archives"),
                ("do", "Documents"),
                ("i", "Images"),
                ("v", "Videos"),
                ("m", "Models"),
                ("da", "Data"),
                ("b", "Books"),
                ("c", "Code"),
                ("3", "3D"),
                ("au", "Audio"),
            ]
        );
    }

    #[test]
    fn test_shortcut_for_name_prefix_of_another() {
        let raw: &[(&str, &[&str])] = &[("Doc", &[".d"]), ("Docs", &[".ds"])];
        let shortcuts = CategoryTable::normalize(raw.iter().copied()).shortcuts();

        assert_eq!(shortcuts.resolve("doc"), Some("Doc"));
        assert_eq!(shortcuts.resolve("docs"), Some("Docs"));
        assert_eq!(shortcuts.resolve("d"), None);
    }

    #[test]
    fn test_resolve_unknown_input() {
        let shortcuts = CategoryTable::default().shortcuts();
        assert_eq!(shortcuts.resolve("z"), None);
        assert_eq!(shortcuts.resolve("   "), None);
        // "a" is ambiguous between Archives and Audio
        assert_eq!(shortcuts.resolve("a"), None);
    }

    #[test]
    fn test_from_rules_adds_leading_dot() {
        let table = CategoryTable::from_rules(&[rule("Installers", &["DMG", ".msi"])])
            .expect("valid rules");

        let category = table.iter().next().expect("one category");
        assert_eq!(category.extensions(), &[".dmg", ".msi"]);
        assert_eq!(table.classify("setup.MSI").map(Category::name), Some("Installers"));
        assert!(table.classify("notadmg").is_none());
    }

    #[test]
    fn test_from_rules_rejects_duplicates() {
        let result = CategoryTable::from_rules(&[rule("Images", &[".png"]), rule("images", &[".jpg"])]);
        assert!(matches!(result, Err(ConfigError::InvalidCategory { .. })));
    }

    #[test]
    fn test_from_rules_rejects_bad_names_and_empty_extensions() {
        assert!(CategoryTable::from_rules(&[rule("", &[".png"])]).is_err());
        assert!(CategoryTable::from_rules(&[rule("a/b", &[".png"])]).is_err());
        assert!(CategoryTable::from_rules(&[rule("..", &[".png"])]).is_err());
        assert!(CategoryTable::from_rules(&[rule("Empty", &[])]).is_err());
        assert!(CategoryTable::from_rules(&[rule("Blank", &["  "])]).is_err());
    }
}
