/// Extension-based file categorization.
///
/// This module maps file extensions to named categories (e.g. "Images",
/// "Documents") using an ordered table. The first category whose extension
/// set contains the extension wins; anything unmatched lands in the fallback
/// category.
///
/// # Examples
///
/// ```
/// use sortdir::category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify(".jpg"), "Images");
/// assert_eq!(table.classify("PDF"), "Documents");
/// assert_eq!(table.classify(".xyz"), "Miscellaneous");
/// ```
use std::collections::HashSet;

/// Name of the catch-all category in the built-in table.
pub const FALLBACK_CATEGORY: &str = "Miscellaneous";

/// A named bucket and the extensions that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: HashSet<String>,
}

impl Category {
    /// Creates a category from its name and extensions.
    ///
    /// Extensions are stored lowercase with a leading dot, whatever form
    /// they were given in.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Returns the category name, which is also its folder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this category claims the (already normalized) extension.
    pub fn contains(&self, normalized_ext: &str) -> bool {
        self.extensions.contains(normalized_ext)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

/// Ordered mapping from category name to extensions, with a fallback.
///
/// The fallback category is always present in `categories()` (and therefore
/// gets a folder) but never matches an extension directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
    fallback: String,
}

/// Errors raised when assembling a custom table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two categories share a name.
    #[error("duplicate category name: {0}")]
    DuplicateCategory(String),
    /// A category name is empty or would escape the target directory.
    #[error("invalid category name: {0:?}")]
    InvalidName(String),
}

impl CategoryTable {
    /// Builds a table from ordered categories and a fallback name.
    ///
    /// The fallback is appended as an empty category unless one of the
    /// given categories already carries that name.
    ///
    /// # Errors
    ///
    /// Returns `TableError::DuplicateCategory` if names repeat and
    /// `TableError::InvalidName` for names that are empty or contain a path
    /// separator.
    pub fn new(
        categories: Vec<Category>,
        fallback: impl Into<String>,
    ) -> Result<Self, TableError> {
        let fallback = fallback.into();
        let mut seen = HashSet::new();

        for category in &categories {
            validate_name(category.name())?;
            if !seen.insert(category.name().to_string()) {
                return Err(TableError::DuplicateCategory(category.name().to_string()));
            }
        }
        validate_name(&fallback)?;

        let mut categories = categories;
        if !seen.contains(&fallback) {
            categories.push(Category::new(fallback.clone(), Vec::<&str>::new()));
        }

        Ok(Self {
            categories,
            fallback,
        })
    }

    /// Returns the category for `extension`.
    ///
    /// Accepts the extension with or without a leading dot, in any case.
    /// Never fails: unknown and empty extensions map to the fallback.
    pub fn classify(&self, extension: &str) -> &str {
        let normalized = normalize_extension(extension);
        if normalized.is_empty() {
            return &self.fallback;
        }

        self.categories
            .iter()
            .find(|category| category.contains(&normalized))
            .map(Category::name)
            .unwrap_or(&self.fallback)
    }

    /// All categories in table order, fallback included.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::name)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Returns true if `name` is one of the table's categories.
    pub fn contains_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name() == name)
    }
}

impl Default for CategoryTable {
    /// The built-in table.
    fn default() -> Self {
        let mut categories = vec![
            Category::new("Images", [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg"]),
            Category::new(
                "Documents",
                [".pdf", ".docx", ".doc", ".txt", ".xlsx", ".xls", ".pptx"],
            ),
            Category::new("Music", [".mp3", ".wav", ".flac", ".aac", ".m4a"]),
            Category::new("Videos", [".mp4", ".mkv", ".avi", ".mov", ".wmv", ".webm"]),
            Category::new("Archives", [".zip", ".rar", ".7z", ".tar", ".gz"]),
            Category::new(
                "Code",
                [".py", ".js", ".html", ".css", ".java", ".cpp", ".json"],
            ),
        ];
        categories.push(Category::new(FALLBACK_CATEGORY, Vec::<&str>::new()));

        Self {
            categories,
            fallback: FALLBACK_CATEGORY.to_string(),
        }
    }
}

/// Lowercases an extension and gives it a single leading dot.
///
/// An empty input (or a lone dot) normalizes to the empty string.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim_start_matches('.');
    if trimmed.is_empty() {
        return String::new();
    }
    format!(".{}", trimmed.to_lowercase())
}

fn validate_name(name: &str) -> Result<(), TableError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(TableError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_order() {
        let table = CategoryTable::default();
        let names: Vec<_> = table.names().collect();
        assert_eq!(
            names,
            vec![
                "Images",
                "Documents",
                "Music",
                "Videos",
                "Archives",
                "Code",
                "Miscellaneous"
            ]
        );
    }

    #[test]
    fn test_classify_known_extensions() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".png"), "Images");
        assert_eq!(table.classify(".docx"), "Documents");
        assert_eq!(table.classify(".flac"), "Music");
        assert_eq!(table.classify(".mkv"), "Videos");
        assert_eq!(table.classify(".7z"), "Archives");
        assert_eq!(table.classify(".json"), "Code");
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".JPG"), "Images");
        assert_eq!(table.classify(".jpg"), "Images");
        assert_eq!(table.classify(".JpEg"), "Images");
    }

    #[test]
    fn test_classify_accepts_missing_dot() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("mp3"), "Music");
    }

    #[test]
    fn test_classify_unknown_goes_to_fallback() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".xyz"), "Miscellaneous");
        assert_eq!(table.classify(""), "Miscellaneous");
        assert_eq!(table.classify("."), "Miscellaneous");
    }

    #[test]
    fn test_classify_is_total() {
        let table = CategoryTable::default();
        for ext in ["", ".", ".JPG", ".tar", ".weird", "no_dot", ".Ω", ".PDF "] {
            let category = table.classify(ext);
            assert!(table.contains_category(category), "{ext:?} -> {category}");
        }
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let table = CategoryTable::new(
            vec![
                Category::new("First", [".dup"]),
                Category::new("Second", [".dup", ".other"]),
            ],
            "Rest",
        )
        .unwrap();

        assert_eq!(table.classify(".dup"), "First");
        assert_eq!(table.classify(".other"), "Second");
        assert_eq!(table.classify(".none"), "Rest");
    }

    #[test]
    fn test_custom_table_appends_fallback() {
        let table = CategoryTable::new(vec![Category::new("Pics", ["PNG"])], "Other").unwrap();
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["Pics", "Other"]);
        assert_eq!(table.classify(".png"), "Pics");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = CategoryTable::new(
            vec![Category::new("A", [".a"]), Category::new("A", [".b"])],
            "Other",
        );
        assert_eq!(result, Err(TableError::DuplicateCategory("A".to_string())));
    }

    #[test]
    fn test_path_like_names_rejected() {
        let result = CategoryTable::new(vec![Category::new("../up", [".a"])], "Other");
        assert!(matches!(result, Err(TableError::InvalidName(_))));
    }

    #[test]
    fn test_whitespace_is_part_of_the_extension() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".pdf "), "Miscellaneous");
        assert_eq!(table.classify(" .pdf"), "Miscellaneous");
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PDF "), ".pdf ");
        assert_eq!(normalize_extension("JPG"), ".jpg");
        assert_eq!(normalize_extension(".Tar"), ".tar");
        assert_eq!(normalize_extension(""), "");
    }
}
