/// Run accounting and the end-of-run summary.
///
/// `RunAccounting` is the mutable tally an organizer keeps while it moves
/// files; `Summary` is the read-only snapshot handed to whoever reports on
/// the run.
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Why a single file could not be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveFailureKind {
    PermissionDenied,
    Other,
}

impl From<std::io::ErrorKind> for MoveFailureKind {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Other,
        }
    }
}

/// A file that stayed where it was because its move failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("could not move {} to {}: {reason}", .source_path.display(), .destination.display())]
pub struct MoveFailure {
    /// The file that was meant to move.
    #[serde(serialize_with = "lossy_path")]
    pub source_path: PathBuf,
    /// Where it was meant to go.
    #[serde(serialize_with = "lossy_path")]
    pub destination: PathBuf,
    pub kind: MoveFailureKind,
    /// The underlying error, rendered.
    pub reason: String,
}

/// Paths are reported as text even when they are not valid UTF-8.
fn lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Per-run tally of successful moves and failures.
#[derive(Debug, Default, Clone)]
pub struct RunAccounting {
    moved: BTreeMap<String, usize>,
    failures: Vec<MoveFailure>,
}

impl RunAccounting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one successful move into `category`.
    pub fn record_move(&mut self, category: &str) {
        *self.moved.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Counts one failed move.
    pub fn record_failure(&mut self, failure: MoveFailure) {
        self.failures.push(failure);
    }

    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    /// Builds the read-only snapshot of this tally.
    pub fn summary(&self) -> Summary {
        let categories: Vec<CategoryCount> = self
            .moved
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(name, &count)| CategoryCount {
                name: name.clone(),
                count,
            })
            .collect();

        Summary {
            total: categories.iter().map(|c| c.count).sum(),
            categories,
            errors: self.failures.len(),
            failures: self.failures.clone(),
        }
    }
}

/// Number of files moved into one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Snapshot of a finished (or in-progress) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Categories with at least one move, sorted by name.
    pub categories: Vec<CategoryCount>,
    /// Sum of all category counts.
    pub total: usize,
    /// Number of files that failed to move.
    pub errors: usize,
    pub failures: Vec<MoveFailure>,
}

impl Summary {
    /// Returns the move count for `category`, zero if nothing went there.
    pub fn count_for(&self, category: &str) -> usize {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map_or(0, |c| c.count)
    }

    /// Returns true if every eligible file was moved.
    pub fn is_complete_success(&self) -> bool {
        self.errors == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(name: &str) -> MoveFailure {
        MoveFailure {
            source_path: PathBuf::from(name),
            destination: PathBuf::from("Documents").join(name),
            kind: MoveFailureKind::PermissionDenied,
            reason: "permission denied".to_string(),
        }
    }

    #[test]
    fn test_empty_accounting() {
        let summary = RunAccounting::new().summary();
        assert!(summary.categories.is_empty());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.errors, 0);
        assert!(summary.is_complete_success());
    }

    #[test]
    fn test_summary_sorted_by_name() {
        let mut accounting = RunAccounting::new();
        accounting.record_move("Videos");
        accounting.record_move("Archives");
        accounting.record_move("Images");
        accounting.record_move("Images");

        let summary = accounting.summary();
        let names: Vec<_> = summary.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Archives", "Images", "Videos"]);
        assert_eq!(summary.count_for("Images"), 2);
        assert_eq!(summary.count_for("Music"), 0);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_failures_do_not_touch_counts() {
        let mut accounting = RunAccounting::new();
        accounting.record_move("Documents");
        accounting.record_failure(failure("locked.pdf"));

        let summary = accounting.summary();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(accounting.error_count(), 1);
        assert!(!summary.is_complete_success());
        assert_eq!(summary.failures[0].kind, MoveFailureKind::PermissionDenied);
    }

    #[test]
    fn test_failure_kind_from_io() {
        assert_eq!(
            MoveFailureKind::from(std::io::ErrorKind::PermissionDenied),
            MoveFailureKind::PermissionDenied
        );
        assert_eq!(
            MoveFailureKind::from(std::io::ErrorKind::NotFound),
            MoveFailureKind::Other
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_summary_serializes_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.txt");
        let mut accounting = RunAccounting::new();
        accounting.record_failure(MoveFailure {
            source_path: PathBuf::from(name),
            destination: Path::new("Documents").join(name),
            kind: MoveFailureKind::Other,
            reason: "busy".to_string(),
        });

        let json = serde_json::to_value(accounting.summary()).expect("serialize failed");
        assert_eq!(json["failures"][0]["source_path"], "caf\u{fffd}.txt");
        assert_eq!(json["errors"], 1);
    }

    #[test]
    fn test_summary_serializes() {
        let mut accounting = RunAccounting::new();
        accounting.record_move("Music");
        let json = serde_json::to_value(accounting.summary()).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["categories"][0]["name"], "Music");
        assert_eq!(json["errors"], 0);
    }
}
