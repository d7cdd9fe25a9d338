/// Sorting a directory's files into category subdirectories.
///
/// An [`Organizer`] is bound to one target directory. A run creates one
/// folder per category, snapshots the eligible files, and moves each into
/// its category folder, renaming on collision. Individual move failures are
/// counted and skipped; only problems with the target directory itself stop
/// a run.
use crate::category::CategoryTable;
use crate::config::OrganizerOptions;
use crate::relocate::{FsRelocator, Relocate};
use crate::report::{MoveFailure, MoveFailureKind, RunAccounting, Summary};
use std::ffi::{OsStr, OsString};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Errors concerning the target directory. These are fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The target path does not exist or is not a directory.
    #[error("Folder not found: {}", .path.display())]
    FolderNotFound { path: PathBuf },
    /// A category folder could not be created.
    #[error("Failed to create folder {}: {source}", .path.display())]
    FolderCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The target directory could not be listed.
    #[error("Failed to read folder {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, ConfigurationError>;

/// A regular file directly inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// The file name exactly as stored on disk.
    pub file_name: OsString,
    /// The file name, lossily converted for display and logging.
    pub name: String,
    /// Extension with its leading dot, or empty if there is none.
    pub extension: String,
}

impl FileEntry {
    fn from_path(path: PathBuf) -> Self {
        let file_name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
        let name = file_name.to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            file_name,
            name,
            extension,
        }
    }
}

/// Progress notifications emitted by [`Organizer::organize_with`].
#[derive(Debug)]
pub enum Progress<'a> {
    /// Folders exist and `total` eligible files were found.
    Started { total: usize },
    /// `entry` was moved to `destination`.
    Moved {
        entry: &'a FileEntry,
        category: &'a str,
        destination: &'a Path,
    },
    /// `entry` could not be moved and stays in place.
    Failed {
        entry: &'a FileEntry,
        category: &'a str,
        failure: &'a MoveFailure,
    },
}

/// Sorts the files of a single directory into category folders.
pub struct Organizer {
    root: PathBuf,
    table: CategoryTable,
    options: OrganizerOptions,
    relocator: Box<dyn Relocate>,
    accounting: RunAccounting,
}

impl std::fmt::Debug for Organizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Organizer")
            .field("root", &self.root)
            .field("table", &self.table)
            .field("options", &self.options)
            .field("accounting", &self.accounting)
            .finish_non_exhaustive()
    }
}

impl Organizer {
    /// Creates an organizer for `root` with the built-in category table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::FolderNotFound` if `root` is not an
    /// existing directory.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::Organizer;
    ///
    /// let mut organizer = Organizer::new("/home/me/Downloads")?;
    /// let summary = organizer.organize_all()?;
    /// println!("moved {} files, {} errors", summary.total, summary.errors);
    /// # Ok::<(), sortdir::ConfigurationError>(())
    /// ```
    pub fn new(root: impl Into<PathBuf>) -> OrganizeResult<Self> {
        Self::with_table(root, CategoryTable::default(), OrganizerOptions::default())
    }

    /// Creates an organizer with an explicit table and options.
    pub fn with_table(
        root: impl Into<PathBuf>,
        table: CategoryTable,
        options: OrganizerOptions,
    ) -> OrganizeResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ConfigurationError::FolderNotFound { path: root });
        }

        Ok(Self {
            root,
            table,
            options,
            relocator: Box::new(FsRelocator),
            accounting: RunAccounting::new(),
        })
    }

    /// Replaces the component that performs the actual moves.
    pub fn with_relocator(mut self, relocator: impl Relocate + 'static) -> Self {
        self.relocator = Box::new(relocator);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Returns the category for `extension`. See [`CategoryTable::classify`].
    pub fn classify(&self, extension: &str) -> &str {
        self.table.classify(extension)
    }

    /// Makes sure every category has a folder directly under the root.
    ///
    /// Existing folders are left alone, so calling this repeatedly is safe.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::FolderCreation` if a folder cannot be
    /// created, or if something that is not a directory occupies its name.
    pub fn ensure_category_folders(&self) -> OrganizeResult<()> {
        for name in self.table.names() {
            let folder = self.root.join(name);

            if folder.is_dir() {
                debug!(folder = name, "category folder already exists");
                continue;
            }

            match fs::create_dir(&folder) {
                Ok(()) => debug!(folder = name, "created category folder"),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && folder.is_dir() => {
                    debug!(folder = name, "category folder already exists");
                }
                Err(source) => {
                    return Err(ConfigurationError::FolderCreation {
                        path: folder,
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    /// Lists the files a run would move, sorted by name.
    ///
    /// Only regular files directly under the root count, including symlinks
    /// that resolve to one. Hidden files and files with the organizer's own
    /// source extension are skipped, as are all directories.
    pub fn eligible_files(&self) -> OrganizeResult<Vec<FileEntry>> {
        let entries = fs::read_dir(&self.root).map_err(|source| ConfigurationError::Unreadable {
            path: self.root.clone(),
            source,
        })?;

        let mut files: Vec<FileEntry> = skip_unreadable(&self.root, entries)
            .filter(is_file_or_link_to_file)
            .map(|entry| FileEntry::from_path(entry.path()))
            .filter(|file| !self.options.is_hidden(&file.name))
            .filter(|file| !self.options.is_self_source(&file.path))
            .collect();

        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    /// Moves one file into `category`'s folder.
    ///
    /// On success the category's counter goes up and the final path is
    /// returned. On failure the error counter goes up, the file stays where it
    /// was, and the failure is returned for reporting; it is never fatal.
    pub fn move_file(&mut self, entry: &FileEntry, category: &str) -> Result<PathBuf, MoveFailure> {
        let folder = self.root.join(category);
        let destination = resolve_collision(&folder, &entry.file_name);

        if destination != folder.join(&entry.file_name) {
            debug!(
                file = %entry.name,
                renamed = %destination.display(),
                "duplicate name, renaming"
            );
        }

        match self.relocator.relocate(&entry.path, &destination) {
            Ok(()) => {
                debug!(file = %entry.name, category, "moved");
                self.accounting.record_move(category);
                Ok(destination)
            }
            Err(e) => {
                let failure = MoveFailure {
                    source_path: entry.path.clone(),
                    destination,
                    kind: MoveFailureKind::from(e.kind()),
                    reason: e.to_string(),
                };
                warn!(file = %entry.name, category, error = %e, "failed to move file");
                self.accounting.record_failure(failure.clone());
                Err(failure)
            }
        }
    }

    /// Runs the whole pipeline and returns the summary.
    ///
    /// # Errors
    ///
    /// Only problems with the target directory are errors; see
    /// [`ConfigurationError`]. Failed moves are reported in the summary.
    pub fn organize_all(&mut self) -> OrganizeResult<Summary> {
        self.organize_with(|_| {})
    }

    /// Like [`organize_all`](Self::organize_all), reporting progress to
    /// `on_progress` as it goes.
    pub fn organize_with<F>(&mut self, mut on_progress: F) -> OrganizeResult<Summary>
    where
        F: FnMut(Progress<'_>),
    {
        info!(root = %self.root.display(), "organizing");

        self.ensure_category_folders()?;
        let files = self.eligible_files()?;
        on_progress(Progress::Started { total: files.len() });

        for entry in &files {
            let category = self.table.classify(&entry.extension).to_string();
            match self.move_file(entry, &category) {
                Ok(destination) => on_progress(Progress::Moved {
                    entry,
                    category: &category,
                    destination: &destination,
                }),
                Err(failure) => on_progress(Progress::Failed {
                    entry,
                    category: &category,
                    failure: &failure,
                }),
            }
        }

        let summary = self.summary();
        info!(
            total = summary.total,
            errors = summary.errors,
            "organization finished"
        );
        Ok(summary)
    }

    /// Snapshot of the moves and failures recorded so far.
    pub fn summary(&self) -> Summary {
        self.accounting.summary()
    }
}

/// Picks a free destination path for `file_name` inside `folder`.
///
/// Returns `folder/file_name` when nothing is there. Otherwise probes
/// `stem_1.ext`, `stem_2.ext`, ... against the filesystem and returns the
/// first name not in use.
pub fn resolve_collision(folder: &Path, file_name: impl AsRef<OsStr>) -> PathBuf {
    let file_name = file_name.as_ref();
    let candidate = folder.join(file_name);
    if !occupied(&candidate) {
        return candidate;
    }

    let (stem, extension) = split_name(file_name);
    (1u64..)
        .map(|n| {
            let mut numbered = stem.to_os_string();
            numbered.push(format!("_{n}"));
            if let Some(extension) = extension {
                numbered.push(".");
                numbered.push(extension);
            }
            folder.join(numbered)
        })
        .find(|path| !occupied(path))
        .unwrap_or(candidate)
}

/// Yields the readable entries, logging the ones that could not be read.
fn skip_unreadable<'a, T>(
    root: &'a Path,
    entries: impl Iterator<Item = std::io::Result<T>> + 'a,
) -> impl Iterator<Item = T> + 'a {
    entries.filter_map(move |entry| match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(root = %root.display(), error = %e, "skipping unreadable entry");
            None
        }
    })
}

/// Regular files, and symlinks whose target is a regular file.
fn is_file_or_link_to_file(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Ok(t) if t.is_file() => true,
        // is_file follows the link
        Ok(t) if t.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

fn occupied(path: &Path) -> bool {
    // symlink_metadata so a dangling symlink still counts as taken
    fs::symlink_metadata(path).is_ok()
}

/// Splits a file name into stem and extension (with its dot).
///
/// Follows `Path` semantics: `archive.tar.gz` splits as `archive.tar` and
/// `gz`, and a name without a dot has no extension. Works on the raw name, so
/// bytes that are not valid UTF-8 survive.
fn split_name(file_name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name);
    (stem, path.extension())
}
