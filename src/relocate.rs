//! Moving files on disk.
//!
//! The organizer never calls `fs::rename` directly; it goes through a
//! [`Relocate`] implementation so the move step can be swapped out, e.g. to
//! simulate a permission failure for one file.

use std::fs;
use std::io;
use std::path::Path;

/// Moves a single file from one path to another.
pub trait Relocate {
    /// Relocates `from` to `to`. `to` is known not to exist when this is called.
    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Filesystem-backed relocator.
///
/// Tries an atomic rename first. When source and destination sit on
/// different devices the rename cannot work, so the file is copied and the
/// original removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRelocator;

impl Relocate for FsRelocator {
    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                tracing::debug!(
                    from = %from.display(),
                    to = %to.display(),
                    "rename crosses devices, copying instead"
                );
                copy_then_remove(from, to)
            }
            Err(e) => Err(e),
        }
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        // Leave the source as the single copy.
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}
