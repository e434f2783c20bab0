//! Mutating collaborators: no-clobber file staging and directory creation.

use std::path::Path;

use crate::fs::staging;
use crate::types::errors::{Error, ErrorKind, Result};

/// Copies file contents into the staging trees.
pub trait FileCopier: Send + Sync {
    /// Copy `source` to `dest`, carrying over the permission bits.
    /// # Errors
    /// Returns `ErrorKind::AlreadyExists` if `dest` is already occupied; the
    /// destination is never overwritten.
    fn copy_new(&self, source: &Path, dest: &Path) -> Result<()>;

    /// Create an empty placeholder at `dest` with the given permission bits.
    /// # Errors
    /// Same no-clobber contract as `copy_new`.
    fn create_empty(&self, dest: &Path, mode: u32) -> Result<()>;
}

/// Ensures staging directories exist.
pub trait DirTreeBuilder: Send + Sync {
    /// Create `path` and any missing parents. A no-op when it already
    /// exists.
    /// # Errors
    /// Returns `ErrorKind::Io` on filesystem failure.
    fn ensure(&self, path: &Path) -> Result<()>;
}

fn map_io(op: &str, path: &Path, e: &std::io::Error) -> Error {
    let kind = if e.kind() == std::io::ErrorKind::AlreadyExists {
        ErrorKind::AlreadyExists
    } else {
        ErrorKind::Io
    };
    Error::new(kind, format!("{op} {}: {e}", path.display()))
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FsFileCopier;

impl FileCopier for FsFileCopier {
    fn copy_new(&self, source: &Path, dest: &Path) -> Result<()> {
        staging::copy_no_clobber(source, dest).map_err(|e| map_io("stage", dest, &e))
    }

    fn create_empty(&self, dest: &Path, mode: u32) -> Result<()> {
        staging::create_placeholder(dest, mode).map_err(|e| map_io("placeholder", dest, &e))
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FsDirTreeBuilder;

impl DirTreeBuilder for FsDirTreeBuilder {
    fn ensure(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io("mkdir", path, &e))
    }
}
