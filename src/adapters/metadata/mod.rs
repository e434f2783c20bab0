pub mod fs;
pub use fs::FsMetadataProvider;

use std::path::Path;

use crate::types::{errors::Result, FileMetadata};

/// Source of permission/ownership metadata for pre-existing files.
///
/// The manifest parser consults this for every existing-file entry; tests
/// and dry environments substitute an in-memory table.
pub trait FileMetadataProvider: Send + Sync {
    /// Get mode and numeric ownership for a regular file at `path`.
    /// # Errors
    /// Returns `ErrorKind::NotFound` when the path is absent or is not a
    /// regular file, `ErrorKind::Io` for anything else.
    fn stat(&self, path: &Path) -> Result<FileMetadata>;
}
