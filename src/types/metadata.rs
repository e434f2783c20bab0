//! Data-only type for file metadata captured at parse time.
//! Centralized under `crate::types` for cross-layer reuse.

/// Permission bits and numeric ownership of a filesystem path, as reported
/// by a `FileMetadataProvider`.
#[derive(Clone, Copy, Debug)]
pub struct FileMetadata {
    /// Permission bits (the low 12 bits of st_mode)
    pub mode: u32,
    /// User ID of the owner
    pub uid: u32,
    /// Group ID of the owner
    pub gid: u32,
}
