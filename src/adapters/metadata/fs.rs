// Default FileMetadataProvider implementation using OS metadata (Unix-only)

use std::path::Path;

use crate::adapters::FileMetadataProvider;
use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::FileMetadata;

#[derive(Copy, Clone, Debug, Default)]
pub struct FsMetadataProvider;

impl FileMetadataProvider for FsMetadataProvider {
    fn stat(&self, path: &Path) -> Result<FileMetadata> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            let md = std::fs::metadata(path).map_err(|e| {
                let kind = if e.kind() == std::io::ErrorKind::NotFound {
                    ErrorKind::NotFound
                } else {
                    ErrorKind::Io
                };
                Error::new(kind, format!("metadata {}: {e}", path.display()))
            })?;
            if !md.is_file() {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("{} is not a regular file", path.display()),
                ));
            }
            Ok(FileMetadata {
                mode: md.mode() & 0o7777,
                uid: md.uid(),
                gid: md.gid(),
            })
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            Err(Error::new(
                ErrorKind::Io,
                "FileMetadataProvider not supported on this platform",
            ))
        }
    }
}
