//! Manifest entry types: one `FileEntry` per declared file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::mangle;

use super::errors::{Error, ErrorKind};

/// Permission bits of a manifest entry.
///
/// Parsed from the manifest's 4-digit octal form (`0644`) for new files, or
/// taken from live metadata for existing files. `Display` always renders the
/// 4-digit octal form the generated scripts pass to `chmod`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileMode(u32);

impl FileMode {
    /// Build from raw permission bits; anything above the low 12 bits
    /// (file-type bits of st_mode) is discarded.
    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & 0o7777)
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl FromStr for FileMode {
    type Err = Error;

    /// Accepts exactly the manifest grammar: a 4-digit octal string with a
    /// leading `0`, e.g. `0644` or `0750`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let valid = s.len() == 4
            && s.starts_with('0')
            && s.bytes().all(|b| (b'0'..=b'7').contains(&b));
        if !valid {
            return Err(Error::new(
                ErrorKind::InvalidPath,
                format!("mode must be a 4-digit octal string starting with 0, got {s:?}"),
            ));
        }
        // All-octal-digits guaranteed above
        let bits = u32::from_str_radix(s, 8).map_err(|e| {
            Error::new(ErrorKind::InvalidPath, format!("mode {s:?}: {e}"))
        })?;
        Ok(Self(bits))
    }
}

/// One manifest-declared file, immutable after parse.
///
/// Existing-file entries carry mode/owner/group captured from live metadata;
/// new-file entries carry the triple declared on their manifest line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    /// The `target` context in force when the entry was declared, if any.
    pub context: Option<PathBuf>,
    /// The file path as written on the manifest line.
    pub name: PathBuf,
    /// True for `new`-declared files (nothing to back up).
    pub is_new: bool,
    pub mode: FileMode,
    pub owner_user: String,
    pub owner_group: String,
    /// The resolved target-machine path: context joined with name.
    pub canonical_path: PathBuf,
    /// `canonical_path` if absolute, else resolved against the working dir.
    pub relative_path: PathBuf,
    /// Flattened staging filename, unique across the entry set.
    pub mangled_name: PathBuf,
    /// Flattened context directory under the staging trees, if a context
    /// was in force.
    pub staging_subdir: Option<String>,
}

impl FileEntry {
    /// Compute the (canonical, relative) path pair for a declared
    /// (context, name) pair without building a full entry. The parser uses
    /// this to locate a file for its metadata lookup before the entry's
    /// mode/owner/group are known.
    #[must_use]
    pub fn locate(
        context: Option<&Path>,
        name: &Path,
        workdir: &Path,
    ) -> (PathBuf, PathBuf) {
        let canonical = match context {
            Some(ctx) => ctx.join(name),
            None => name.to_path_buf(),
        };
        let relative = if canonical.is_absolute() {
            canonical.clone()
        } else {
            workdir.join(&canonical)
        };
        (canonical, relative)
    }

    /// Resolve a declared (context, name) pair into a full entry.
    pub fn resolve(
        context: Option<&Path>,
        name: &Path,
        is_new: bool,
        mode: FileMode,
        owner_user: String,
        owner_group: String,
        workdir: &Path,
    ) -> Self {
        let (canonical_path, relative_path) = Self::locate(context, name, workdir);
        let (staging_subdir, mangled_name) = mangle::mangle(context, name);
        Self {
            context: context.map(Path::to_path_buf),
            name: name.to_path_buf(),
            is_new,
            mode,
            owner_user,
            owner_group,
            canonical_path,
            relative_path,
            mangled_name,
            staging_subdir,
        }
    }
}
