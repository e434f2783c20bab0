//! Manifest parsing: text in, ordered `FileEntry` sequence out.
//!
//! Parsing is a left fold over the manifest lines carrying an explicit
//! (context, entries) state. All metadata comes from the injected
//! `FileMetadataProvider`; parsing fails before any plan is built, and its
//! only side effect is the idempotent creation of the working directory.

mod line;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::adapters::{DirTreeBuilder, FileMetadataProvider};
use crate::types::errors::ErrorKind;
use crate::types::{FileEntry, FileMode};

use line::Directive;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
    #[error("{path}: not found or not a regular file")]
    FileNotFound { path: PathBuf },
    #[error(
        "staging name collision: {first} and {second} both flatten to {mangled}"
    )]
    MangleCollision {
        first: PathBuf,
        second: PathBuf,
        mangled: PathBuf,
    },
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Default)]
struct FoldState {
    context: Option<PathBuf>,
    entries: Vec<FileEntry>,
}

/// Parse manifest text against a working directory.
///
/// The working directory is created (idempotently) before the first
/// metadata lookup. Entries come back in manifest order.
///
/// # Errors
///
/// `MalformedLine` for a broken keyword directive, `FileNotFound` when an
/// existing-file entry has no regular file behind it, `MangleCollision`
/// when two distinct canonical paths flatten to the same staging name,
/// `Io` for working-directory or metadata failures.
pub fn parse(
    text: &str,
    workdir: &Path,
    provider: &dyn FileMetadataProvider,
    dirs: &dyn DirTreeBuilder,
) -> Result<Vec<FileEntry>, ManifestError> {
    dirs.ensure(workdir)
        .map_err(|e| ManifestError::Io(e.to_string()))?;

    let state = text.lines().enumerate().try_fold(
        FoldState::default(),
        |mut st, (idx, raw)| -> Result<FoldState, ManifestError> {
            let directive = line::classify(raw)
                .map_err(|reason| ManifestError::MalformedLine {
                    line: idx + 1,
                    reason,
                })?;
            match directive {
                None => {}
                Some(Directive::Target(path)) => st.context = Some(path),
                Some(Directive::New {
                    mode,
                    owner,
                    group,
                    path,
                }) => {
                    st.entries.push(FileEntry::resolve(
                        st.context.as_deref(),
                        &path,
                        true,
                        mode,
                        owner,
                        group,
                        workdir,
                    ));
                }
                Some(Directive::Existing(path)) => {
                    let (_, relative) =
                        FileEntry::locate(st.context.as_deref(), &path, workdir);
                    let md = provider.stat(&relative).map_err(|e| match e.kind {
                        ErrorKind::NotFound => ManifestError::FileNotFound {
                            path: relative.clone(),
                        },
                        _ => ManifestError::Io(e.to_string()),
                    })?;
                    st.entries.push(FileEntry::resolve(
                        st.context.as_deref(),
                        &path,
                        false,
                        FileMode::from_bits(md.mode),
                        md.uid.to_string(),
                        md.gid.to_string(),
                        workdir,
                    ));
                }
            }
            Ok(st)
        },
    )?;

    check_staging_names(&state.entries)?;
    Ok(state.entries)
}

/// Uniqueness check over the flattened namespace. The mangling scheme keeps
/// distinct canonical paths apart for ordinary segments, but a segment that
/// itself contains the joiner can collide; refuse such a manifest instead
/// of letting one staged copy overwrite another.
fn check_staging_names(entries: &[FileEntry]) -> Result<(), ManifestError> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for e in entries {
        match seen.get(e.mangled_name.as_path()) {
            Some(prev) if *prev != e.canonical_path.as_path() => {
                return Err(ManifestError::MangleCollision {
                    first: prev.to_path_buf(),
                    second: e.canonical_path.clone(),
                    mangled: e.mangled_name.clone(),
                });
            }
            _ => {
                seen.insert(e.mangled_name.as_path(), e.canonical_path.as_path());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::errors::{Error, Result as TypesResult};
    use crate::types::FileMetadata;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory metadata table keyed by absolute path.
    #[derive(Default)]
    struct TableProvider {
        files: HashMap<PathBuf, FileMetadata>,
    }

    impl TableProvider {
        fn with(mut self, path: &str, mode: u32, uid: u32, gid: u32) -> Self {
            self.files
                .insert(PathBuf::from(path), FileMetadata { mode, uid, gid });
            self
        }
    }

    impl FileMetadataProvider for TableProvider {
        fn stat(&self, path: &Path) -> TypesResult<FileMetadata> {
            self.files.get(path).copied().ok_or_else(|| {
                Error::new(ErrorKind::NotFound, path.display().to_string())
            })
        }
    }

    /// Records ensure() calls instead of touching the filesystem.
    #[derive(Default)]
    struct RecordingDirs {
        ensured: Mutex<Vec<PathBuf>>,
    }

    impl DirTreeBuilder for RecordingDirs {
        fn ensure(&self, path: &Path) -> TypesResult<()> {
            self.ensured.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    const WORKDIR: &str = "/tmp/job1";

    #[test]
    fn scenario_two_entries_with_metadata_capture() {
        let manifest = "target \"/etc/app\"\nnew 0644 root root config.yml\nsecrets.env\n";
        let provider = TableProvider::default().with("/etc/app/secrets.env", 0o600, 500, 500);
        let dirs = RecordingDirs::default();
        let entries =
            parse(manifest, Path::new(WORKDIR), &provider, &dirs).unwrap();

        assert_eq!(entries.len(), 2);
        let new = &entries[0];
        assert!(new.is_new);
        assert_eq!(new.mode.to_string(), "0644");
        assert_eq!(new.owner_user, "root");
        assert_eq!(new.owner_group, "root");
        assert_eq!(new.canonical_path, Path::new("/etc/app/config.yml"));
        assert_eq!(new.staging_subdir.as_deref(), Some("etc__app"));

        let existing = &entries[1];
        assert!(!existing.is_new);
        assert_eq!(existing.mode.to_string(), "0600");
        assert_eq!(existing.owner_user, "500");
        assert_eq!(existing.owner_group, "500");
        assert_eq!(existing.mangled_name, Path::new("etc__app/secrets.env"));

        assert_eq!(
            dirs.ensured.lock().unwrap().as_slice(),
            &[PathBuf::from(WORKDIR)]
        );
    }

    #[test]
    fn context_switches_apply_to_later_lines_only() {
        let manifest = "a.txt\ntarget etc\nb.txt\ntarget var/lib\nc.txt\n";
        let provider = TableProvider::default()
            .with("/tmp/job1/a.txt", 0o644, 0, 0)
            .with("/tmp/job1/etc/b.txt", 0o644, 0, 0)
            .with("/tmp/job1/var/lib/c.txt", 0o644, 0, 0);
        let entries =
            parse(manifest, Path::new(WORKDIR), &provider, &RecordingDirs::default()).unwrap();
        assert_eq!(entries[0].context, None);
        assert_eq!(entries[1].context.as_deref(), Some(Path::new("etc")));
        assert_eq!(entries[2].context.as_deref(), Some(Path::new("var/lib")));
        assert_eq!(entries[2].mangled_name, Path::new("var__lib/c.txt"));
    }

    #[test]
    fn missing_existing_file_fails_parse() {
        let err = parse(
            "ghost.conf\n",
            Path::new(WORKDIR),
            &TableProvider::default(),
            &RecordingDirs::default(),
        )
        .unwrap_err();
        match err {
            ManifestError::FileNotFound { path } => {
                assert_eq!(path, Path::new("/tmp/job1/ghost.conf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_new_line_fails_with_line_number() {
        let manifest = "target etc\nnew 644 root root broken.conf\n";
        let err = parse(
            manifest,
            Path::new(WORKDIR),
            &TableProvider::default(),
            &RecordingDirs::default(),
        )
        .unwrap_err();
        match err {
            ManifestError::MalformedLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn noise_is_ignored_and_order_is_manifest_order() {
        let manifest = "\n# comment\nnew 0644 root root one\nstray junk line\nnew 0600 app app two\n";
        let entries = parse(
            manifest,
            Path::new(WORKDIR),
            &TableProvider::default(),
            &RecordingDirs::default(),
        )
        .unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec![PathBuf::from("one"), PathBuf::from("two")]);
    }

    #[test]
    fn joiner_bearing_segment_collision_is_refused() {
        // `a/b` + `c` and `a__b` + `c` are different canonical paths that
        // flatten to the same staging name.
        let manifest = "target a/b\nnew 0644 root root c\ntarget a__b\nnew 0644 root root c\n";
        let err = parse(
            manifest,
            Path::new(WORKDIR),
            &TableProvider::default(),
            &RecordingDirs::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::MangleCollision { .. }));
    }

    #[test]
    fn same_file_twice_is_not_a_collision_at_parse_time() {
        // Staging will refuse the duplicate at execute time instead.
        let manifest = "new 0644 root root same\nnew 0644 root root same\n";
        let entries = parse(
            manifest,
            Path::new(WORKDIR),
            &TableProvider::default(),
            &RecordingDirs::default(),
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn parse_is_deterministic() {
        let manifest = "target etc\nnew 0644 root root a\nnew 0600 app app b\n";
        let run = || {
            parse(
                manifest,
                Path::new(WORKDIR),
                &TableProvider::default(),
                &RecordingDirs::default(),
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }
}
