//! Shell script generation for the three operator scripts.
//!
//! Each manifest entry renders to one fragment per script kind; a script is
//! the fragments concatenated in manifest order under a `#!/bin/sh` header.
//! Fragment selection is an exhaustive match over `(kind, is_new)`, and
//! every copy-family fragment re-applies the mode/owner/group captured in
//! the entry so a redeploy reproduces original permissions exactly.

use std::path::Path;

use crate::constants::{
    DEPLOY_DIR, DEPLOY_SCRIPT, DIFF_SCRIPT, RESTORE_DIR, RESTORE_SCRIPT,
};
use crate::types::FileEntry;

/// The three generated scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptKind {
    Restore,
    Deploy,
    Diff,
}

impl ScriptKind {
    /// Generation order: restore first so the rollback path exists before
    /// anyone reaches for the deploy script.
    #[must_use]
    pub fn all() -> [ScriptKind; 3] {
        [ScriptKind::Restore, ScriptKind::Deploy, ScriptKind::Diff]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptKind::Restore => "restore",
            ScriptKind::Deploy => "deploy",
            ScriptKind::Diff => "diff",
        }
    }

    /// Destination filename under the working directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            ScriptKind::Restore => RESTORE_SCRIPT,
            ScriptKind::Deploy => DEPLOY_SCRIPT,
            ScriptKind::Diff => DIFF_SCRIPT,
        }
    }
}

/// Quote a string for shell use: single quotes, with embedded single quotes
/// escaped via the `'\''` idiom.
#[must_use]
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn quoted(p: &Path) -> String {
    shell_quote(&p.display().to_string())
}

/// `cp` + `chmod` + `chown` + `chgrp` lines shared by the restore and deploy
/// copy fragments.
fn copy_lines(staged: &Path, entry: &FileEntry, out: &mut String) {
    let target = quoted(&entry.canonical_path);
    out.push_str(&format!("cp {} {}\n", quoted(staged), target));
    out.push_str(&format!("chmod {} {}\n", entry.mode, target));
    out.push_str(&format!(
        "chown {} {}\n",
        shell_quote(&entry.owner_user),
        target
    ));
    out.push_str(&format!(
        "chgrp {} {}\n",
        shell_quote(&entry.owner_group),
        target
    ));
}

/// Render the fragment for one entry under one script kind.
///
/// Staged paths are prefixed with the working directory so the scripts can
/// be run from anywhere.
#[must_use]
pub fn fragment(entry: &FileEntry, kind: ScriptKind, workdir: &Path) -> String {
    let restore_path = workdir.join(RESTORE_DIR).join(&entry.mangled_name);
    let deploy_path = workdir.join(DEPLOY_DIR).join(&entry.mangled_name);
    let mut out = String::new();
    match (kind, entry.is_new) {
        (ScriptKind::Restore, false) => {
            copy_lines(&restore_path, entry, &mut out);
        }
        (ScriptKind::Restore, true) => {
            // The file did not exist before deployment; restoring means
            // removing it again.
            out.push_str(&format!("rm {}\n", quoted(&entry.canonical_path)));
        }
        (ScriptKind::Deploy, false) => {
            copy_lines(&deploy_path, entry, &mut out);
        }
        (ScriptKind::Deploy, true) => {
            if let Some(parent) = entry.canonical_path.parent() {
                out.push_str(&format!("mkdir -p {}\n", quoted(parent)));
            }
            copy_lines(&deploy_path, entry, &mut out);
        }
        (ScriptKind::Diff, false) => {
            out.push_str(&format!("echo {}\n", quoted(&entry.canonical_path)));
            out.push_str(&format!(
                "diff {} {}\n",
                quoted(&restore_path),
                quoted(&entry.canonical_path)
            ));
        }
        (ScriptKind::Diff, true) => {
            // No prior baseline to diff against; list what deployment left.
            out.push_str(&format!("ls -l {}\n", quoted(&entry.canonical_path)));
        }
    }
    out
}

/// Render the full script body for one kind over the entry sequence.
#[must_use]
pub fn render(entries: &[FileEntry], kind: ScriptKind, workdir: &Path) -> String {
    let mut body = String::new();
    body.push_str("#!/bin/sh\n");
    body.push_str(&format!(
        "# {} script generated by packyard; review before running.\n",
        kind.as_str()
    ));
    for entry in entries {
        body.push('\n');
        body.push_str(&fragment(entry, kind, workdir));
    }
    body
}
