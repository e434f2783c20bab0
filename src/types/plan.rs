use std::path::PathBuf;

use crate::script::ScriptKind;

use super::entry::FileEntry;

/// Whether `apply` only describes the plan or performs it.
#[derive(Clone, Debug)]
pub enum ApplyMode {
    DryRun,
    Commit,
}

impl Default for ApplyMode {
    fn default() -> Self {
        ApplyMode::DryRun
    }
}

/// One step of the generated plan. Immutable; consumed exactly once by the
/// executor. Each variant carries everything needed to execute or describe
/// itself.
#[derive(Clone, Debug)]
pub enum Action {
    /// Ensure a directory exists. A no-op when it already does.
    CreateDirectory { path: PathBuf },
    /// Copy the live file into both staging trees. Fails without
    /// overwriting if either destination is already occupied.
    StageExistingFile {
        entry: FileEntry,
        restore_dest: PathBuf,
        deploy_dest: PathBuf,
    },
    /// Create an empty placeholder under `deploy/` for a file that does not
    /// exist on the target yet. Nothing is staged under `restore/`.
    StageNewFile {
        entry: FileEntry,
        deploy_dest: PathBuf,
    },
    /// Render one of the three operator scripts over the full entry set.
    GenerateScript {
        kind: ScriptKind,
        dest: PathBuf,
        entries: Vec<FileEntry>,
    },
}

impl Action {
    /// Human-readable description, used by describe mode and dry runs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Action::CreateDirectory { path } => {
                format!("create directory {}", path.display())
            }
            Action::StageExistingFile { entry, .. } => format!(
                "stage existing file {} into restore and deploy as {}",
                entry.canonical_path.display(),
                entry.mangled_name.display()
            ),
            Action::StageNewFile { entry, .. } => format!(
                "stage placeholder for new file {} into deploy as {}",
                entry.canonical_path.display(),
                entry.mangled_name.display()
            ),
            Action::GenerateScript { kind, dest, .. } => {
                format!("generate {} script {}", kind.as_str(), dest.display())
            }
        }
    }

    /// The path this action is primarily about, for fact emission.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        match self {
            Action::CreateDirectory { path } => path.clone(),
            Action::StageExistingFile { entry, .. } | Action::StageNewFile { entry, .. } => {
                entry.canonical_path.clone()
            }
            Action::GenerateScript { dest, .. } => dest.clone(),
        }
    }
}

/// Ordered action list over one working directory.
#[derive(Clone, Debug, Default)]
pub struct Plan {
    pub workdir: PathBuf,
    pub actions: Vec<Action>,
}
