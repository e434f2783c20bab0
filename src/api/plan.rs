//! Plan construction: parsed entries in, ordered action list out.
//!
//! Ordering contract:
//! 1. `CreateDirectory` for the `restore/` and `deploy/` roots.
//! 2. `CreateDirectory` for each staging subdirectory under both roots, in
//!    first-seen manifest order, deduplicated on the subdir name.
//! 3. One staging action per entry, in manifest order.
//! 4. The three script-generation actions.

use std::collections::HashSet;
use std::path::Path;

use crate::constants::{DEPLOY_DIR, RESTORE_DIR};
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{AuditSink, FactsEmitter, StageLogger, TS_ZERO};
use crate::script::ScriptKind;
use crate::types::ids::{action_id, plan_id};
use crate::types::{Action, FileEntry, Plan};

/// Build the plan for one entry sequence and emit per-action plan facts.
pub(super) fn build<E: FactsEmitter, A: AuditSink>(
    api: &super::Packyard<E, A>,
    entries: &[FileEntry],
    workdir: &Path,
) -> Plan {
    let restore_root = workdir.join(RESTORE_DIR);
    let deploy_root = workdir.join(DEPLOY_DIR);

    let mut actions: Vec<Action> = vec![
        Action::CreateDirectory {
            path: restore_root.clone(),
        },
        Action::CreateDirectory {
            path: deploy_root.clone(),
        },
    ];

    let mut seen_subdirs: HashSet<String> = HashSet::new();
    for entry in entries {
        if let Some(subdir) = &entry.staging_subdir {
            if seen_subdirs.insert(subdir.clone()) {
                actions.push(Action::CreateDirectory {
                    path: restore_root.join(subdir),
                });
                actions.push(Action::CreateDirectory {
                    path: deploy_root.join(subdir),
                });
            }
        }
    }

    for entry in entries {
        if entry.is_new {
            actions.push(Action::StageNewFile {
                entry: entry.clone(),
                deploy_dest: deploy_root.join(&entry.mangled_name),
            });
        } else {
            actions.push(Action::StageExistingFile {
                entry: entry.clone(),
                restore_dest: restore_root.join(&entry.mangled_name),
                deploy_dest: deploy_root.join(&entry.mangled_name),
            });
        }
    }

    for kind in ScriptKind::all() {
        actions.push(Action::GenerateScript {
            kind,
            dest: workdir.join(kind.file_name()),
            entries: entries.to_vec(),
        });
    }

    let plan = Plan {
        workdir: workdir.to_path_buf(),
        actions,
    };

    // Per-action plan facts with deterministic ids
    let pid = plan_id(&plan);
    let tctx = AuditCtx::new(
        &api.facts,
        pid.to_string(),
        TS_ZERO.to_string(),
        AuditMode {
            dry_run: true,
            redact: true,
        },
    );
    let slog = StageLogger::new(&tctx);
    for (idx, act) in plan.actions.iter().enumerate() {
        slog.plan()
            .action(action_id(&pid, act, idx).to_string())
            .path(act.path().display().to_string())
            .emit_success();
    }

    plan
}
