//! Apply stage: executes plan actions in order, or describes them.
//!
//! Side-effects:
//! - Emits facts for `apply.attempt`, one `apply.result` per action, and a
//!   closing `apply.result` summary; `sidecar.result` after a successful
//!   commit.
//! - Commit mode aborts the remaining plan on the first failure. Completed
//!   actions are left in place; a re-run redoes directory creation as a
//!   no-op and refuses any staging destination that is already occupied.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use log::Level;
use serde_json::{json, Value};

use crate::fs::sidecar::{write_sidecar, PackageSidecar, SidecarEntry};
use crate::fs::{meta, staging};
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter, StageLogger};
use crate::script;
use crate::types::ids::{action_id, plan_id};
use crate::types::{Action, ApplyMode, ApplyReport, Plan};

use super::errors::{error_id_for, exit_code_for, id_str, ApiError};
use super::Packyard;

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &Packyard<E, A>,
    plan: &Plan,
    mode: ApplyMode,
) -> ApplyReport {
    let t0 = Instant::now();
    let dry = matches!(mode, ApplyMode::DryRun);
    let pid = plan_id(plan);
    let tctx = AuditCtx::new(
        &api.facts,
        pid.to_string(),
        ts_for_mode(&mode),
        AuditMode {
            dry_run: dry,
            redact: dry,
        },
    );
    let slog = StageLogger::new(&tctx);

    api.audit.log(Level::Info, "apply: starting");
    slog.apply_attempt()
        .field("actions", json!(plan.actions.len()))
        .emit_success();

    let mut executed: Vec<Action> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut hashes: HashMap<PathBuf, String> = HashMap::new();

    for (idx, act) in plan.actions.iter().enumerate() {
        let aid = action_id(&pid, act, idx).to_string();
        let path = act.path().display().to_string();
        if dry {
            slog.apply_result()
                .action(&aid)
                .path(path)
                .field("description", json!(act.describe()))
                .emit_success();
            continue;
        }
        match execute_action(api, act, plan, &mut hashes) {
            Ok(extra) => {
                slog.apply_result()
                    .action(&aid)
                    .path(path)
                    .merge(&extra)
                    .emit_success();
                executed.push(act.clone());
            }
            Err(e) => {
                let eid = error_id_for(&e);
                slog.apply_result()
                    .action(&aid)
                    .path(path)
                    .field("error", json!(e.to_string()))
                    .field("error_id", json!(id_str(eid)))
                    .field("exit_code", json!(exit_code_for(eid)))
                    .emit_failure();
                errors.push(e.to_string());
                break;
            }
        }
    }

    if errors.is_empty() && !dry {
        match write_package_sidecar(plan, &pid.to_string(), &hashes) {
            Ok(count) => slog
                .sidecar_result()
                .field("entries", json!(count))
                .emit_success(),
            Err(e) => {
                slog.sidecar_result()
                    .field("error", json!(e.to_string()))
                    .emit_failure();
                errors.push(format!("sidecar write failed: {e}"));
            }
        }
    }

    let duration_ms = u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX);
    let summary = slog
        .apply_result()
        .field("summary", json!(true))
        .field("executed", json!(executed.len()))
        .field("errors", json!(errors))
        .field("duration_ms", json!(duration_ms));
    if errors.is_empty() {
        summary.emit_success();
    } else {
        summary.emit_failure();
    }
    api.audit.log(Level::Info, "apply: finished");

    ApplyReport {
        executed,
        errors,
        duration_ms,
        plan_uuid: Some(pid),
    }
}

/// Execute one action's effect, returning extra fact fields on success.
fn execute_action<E: FactsEmitter, A: AuditSink>(
    api: &Packyard<E, A>,
    act: &Action,
    plan: &Plan,
    hashes: &mut HashMap<PathBuf, String>,
) -> Result<Value, ApiError> {
    match act {
        Action::CreateDirectory { path } => {
            api.dirs.ensure(path)?;
            Ok(json!({}))
        }
        Action::StageExistingFile {
            entry,
            restore_dest,
            deploy_dest,
        } => {
            api.copier.copy_new(&entry.relative_path, restore_dest)?;
            api.copier.copy_new(&entry.relative_path, deploy_dest)?;
            let hash = meta::sha256_hex_of(restore_dest);
            if let Some(h) = &hash {
                hashes.insert(entry.mangled_name.clone(), h.clone());
            }
            Ok(json!({ "payload_hash": hash }))
        }
        Action::StageNewFile { entry, deploy_dest } => {
            api.copier.create_empty(deploy_dest, entry.mode.bits())?;
            Ok(json!({}))
        }
        Action::GenerateScript {
            kind,
            dest,
            entries,
        } => {
            let body = script::render(entries, *kind, &plan.workdir);
            staging::write_script(dest, &body)
                .map_err(|e| ApiError::Filesystem(format!("write {}: {e}", dest.display())))?;
            Ok(json!({ "script": kind.as_str() }))
        }
    }
}

/// Record what the commit staged, one record per entry in manifest order.
fn write_package_sidecar(
    plan: &Plan,
    pid: &str,
    hashes: &HashMap<PathBuf, String>,
) -> std::io::Result<usize> {
    let mut records: Vec<SidecarEntry> = Vec::new();
    for act in &plan.actions {
        let entry = match act {
            Action::StageExistingFile { entry, .. } | Action::StageNewFile { entry, .. } => entry,
            _ => continue,
        };
        records.push(SidecarEntry {
            path: entry.canonical_path.display().to_string(),
            staged_as: entry.mangled_name.display().to_string(),
            mode: entry.mode.to_string(),
            owner: entry.owner_user.clone(),
            group: entry.owner_group.clone(),
            new: entry.is_new,
            payload_hash: hashes.get(&entry.mangled_name).cloned(),
        });
    }
    let count = records.len();
    write_sidecar(&plan.workdir, &PackageSidecar::new(pid.to_string(), records))?;
    Ok(count)
}
