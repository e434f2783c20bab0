//! Package sidecar: machine-readable record of what a commit staged.
//!
//! Written as `package.meta.json` under the working directory after a
//! successful commit, so follow-up tooling can audit the package without
//! re-parsing the manifest.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::SIDECAR_NAME;

pub(crate) const SIDECAR_SCHEMA: &str = "packyard_meta.v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarEntry {
    /// Resolved target-machine path.
    pub path: String,
    /// Staging filename the payload was flattened to.
    pub staged_as: String,
    /// 4-digit octal mode string, e.g. "0644".
    pub mode: String,
    pub owner: String,
    pub group: String,
    pub new: bool,
    /// SHA-256 of the staged payload; absent for empty placeholders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSidecar {
    pub schema: String,
    pub plan_id: String,
    pub entries: Vec<SidecarEntry>,
}

impl PackageSidecar {
    #[must_use]
    pub fn new(plan_id: String, entries: Vec<SidecarEntry>) -> Self {
        Self {
            schema: SIDECAR_SCHEMA.to_string(),
            plan_id,
            entries,
        }
    }
}

pub(crate) fn sidecar_path(workdir: &Path) -> PathBuf {
    workdir.join(SIDECAR_NAME)
}

pub(crate) fn write_sidecar(workdir: &Path, sc: &PackageSidecar) -> std::io::Result<()> {
    let f = std::fs::File::create(sidecar_path(workdir))?;
    serde_json::to_writer_pretty(&f, sc).map_err(std::io::Error::other)?;
    f.sync_all()?;
    Ok(())
}

/// Read a previously written sidecar back, for audits and tests.
///
/// # Errors
///
/// Returns an IO error if the sidecar is missing or not valid JSON.
pub fn read_sidecar(workdir: &Path) -> std::io::Result<PackageSidecar> {
    let f = std::fs::File::open(sidecar_path(workdir))?;
    serde_json::from_reader(f).map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_round_trips() {
        let t = tempfile::tempdir().unwrap();
        let sc = PackageSidecar::new(
            "pid".into(),
            vec![SidecarEntry {
                path: "/etc/app/app.conf".into(),
                staged_as: "etc__app/app.conf".into(),
                mode: "0644".into(),
                owner: "0".into(),
                group: "0".into(),
                new: false,
                payload_hash: Some("deadbeef".into()),
            }],
        );
        write_sidecar(t.path(), &sc).unwrap();
        let back = read_sidecar(t.path()).unwrap();
        assert_eq!(back.schema, SIDECAR_SCHEMA);
        assert_eq!(back.entries.len(), 1);
        assert_eq!(back.entries[0].staged_as, "etc__app/app.conf");
    }
}
