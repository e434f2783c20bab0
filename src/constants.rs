//! Shared crate-wide constants for Packyard.
//!
//! Centralizes magic values and default labels used across modules.
//! Adjusting these here will propagate through the crate.

/// Staging tree (under the working directory) holding copies of the files as
/// they exist on the target today. The restore script copies out of it.
pub const RESTORE_DIR: &str = "restore";

/// Staging tree holding the outgoing file contents. The deploy script copies
/// out of it.
pub const DEPLOY_DIR: &str = "deploy";

/// Generated script filenames, written directly under the working directory.
pub const RESTORE_SCRIPT: &str = "restore.sh";
pub const DEPLOY_SCRIPT: &str = "deploy.sh";
pub const DIFF_SCRIPT: &str = "diff.sh";

/// Joiner used when flattening the segments of one path component into a
/// single staging filename; e.g. `etc/app` becomes `etc__app`.
pub const MANGLE_JOINER: &str = "__";

/// Replacement token for a `..` segment inside a mangled path component.
pub const MANGLE_UP_TOKEN: &str = "UP";

/// Mode applied to generated scripts after writing.
pub const SCRIPT_MODE: u32 = 0o755;

/// Filename of the package sidecar written after a successful commit.
pub const SIDECAR_NAME: &str = "package.meta.json";

/// UUIDv5 namespace tag for deterministic plan/action IDs.
pub const NS_TAG: &str = "https://packyard/plans";
