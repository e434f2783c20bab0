#![forbid(unsafe_code)]
//! Packyard: staged, reversible file deployment packages.
//!
//! A declarative manifest names the files an operator wants to push to a
//! sensitive host. Packyard parses it, flattens every target path into a
//! collision-free staging namespace, and builds an ordered plan that fills a
//! `restore/` tree (current contents, for rollback) and a `deploy/` tree
//! (outgoing contents), then renders three operator scripts: `deploy.sh`,
//! `restore.sh`, and `diff.sh`.
//!
//! Safety model highlights:
//! - Staging copies never clobber: a destination that already exists fails
//!   the run instead of silently replacing a prior staged copy.
//! - Permission and ownership of pre-existing files are captured at parse
//!   time and baked into the generated scripts, so a redeploy reproduces the
//!   original mode/owner/group exactly.
//! - Packyard never executes a deployment itself; it only produces the plan,
//!   the staged trees, and the scripts.

pub mod constants;
pub mod adapters;
pub mod api;
pub mod fs;
pub mod logging;
pub mod mangle;
pub mod manifest;
pub mod script;
pub mod types;

pub use api::*;
