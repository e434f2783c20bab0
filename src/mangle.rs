//! Path mangling: flatten a (context, name) pair into the staging namespace.
//!
//! Each path component is split into segments; `..` segments become the
//! literal token `UP` and the remaining segments are joined with `__`, a
//! joiner not expected inside ordinary path segments. The mangled context
//! (when present) becomes the staging subdirectory, and the mangled pair is
//! joined with the platform separator to form the staging filename.
//!
//! The scheme keeps the context/name split visible after flattening: context
//! `a/b` with name `c` yields `a__b/c`, while context `a` with name `b/c`
//! yields `a/b__c`. Two entries with different canonical paths therefore
//! mangle apart for the path shapes the manifest grammar accepts. Segments
//! that themselves contain `__` can still collide in theory; the manifest
//! parser closes that hole with an explicit uniqueness check over the whole
//! entry set rather than trusting the construction.

use std::path::{Component, Path, PathBuf};

use crate::constants::{MANGLE_JOINER, MANGLE_UP_TOKEN};

/// Flatten one path component into a single filename-safe string.
///
/// Root and current-dir segments are dropped; `..` becomes `UP`; everything
/// else is kept verbatim and joined with `__`.
#[must_use]
pub fn mangle_component(path: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
            Component::ParentDir => segments.push(MANGLE_UP_TOKEN.to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    segments.join(MANGLE_JOINER)
}

/// Mangle a (context, name) pair into `(staging_subdir, mangled_name)`.
///
/// `staging_subdir` is the flattened context (absent without a context);
/// `mangled_name` is the subdir joined with the flattened name.
#[must_use]
pub fn mangle(context: Option<&Path>, name: &Path) -> (Option<String>, PathBuf) {
    let mangled_file = mangle_component(name);
    match context {
        Some(ctx) => {
            let subdir = mangle_component(ctx);
            let mangled = Path::new(&subdir).join(&mangled_file);
            (Some(subdir), mangled)
        }
        None => (None, PathBuf::from(mangled_file)),
    }
}
