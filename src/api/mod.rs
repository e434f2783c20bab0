// Facade for API module; delegates to submodules under src/api/

use std::fmt::Write as _;
use std::path::Path;

use log::Level;
use serde_json::json;

use crate::adapters::{
    DirTreeBuilder, FileCopier, FileMetadataProvider, FsDirTreeBuilder, FsFileCopier,
    FsMetadataProvider,
};
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::redact::now_iso;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::manifest::{self, ManifestError};
use crate::types::{ApplyMode, ApplyReport, FileEntry, Plan};

mod apply;
pub mod errors;
mod plan;

/// Entry point for assembling deployment packages.
///
/// Generic over the facts/audit sinks; the filesystem collaborators default
/// to the real implementations and can be swapped via the `with_*`
/// builders.
pub struct Packyard<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    metadata: Box<dyn FileMetadataProvider>,
    copier: Box<dyn FileCopier>,
    dirs: Box<dyn DirTreeBuilder>,
}

impl<E: FactsEmitter, A: AuditSink> Packyard<E, A> {
    pub fn new(facts: E, audit: A) -> Self {
        Self {
            facts,
            audit,
            metadata: Box::new(FsMetadataProvider),
            copier: Box::new(FsFileCopier),
            dirs: Box::new(FsDirTreeBuilder),
        }
    }

    #[must_use]
    pub fn with_metadata_provider(mut self, metadata: Box<dyn FileMetadataProvider>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_copier(mut self, copier: Box<dyn FileCopier>) -> Self {
        self.copier = copier;
        self
    }

    #[must_use]
    pub fn with_dir_tree_builder(mut self, dirs: Box<dyn DirTreeBuilder>) -> Self {
        self.dirs = dirs;
        self
    }

    /// Parse manifest text against a working directory.
    ///
    /// Creates the working directory if absent (idempotent); that is the
    /// only mutation before `apply`.
    ///
    /// # Errors
    ///
    /// See [`ManifestError`].
    pub fn parse_manifest(
        &self,
        text: &str,
        workdir: &Path,
    ) -> Result<Vec<FileEntry>, ManifestError> {
        self.audit.log(Level::Info, "parse: starting");
        let result = manifest::parse(text, workdir, self.metadata.as_ref(), self.dirs.as_ref());
        let tctx = AuditCtx::new(
            &self.facts,
            String::new(),
            now_iso(),
            AuditMode::default(),
        );
        let slog = StageLogger::new(&tctx);
        match &result {
            Ok(entries) => slog
                .parse()
                .field("entries", json!(entries.len()))
                .emit_success(),
            Err(e) => slog
                .parse()
                .field("error", json!(e.to_string()))
                .emit_failure(),
        }
        result
    }

    /// Build the ordered action plan for parsed entries.
    pub fn plan(&self, entries: &[FileEntry], workdir: &Path) -> Plan {
        plan::build(self, entries, workdir)
    }

    /// Render the plan as numbered description lines; mutates nothing.
    #[must_use]
    pub fn describe(&self, plan: &Plan) -> String {
        let mut out = String::new();
        for (idx, act) in plan.actions.iter().enumerate() {
            let _ = writeln!(out, "{:3}. {}", idx + 1, act.describe());
        }
        out
    }

    /// Execute or dry-run the plan. Execution stops at the first failing
    /// action; the report carries the per-action errors.
    ///
    /// # Errors
    ///
    /// Reserved for pre-apply gating; per-action failures surface in the
    /// report, not here.
    pub fn apply(&self, plan: &Plan, mode: ApplyMode) -> Result<ApplyReport, errors::ApiError> {
        Ok(apply::run(self, plan, mode))
    }
}
