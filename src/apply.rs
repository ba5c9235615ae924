//! Patch application phases.
//!
//! Three phases run in a fixed order: SQL statements, folder creation, file
//! replacement. Folders are created before files so every copy destination
//! inside a new folder already has its directory chain in place.
//!
//! Application is best-effort per item: a failing statement, folder, or file
//! is reported and counted, and the phase moves on to the next item. No
//! phase aborts the run. The [`ApplyReport`] tells callers whether the run
//! applied cleanly or skipped items.

use std::path::{Path, PathBuf};

use crate::manifest::PatchManifest;
use crate::package::PatchPackage;
use crate::probe::Installation;
use crate::ui::Ui;

/// Attempted/failed counts for one apply phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseReport {
    /// Items the phase iterated.
    pub attempted: usize,
    /// Items that failed and were skipped.
    pub failed: usize,
}

/// Outcome of a full three-phase application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// SQL statement phase.
    pub sql: PhaseReport,
    /// Folder creation phase.
    pub folders: PhaseReport,
    /// File replacement phase.
    pub files: PhaseReport,
}

impl ApplyReport {
    /// Whether every item in every phase succeeded.
    pub fn clean(&self) -> bool {
        self.total_failed() == 0
    }

    /// Total failed items across all phases.
    pub fn total_failed(&self) -> usize {
        self.sql.failed + self.folders.failed + self.files.failed
    }
}

/// Executes a manifest's operations against one installation.
pub struct PatchApplier<'a> {
    installation: &'a Installation,
    package: &'a mut PatchPackage,
    ui: &'a Ui,
}

impl<'a> PatchApplier<'a> {
    /// Create an applier bound to an installation and an open package.
    pub fn new(installation: &'a Installation, package: &'a mut PatchPackage, ui: &'a Ui) -> Self {
        Self {
            installation,
            package,
            ui,
        }
    }

    /// Run all three phases in order and report per-phase counts.
    pub fn apply(&mut self, manifest: &PatchManifest) -> ApplyReport {
        ApplyReport {
            sql: self.run_sql(&manifest.sql),
            folders: self.make_folders(&manifest.folders),
            files: self.copy_files(&manifest.files),
        }
    }

    /// Phase 1: run each SQL statement in manifest order. No transaction, no
    /// rollback; a failed statement is skipped.
    fn run_sql(&self, statements: &[String]) -> PhaseReport {
        let mut report = PhaseReport::default();
        if statements.is_empty() {
            return report;
        }

        self.ui.status("Upgrading the database");
        for statement in statements {
            report.attempted += 1;
            self.ui.detail(&format!("Applying {statement}"));
            if let Err(e) = self.installation.execute_sql(statement) {
                report.failed += 1;
                self.ui.item_failure(statement, &e.to_string());
            }
        }
        self.ui.status("Database upgraded");
        report
    }

    /// Phase 2: create each declared folder chain. Already-present folders
    /// are a no-op success.
    fn make_folders(&self, folders: &[String]) -> PhaseReport {
        let mut report = PhaseReport::default();
        for rel in folders {
            report.attempted += 1;
            self.ui.detail(&format!("Making folder {rel}"));
            let target = resolve_under_root(self.installation.root(), rel);
            if let Err(e) = std::fs::create_dir_all(&target) {
                report.failed += 1;
                self.ui.item_failure(rel, &e.to_string());
            }
        }
        report
    }

    /// Phase 3: replace each declared file from the package. The package
    /// stores blobs flat, so the lookup key is the path's final component;
    /// the destination keeps the full relative path.
    fn copy_files(&mut self, files: &[String]) -> PhaseReport {
        let mut report = PhaseReport::default();
        if files.is_empty() {
            return report;
        }

        self.ui.status("Updating application files");
        for rel in files {
            report.attempted += 1;
            self.ui.detail(&format!("Updating {rel}"));

            let Some(name) = base_name(rel) else {
                report.failed += 1;
                self.ui.item_failure(rel, "path has no file name");
                continue;
            };
            let dest = resolve_under_root(self.installation.root(), rel);
            self.ui.detail(&format!("Writing {}", dest.display()));

            match self.package.copy_entry_to_path(name, &dest) {
                Ok(written) => {
                    tracing::debug!(entry = name, dest = %dest.display(), written, "file replaced");
                }
                Err(e) => {
                    report.failed += 1;
                    self.ui.item_failure(rel, &e.to_string());
                }
            }
        }
        self.ui.status("File patches applied");
        report
    }
}

/// Resolve a package-relative path (always `/`-separated) under the
/// installation root using native separators.
fn resolve_under_root(root: &Path, rel: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in rel.split('/').filter(|c| !c.is_empty()) {
        path.push(component);
    }
    path
}

/// Final path component of a package-relative path.
fn base_name(rel: &str) -> Option<&str> {
    rel.split('/').filter(|c| !c.is_empty()).next_back()
}
