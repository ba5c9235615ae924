//! Run orchestration.
//!
//! Owns the whole control flow of one patch run: probe the installation,
//! open the package, load the manifest, gate, confirm, apply. Every fallible
//! step returns a [`Result`]; nothing below `main` terminates the process.
//!
//! The package handle is released on every exit path - approval, denial, or
//! error - and the on-disk file is deleted afterwards unless the run was
//! asked to keep it.

use std::fs;
use std::path::PathBuf;

use crate::apply::{ApplyReport, PatchApplier};
use crate::error::{PatchError, Result};
use crate::gate::{self, Applicability};
use crate::manifest::PatchManifest;
use crate::package::PatchPackage;
use crate::probe::Installation;
use crate::ui::{self, Ui};

/// Settings for one run, built once at startup and read-only after.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Installation root folder.
    pub root: PathBuf,
    /// Patch package path.
    pub patch: PathBuf,
    /// Apply regardless of version criteria.
    pub force: bool,
    /// Keep the package file after the run.
    pub keep_package: bool,
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
}

/// Execute one patch run.
pub fn run(opts: &RunOptions, ui: &Ui) -> Result<ApplyReport> {
    let installation = Installation::probe(&opts.root)?;
    let state = installation.state();
    ui.status(&format!(
        "\nPatching \"{}\" ({}) - DBVersion is {}; AppVersion is {}\n",
        state.rally_title,
        opts.root.display(),
        state.db_version,
        state.app_version
    ));

    let mut package = PatchPackage::open(&opts.patch)?;
    let outcome = run_with_package(opts, ui, &installation, &mut package);

    // Release the archive handle on every path, then optionally delete the
    // file it came from.
    let path = package.into_path();
    if !opts.keep_package {
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "could not delete patchfile");
        }
    }

    outcome
}

/// Everything that happens while the package is held open.
fn run_with_package(
    opts: &RunOptions,
    ui: &Ui,
    installation: &Installation,
    package: &mut PatchPackage,
) -> Result<ApplyReport> {
    let manifest = PatchManifest::load(package)?;

    match gate::decide(installation.state(), &manifest, opts.force) {
        Applicability::Approved => {}
        Applicability::Denied { reason } => return Err(PatchError::NotApplicable { reason }),
    }
    if opts.force {
        ui.status("Forcing patch application");
    }

    ui.status(&format!("\nApplying patch \"{}\"\n", manifest.id));
    if !opts.assume_yes && ui.mode().shows_status() && ui::user_attended() {
        if !ui.confirm("Ok to apply this patch")? {
            ui.status("Run abandoned");
            return Err(PatchError::Abandoned);
        }
    }

    let report = PatchApplier::new(installation, package, ui).apply(&manifest);
    if report.clean() {
        ui.status("\nPatch applied successfully\n");
    } else {
        ui.status(&format!(
            "\nPatch applied with {} skipped item(s)\n",
            report.total_failed()
        ));
    }
    Ok(report)
}
