//! Error types for smpatch operations.
//!
//! This module defines [`PatchError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fatal preconditions (unreadable package or store, missing descriptor,
//!   version-gate denial) each get a distinct variant; the run orchestrator
//!   propagates them and only `main` turns them into an exit code
//! - Per-item failures inside apply phases are NOT errors; they are logged
//!   and counted in the apply report while the run continues
//! - Use `anyhow::Error` (via `PatchError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for smpatch operations.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Patch package file could not be opened or is not a readable archive.
    #[error("Cannot access patchfile {path}: {message}")]
    PackageUnreadable { path: PathBuf, message: String },

    /// The fixed manifest entry is missing from the package.
    #[error("Patchfile is malformed: no {entry} entry")]
    ManifestMissing { entry: String },

    /// The manifest entry exists but is not valid YAML.
    #[error("Failed to parse patch manifest: {message}")]
    ManifestParse { message: String },

    /// Installation database file does not exist.
    #[error("Cannot access database {path}")]
    StoreMissing { path: PathBuf },

    /// Installation database exists but could not be opened.
    #[error("Can't open database {path}: {message}")]
    StoreOpen { path: PathBuf, message: String },

    /// The installation state row could not be read.
    #[error("Can't fetch installation state: {message}")]
    StateQuery { message: String },

    /// Descriptor file holding the application version is absent.
    #[error("Can't access {path}")]
    DescriptorMissing { path: PathBuf },

    /// Descriptor file exists but contains no recognizable version marker.
    #[error("Version marker not found in {path}")]
    VersionMarkerNotFound { path: PathBuf },

    /// The patch's declared bounds exclude this installation.
    #[error("{reason} - run aborted")]
    NotApplicable { reason: String },

    /// The operator declined the confirmation prompt.
    #[error("Run abandoned")]
    Abandoned,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for smpatch operations.
pub type Result<T> = std::result::Result<T, PatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_unreadable_displays_path_and_message() {
        let err = PatchError::PackageUnreadable {
            path: PathBuf::from("/tmp/patch.zip"),
            message: "not a zip".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/patch.zip"));
        assert!(msg.contains("not a zip"));
    }

    #[test]
    fn manifest_missing_displays_entry() {
        let err = PatchError::ManifestMissing {
            entry: "smpatch.yml".into(),
        };
        assert!(err.to_string().contains("smpatch.yml"));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn store_missing_displays_path() {
        let err = PatchError::StoreMissing {
            path: PathBuf::from("/inst/sm/ScoreMaster.db"),
        };
        assert!(err.to_string().contains("ScoreMaster.db"));
    }

    #[test]
    fn version_marker_not_found_displays_path() {
        let err = PatchError::VersionMarkerNotFound {
            path: PathBuf::from("/inst/sm/about.php"),
        };
        let msg = err.to_string();
        assert!(msg.contains("about.php"));
        assert!(msg.contains("Version marker"));
    }

    #[test]
    fn not_applicable_displays_reason() {
        let err = PatchError::NotApplicable {
            reason: "DBVersion is not in range 4-6".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("in range 4-6"));
        assert!(msg.contains("run aborted"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PatchError = io_err.into();
        assert!(matches!(err, PatchError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(PatchError::Abandoned)
        }
        assert!(returns_error().is_err());
    }
}
