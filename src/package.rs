//! Patch package access.
//!
//! A patch package is a zip archive holding the manifest at a fixed entry
//! name plus the replacement file blobs, stored flat and keyed by base name.
//! The package is opened once at run start, owned exclusively by the run,
//! and released when the [`PatchPackage`] value drops, on every exit path,
//! not just the happy one. Deleting the file on disk is a separate step the
//! orchestrator performs after the handle is gone (see
//! [`PatchPackage::into_path`]).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use zip::ZipArchive;

use crate::error::{PatchError, Result};

/// Fixed name of the manifest entry inside every patch package.
pub const MANIFEST_ENTRY: &str = "smpatch.yml";

/// An open patch package.
pub struct PatchPackage {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl std::fmt::Debug for PatchPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchPackage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl PatchPackage {
    /// Open the package at `path`.
    ///
    /// Fails with [`PatchError::PackageUnreadable`] when the file is absent
    /// or is not a readable zip archive.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PatchError::PackageUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let archive = ZipArchive::new(file).map_err(|e| PatchError::PackageUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Location of the package file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the fixed manifest entry as text.
    ///
    /// A package without that entry is malformed
    /// ([`PatchError::ManifestMissing`]).
    pub fn read_manifest(&mut self) -> Result<String> {
        let mut entry =
            self.archive
                .by_name(MANIFEST_ENTRY)
                .map_err(|_| PatchError::ManifestMissing {
                    entry: MANIFEST_ENTRY.to_string(),
                })?;
        let mut text = String::new();
        entry.read_to_string(&mut text)?;
        Ok(text)
    }

    /// Stream the named flat entry's bytes into a new file at `dest`,
    /// returning the byte count.
    ///
    /// The entry is looked up before the destination is touched, so a
    /// missing entry never truncates an existing file.
    pub fn copy_entry_to_path(&mut self, name: &str, dest: &Path) -> Result<u64> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|e| PatchError::Other(anyhow!("can't read patch entry {name}: {e}")))?;
        let mut file = File::create(dest)?;
        let written = std::io::copy(&mut entry, &mut file)?;
        Ok(written)
    }

    /// Release the archive handle and hand back the on-disk path.
    ///
    /// Deletion must go through this: removing the file while the handle is
    /// still open is unreliable on Windows.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
