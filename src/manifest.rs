//! Patch manifest schema and loading.
//!
//! Every patch package carries a YAML manifest at a fixed entry name
//! declaring which installations the patch targets and what it does:
//!
//! ```yaml
//! id: "2022-11 bonus scoring fix"
//! mindb: 4
//! maxdb: 6
//! minapp: "1.0"
//! maxapp: "3.0"
//! sql:
//!   - ALTER TABLE claims ADD COLUMN DecisionLog TEXT
//! folders:
//!   - sm/images
//! files:
//!   - sm/score.php
//! ```
//!
//! All lists default to empty and both bound pairs default to zero/empty, so
//! a minimal manifest only needs the fields it uses. The manifest is loaded
//! once per run and never mutated.

use serde::Deserialize;

use crate::error::{PatchError, Result};
use crate::package::PatchPackage;

/// Declarative description of one patch: applicability bounds plus the
/// ordered operation lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatchManifest {
    /// Human-readable patch identifier.
    pub id: String,

    /// Lowest schema version this patch applies to (inclusive).
    pub mindb: i64,
    /// Highest schema version this patch applies to (inclusive).
    pub maxdb: i64,

    /// Lowest application version this patch applies to (inclusive).
    pub minapp: String,
    /// Highest application version this patch applies to (inclusive).
    pub maxapp: String,

    /// Relative paths of files to replace, in application order. The package
    /// stores the blobs flat, keyed by base name only.
    pub files: Vec<String>,

    /// SQL statements to run against the installation store, in order.
    pub sql: Vec<String>,

    /// Relative folder paths to create, in order.
    pub folders: Vec<String>,
}

impl PatchManifest {
    /// Load the manifest from a patch package's fixed entry.
    ///
    /// Fails with [`PatchError::ManifestMissing`] when the entry is absent
    /// (the package is considered malformed) and with
    /// [`PatchError::ManifestParse`] when the entry is not valid YAML.
    pub fn load(package: &mut PatchPackage) -> Result<Self> {
        let text = package.read_manifest()?;
        Self::parse(&text)
    }

    /// Decode a manifest from YAML text.
    pub fn parse(text: &str) -> Result<Self> {
        // serde_yaml maps a fully empty document to a unit value, which does
        // not satisfy a struct target; treat it as an empty manifest.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| PatchError::ManifestParse {
            message: e.to_string(),
        })
    }

    /// Displayable schema target, collapsed to a single value when the
    /// bounds are equal.
    pub fn schema_target(&self) -> String {
        if self.mindb == self.maxdb {
            format!("{}", self.maxdb)
        } else {
            format!("in range {}-{}", self.mindb, self.maxdb)
        }
    }

    /// Displayable application-version target, collapsed when equal.
    pub fn app_target(&self) -> String {
        if self.minapp == self.maxapp {
            self.minapp.clone()
        } else {
            format!("{}-{}", self.minapp, self.maxapp)
        }
    }
}
