//! Installation state discovery.
//!
//! A ScoreMaster installation keeps its state in two places under the root:
//! the embedded SQLite store at `sm/ScoreMaster.db` (rally title and integer
//! schema version in the single `rallyparams` row) and the descriptor file
//! `sm/about.php`, whose `"version" => "..."` entry carries the application
//! version. The probe reads both once at run start; the resulting
//! [`InstallationState`] is immutable for the rest of the run.
//!
//! The probe also keeps the store connection open - the SQL apply phase runs
//! its statements over the same connection.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::anyhow;
use regex::Regex;
use rusqlite::Connection;

use crate::error::{PatchError, Result};

/// Pattern locating the application version inside the descriptor file.
static VERSION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""version" => "([^"]+)"#).unwrap());

/// Snapshot of the target installation, taken once per run.
#[derive(Debug, Clone)]
pub struct InstallationState {
    /// Title of the rally this installation is scoring.
    pub rally_title: String,
    /// Integer schema version of the store.
    pub db_version: i64,
    /// Application version string from the descriptor file.
    pub app_version: String,
}

/// An opened installation: the state snapshot plus the live store connection.
pub struct Installation {
    root: PathBuf,
    state: InstallationState,
    conn: Connection,
}

impl std::fmt::Debug for Installation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installation")
            .field("root", &self.root)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Installation {
    /// Probe the installation under `root`.
    ///
    /// Fatal when the store is absent or unopenable, the state row cannot be
    /// read, the descriptor file is missing, or the descriptor carries no
    /// version marker.
    pub fn probe(root: &Path) -> Result<Self> {
        let db_path = root.join("sm").join("ScoreMaster.db");
        if !db_path.exists() {
            return Err(PatchError::StoreMissing { path: db_path });
        }
        let conn = Connection::open(&db_path).map_err(|e| PatchError::StoreOpen {
            path: db_path.clone(),
            message: e.to_string(),
        })?;

        let (rally_title, db_version) = read_state_row(&conn)?;
        let app_version = read_app_version(&root.join("sm").join("about.php"))?;

        Ok(Self {
            root: root.to_path_buf(),
            state: InstallationState {
                rally_title,
                db_version,
                app_version,
            },
            conn,
        })
    }

    /// Installation root folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The state snapshot.
    pub fn state(&self) -> &InstallationState {
        &self.state
    }

    /// Run one SQL statement against the store.
    pub fn execute_sql(&self, statement: &str) -> Result<()> {
        self.conn
            .execute_batch(statement)
            .map_err(|e| PatchError::Other(anyhow!("{e}")))
    }
}

/// Read the rally title and schema version from the `rallyparams` row.
fn read_state_row(conn: &Connection) -> Result<(String, i64)> {
    conn.query_row("SELECT RallyTitle, DBVersion FROM rallyparams", [], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })
    .map_err(|e| PatchError::StateQuery {
        message: e.to_string(),
    })
}

/// Extract the application version from the descriptor file.
fn read_app_version(descriptor: &Path) -> Result<String> {
    if !descriptor.exists() {
        return Err(PatchError::DescriptorMissing {
            path: descriptor.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(descriptor)?;
    let captures =
        VERSION_MARKER
            .captures(&contents)
            .ok_or_else(|| PatchError::VersionMarkerNotFound {
                path: descriptor.to_path_buf(),
            })?;
    Ok(captures[1].to_string())
}
