//! Persisted sign-in state.
//!
//! The signed-in principal is kept in `<data_dir>/session.yaml` between
//! invocations and turned into a core [`Session`] for each command.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_sync_core::{Principal, PrincipalId, Session};

use crate::error::CliError;

/// Contents of the session file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub principal_id: PrincipalId,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// The session file on disk.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record. Returns `Ok(None)` when nobody is signed in.
    pub fn load(&self) -> Result<Option<SessionRecord>, CliError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CliError::Io(self.path.clone(), e)),
        };
        let record = serde_yaml::from_str(&contents)
            .map_err(|e| CliError::Session(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(record))
    }

    /// Writes the record (temp file + rename).
    pub fn save(&self, record: &SessionRecord) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CliError::Io(parent.to_path_buf(), e))?;
        }
        let yaml = serde_yaml::to_string(record)
            .map_err(|e| CliError::Session(format!("cannot encode session: {}", e)))?;

        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml).map_err(|e| CliError::Io(temp_path.clone(), e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| CliError::Io(self.path.clone(), e))
    }

    /// Removes the record. Returns whether anyone was signed in.
    pub fn clear(&self) -> Result<bool, CliError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CliError::Io(self.path.clone(), e)),
        }
    }

    /// Builds the in-process session from the file.
    pub fn to_session(&self) -> Result<Session, CliError> {
        Ok(match self.load()? {
            Some(record) => Session::signed_in(Principal::new(record.principal_id, record.email)),
            None => Session::new(),
        })
    }
}
