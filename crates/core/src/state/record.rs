//! Persistent record of a completed provisioning run.
//!
//! The service-account binding happens remotely, so the only local evidence
//! of it is this small TOML file written after the Provision step succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding ci-setup-kit's own files inside the project.
pub const STATE_DIR: &str = ".ci-setup";

const RECORD_FILE: &str = "state.toml";

/// Errors that can occur while persisting the provisioning record.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to create directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize provisioning record: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type StateResult<T> = Result<T, StateError>;

/// What the Provision step bound, and when.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRecord {
    pub project_id: String,
    pub service_account: String,
    #[serde(default)]
    pub provisioned_at: Option<DateTime<Utc>>,
}

pub fn record_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(RECORD_FILE)
}

/// Read the record; any read or parse problem yields `None`.
pub fn read_record(root: &Path) -> Option<ProvisionRecord> {
    let content = fs::read_to_string(record_path(root)).ok()?;
    toml::from_str(&content).ok()
}

pub fn write_record(root: &Path, record: &ProvisionRecord) -> StateResult<()> {
    let dir = root.join(STATE_DIR);
    fs::create_dir_all(&dir).map_err(|source| StateError::DirectoryCreate {
        path: dir.clone(),
        source,
    })?;

    let content = toml::to_string(record)?;
    let path = record_path(root);
    fs::write(&path, content).map_err(|source| StateError::FileWrite { path, source })?;
    Ok(())
}
