//! Persistence of a whole [`StateStore`] between CLI invocations.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::StateStore;

pub const DEFAULT_SESSION_FILE: &str = ".versioned-states.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub updated_at: DateTime<Utc>,
    pub store: StateStore,
}

impl Session {
    pub fn new(store: StateStore) -> Self {
        Self {
            updated_at: Utc::now(),
            store,
        }
    }
}

/// Read the session at `path`. A missing file yields `None`.
pub fn read(path: &Path) -> Result<Option<Session>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };
    let session = serde_json::from_str(&json).map_err(|e| Error::format(path, e.to_string()))?;
    Ok(Some(session))
}

/// Load the store kept at `path`, or a fresh one when there is none.
pub fn load(path: &Path) -> Result<StateStore> {
    Ok(read(path)?.map(|s| s.store).unwrap_or_default())
}

pub fn save(path: &Path, store: &StateStore) -> Result<()> {
    let json = serde_json::to_string_pretty(&Session::new(store.clone()))?;
    fs::write(path, json).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "wrote session");
    Ok(())
}

/// Delete the session file. Returns whether one existed.
pub fn remove(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}
