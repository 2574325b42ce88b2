use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::csv_io;
use crate::error::{Error, Precondition, Result, ValidationError};
use crate::input::parse_items;
use crate::model::{Descriptions, ItemSet, StatesMap};

pub fn from_json(json: &str) -> serde_json::Result<StatesMap> {
    serde_json::from_str(json)
}

pub fn to_json(states: &StatesMap) -> serde_json::Result<String> {
    serde_json::to_string_pretty(states).map(|mut json| {
        json.push('\n');
        json
    })
}

/// Per-version item states, the pending input, optional descriptions and a
/// single undo snapshot.
///
/// Every field starts absent. Only [`add`](Self::add) writes the undo
/// snapshot and only [`back`](Self::back) reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateStore {
    #[serde(default)]
    states: Option<StatesMap>,
    #[serde(default)]
    last_states: Option<StatesMap>,
    #[serde(default)]
    input: Option<ItemSet>,
    #[serde(default)]
    descriptions: Option<Descriptions>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Option<&StatesMap> {
        self.states.as_ref()
    }

    pub fn input(&self) -> Option<&ItemSet> {
        self.input.as_ref()
    }

    pub fn descriptions(&self) -> Option<&Descriptions> {
        self.descriptions.as_ref()
    }

    /// Replace the pending input with the items parsed from `text`.
    pub fn set_input(&mut self, text: &str) {
        let items = parse_items(text);
        debug!(count = items.len(), "parsed input");
        self.input = Some(items);
    }

    /// Assign `state` to every pending item under `version`.
    ///
    /// Fails without touching anything if the state or version is blank or
    /// there is no pending input.
    pub fn add(&mut self, version: &str, state: &str) -> Result<()> {
        let version = version.trim();
        let state = state.trim();

        let mut failed = Vec::new();
        if state.is_empty() {
            failed.push(Precondition::State);
        }
        if version.is_empty() {
            failed.push(Precondition::Version);
        }
        let items = match &self.input {
            Some(items) if !items.is_empty() => items,
            _ => {
                failed.push(Precondition::Inputs);
                return Err(ValidationError { failed }.into());
            }
        };
        if !failed.is_empty() {
            return Err(ValidationError { failed }.into());
        }

        self.last_states = self.states.clone();
        let version_states = self
            .states
            .get_or_insert_with(StatesMap::new)
            .entry(version.to_string())
            .or_default();
        for item in items {
            version_states.insert(item.clone(), state.to_string());
        }
        info!(version, state, count = items.len(), "recorded states");
        Ok(())
    }

    /// Restore the states captured by the last `add`.
    ///
    /// The snapshot is kept, so repeating `back` changes nothing.
    pub fn back(&mut self) {
        self.states = self.last_states.clone();
        debug!(present = self.states.is_some(), "restored previous states");
    }

    /// Replace the states with the JSON document at `path`.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let states = from_json(&json).map_err(|e| Error::format(path, e.to_string()))?;
        info!(path = %path.display(), versions = states.len(), "loaded states");
        self.states = Some(states);
        Ok(())
    }

    /// Write the states as pretty JSON. Does nothing when there are none.
    pub fn save(&self, path: &Path) -> Result<()> {
        let Some(states) = &self.states else {
            debug!("no states to save");
            return Ok(());
        };
        let json = to_json(states)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), "saved states");
        Ok(())
    }

    /// Write the item × version matrix as CSV. Does nothing when there are
    /// no states.
    pub fn export(&self, path: &Path) -> Result<()> {
        let Some(states) = &self.states else {
            debug!("no states to export");
            return Ok(());
        };
        let data = csv_io::export_csv(states, self.descriptions.as_ref())?;
        fs::write(path, data).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), versions = states.len(), "exported states");
        Ok(())
    }

    /// Replace the descriptions with the contents of a CSV file.
    pub fn load_descriptions(&mut self, path: &Path) -> Result<()> {
        let data = fs::read(path).map_err(|e| Error::io(path, e))?;
        let descriptions =
            csv_io::parse_descriptions(&data).map_err(|reason| Error::format(path, reason))?;
        info!(path = %path.display(), count = descriptions.len(), "loaded descriptions");
        self.descriptions = Some(descriptions);
        Ok(())
    }
}
