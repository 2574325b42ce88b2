//! Plain-text views over a [`StateStore`].

use std::fmt;

use crate::model::{ItemSet, StatesMap, all_states};
use crate::store::StateStore;

/// Count of items per observed state, for one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSummary {
    pub version: String,
    pub counts: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub description_count: usize,
    /// `None` when no states have been recorded or loaded.
    pub versions: Option<Vec<VersionSummary>>,
}

impl Summary {
    pub fn of(store: &StateStore) -> Self {
        Self {
            description_count: store.descriptions().map_or(0, |d| d.len()),
            versions: store.states().map(summarize_versions),
        }
    }
}

/// Every state seen anywhere is counted for every version, zero included.
pub fn summarize_versions(states: &StatesMap) -> Vec<VersionSummary> {
    let observed = all_states(states);
    states
        .iter()
        .map(|(version, items)| VersionSummary {
            version: version.clone(),
            counts: observed
                .iter()
                .map(|&state| {
                    let count = items.values().filter(|s| s.as_str() == state).count();
                    (state.to_string(), count)
                })
                .collect(),
        })
        .collect()
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "there are {} descriptions", self.description_count)?;
        writeln!(f)?;
        let Some(versions) = &self.versions else {
            return writeln!(f, "null");
        };
        for v in versions {
            let counts: Vec<String> = v
                .counts
                .iter()
                .map(|(state, count)| format!("{state}:{count}"))
                .collect();
            writeln!(f, "version {}", v.version)?;
            writeln!(f, "{}", counts.join(", "))?;
        }
        Ok(())
    }
}

/// Confirmation text for a freshly parsed input.
pub fn render_input(items: &ItemSet) -> String {
    let names: Vec<&str> = items.iter().map(String::as_str).collect();
    format!("add {} new objects:\n{}", items.len(), names.join(", "))
}
