use std::collections::{BTreeMap, BTreeSet};

/// item → state, for a single version.
pub type VersionStates = BTreeMap<String, String>;

/// version → item → state.
pub type StatesMap = BTreeMap<String, VersionStates>;

/// The pending set of items the next `add` applies to.
pub type ItemSet = BTreeSet<String>;

/// item → human-readable description.
pub type Descriptions = BTreeMap<String, String>;

/// Every item recorded under any version, sorted.
pub fn all_items(states: &StatesMap) -> BTreeSet<&str> {
    states
        .values()
        .flat_map(|items| items.keys())
        .map(String::as_str)
        .collect()
}

/// Every distinct state value recorded under any version, sorted.
pub fn all_states(states: &StatesMap) -> BTreeSet<&str> {
    states
        .values()
        .flat_map(|items| items.values())
        .map(String::as_str)
        .collect()
}
