// src/issues/cache.rs

use std::collections::HashSet;

/// JIRA project keys already harvested during this batch. Several
/// repositories can share one umbrella tracker, which is fetched only once.
#[derive(Debug, Default, Clone)]
pub struct TrackerCache {
    keys: HashSet<String>,
}

impl TrackerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Records `key`; returns false if it was already present
    pub fn insert(&mut self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }
}
