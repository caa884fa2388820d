// src/metrics/mod.rs

pub mod diffs;
pub mod effort;
pub mod summary;

/// Refactoring-bearing commit hashes in first-seen order, without repeats
pub fn unique_commits(events: &[crate::model::RefactoringEvent]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    events
        .iter()
        .filter(|e| seen.insert(e.commit_hash.as_str()))
        .map(|e| e.commit_hash.clone())
        .collect()
}
