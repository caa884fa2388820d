// src/model.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A clonable repository URL plus the short name derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReference {
    url: String,
    owner: String,
    name: String,
}

impl ProjectReference {
    /// Builds a reference from a clonable URL. Owner and name are the last
    /// two path segments; a trailing `.git` is dropped from the name.
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim().trim_end_matches('/');
        let mut segments = trimmed.rsplit(['/', ':']);
        let last = segments.next().unwrap_or_default();
        let owner = segments.next().unwrap_or_default().to_string();
        let name = last.strip_suffix(".git").unwrap_or(last).to_string();

        ProjectReference { url: trimmed.to_string(), owner, name }
    }

    /// Maps a manifest identifier such as `apache_kafka` to its GitHub URL
    pub fn from_identifier(identifier: &str) -> Self {
        let parts: Vec<&str> = identifier.trim().split('_').collect();
        let repo = if parts.len() == 2 { parts[1] } else { parts[0] };
        Self::from_url(&format!("https://github.com/apache/{}.git", repo))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ProjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A single refactoring operation detected within a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefactoringEvent {
    pub commit_hash: String,
    pub kind: String,
    /// Commit time, seconds since the epoch
    pub commit_timestamp: i64,
}

/// Line counts and patch for one file touched by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub file: String,
    pub added: usize,
    pub deleted: usize,
    pub diff: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDiffRecord {
    pub commit_hash: String,
    pub diffs: Vec<FileDiff>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperEffortRecord {
    pub commit_hash: String,
    pub parent_hash: String,
    pub developer_name: String,
    /// Absolute change in recognized lines of code against the first parent
    pub lines_changed: u64,
}

/// A JIRA project descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerProject {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracker {
    GitHub,
    Jira,
}

/// Raw issue payloads harvested from one tracker
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSet {
    pub tracker: Tracker,
    /// Repository name for GitHub, project key for JIRA
    pub label: String,
    pub issues: Vec<serde_json::Value>,
    /// Set when pagination stopped on a failed request
    pub degraded: bool,
}

impl IssueSet {
    pub fn file_name(&self) -> String {
        match self.tracker {
            Tracker::GitHub => format!("{}_github_issues.json", self.label),
            Tracker::Jira => format!("{}_jira_issues.json", self.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_parsing_strips_git_suffix() {
        let project = ProjectReference::from_url("https://github.com/apache/incubator-iotdb.git");
        assert_eq!(project.owner(), "apache");
        assert_eq!(project.name(), "incubator-iotdb");
        assert_eq!(project.url(), "https://github.com/apache/incubator-iotdb.git");
    }

    #[test]
    fn test_url_without_suffix() {
        let project = ProjectReference::from_url("https://github.com/apache/sling-org-apache-sling-api/");
        assert_eq!(project.owner(), "apache");
        assert_eq!(project.name(), "sling-org-apache-sling-api");
    }

    #[test]
    fn test_identifier_mapping() {
        let project = ProjectReference::from_identifier("apache_kafka");
        assert_eq!(project.url(), "https://github.com/apache/kafka.git");
        assert_eq!(project.name(), "kafka");

        let single = ProjectReference::from_identifier("commons-lang");
        assert_eq!(single.url(), "https://github.com/apache/commons-lang.git");
    }

    #[test]
    fn test_issue_file_names() {
        let github = IssueSet { tracker: Tracker::GitHub, label: "kafka".into(), issues: vec![], degraded: false };
        let jira = IssueSet { tracker: Tracker::Jira, label: "IOTDB".into(), issues: vec![], degraded: false };
        assert_eq!(github.file_name(), "kafka_github_issues.json");
        assert_eq!(jira.file_name(), "IOTDB_jira_issues.json");
    }
}
