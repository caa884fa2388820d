// src/issues/jira.rs

use super::transport::Transport;
use crate::model::{IssueSet, Tracker, TrackerProject};
use serde::Deserialize;
use serde_json::Value;

pub const JIRA_API_URL: &str = "https://issues.apache.org/jira/rest/api/2";
pub const JIRA_PAGE_SIZE: usize = 100;

const INCUBATOR_PREFIX: &str = "incubator-";

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    issues: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct JiraClient {
    api: String,
}

impl JiraClient {
    pub fn new(api: impl Into<String>) -> Self {
        JiraClient { api: api.into().trim_end_matches('/').to_string() }
    }

    /// Every project on the instance, longest key first. A failed listing
    /// yields an empty catalog.
    pub fn fetch_projects(&self, transport: &dyn Transport) -> Vec<TrackerProject> {
        let url = format!("{}/project", self.api);
        let mut projects = match transport.get(&url, &[]) {
            Ok(response) if response.is_ok() => response.json::<Vec<TrackerProject>>().unwrap_or_else(|e| {
                tracing::warn!("Failed to parse JIRA projects: {}", e);
                Vec::new()
            }),
            Ok(response) => {
                tracing::warn!("Failed to retrieve JIRA projects: {} - {}", response.status, response.body);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to retrieve JIRA projects: {}", e);
                Vec::new()
            }
        };
        sort_projects(&mut projects);
        projects
    }

    /// Pages through the search endpoint in windows of `JIRA_PAGE_SIZE` until
    /// the offset reaches the reported total. A failed page stops the walk.
    pub fn fetch_issues(&self, transport: &dyn Transport, key: &str) -> IssueSet {
        let mut issues = Vec::new();
        let mut degraded = false;
        let mut start_at = 0;

        loop {
            let url = format!(
                "{}/search?jql=project={}&startAt={}&maxResults={}",
                self.api, key, start_at, JIRA_PAGE_SIZE
            );
            let page = match transport.get(&url, &[]) {
                Ok(response) if response.is_ok() => response.json::<SearchPage>(),
                Ok(response) => {
                    tracing::warn!("Failed to retrieve JIRA data: {} - {}", response.status, response.body);
                    degraded = true;
                    break;
                }
                Err(e) => Err(e),
            };
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Failed to retrieve JIRA data: {}", e);
                    degraded = true;
                    break;
                }
            };

            issues.extend(page.issues);
            start_at += JIRA_PAGE_SIZE;
            if start_at >= page.total {
                break;
            }
            tracing::info!("Querying for issues {}-{} out of {}", start_at, start_at + JIRA_PAGE_SIZE, page.total);
        }

        IssueSet { tracker: Tracker::Jira, label: key.to_string(), issues, degraded }
    }
}

/// Longer keys first so the substring match prefers the most specific key
pub fn sort_projects(projects: &mut [TrackerProject]) {
    projects.sort_by(|a, b| b.key.len().cmp(&a.key.len()));
}

/// Finds the JIRA key for a repository name.
///
/// Sling repositories all share the `SLING` tracker. Otherwise an exact
/// case-insensitive key match wins over a key contained in the name; for the
/// substring case the first project in `projects` order is taken. An
/// `incubator-` prefix is ignored.
pub fn find_jira_project_key(repo: &str, projects: &[TrackerProject]) -> Option<String> {
    let repo = repo.strip_prefix(INCUBATOR_PREFIX).unwrap_or(repo).to_lowercase();
    if repo.starts_with("sling") {
        return Some("SLING".to_string());
    }

    if let Some(project) = projects.iter().find(|p| p.key.to_lowercase() == repo) {
        return Some(project.key.clone());
    }

    projects
        .iter()
        .filter(|p| !p.key.is_empty())
        .find(|p| repo.contains(&p.key.to_lowercase()))
        .map(|p| p.key.clone())
}
