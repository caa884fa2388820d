// src/issues/mod.rs

pub mod cache;
pub mod github;
pub mod jira;
pub mod transport;

use crate::error::{MinerError, Result};
use crate::model::{ProjectReference, TrackerProject};
use crate::output::OutputBundle;
use cache::TrackerCache;
use github::GitHubClient;
use jira::JiraClient;
use std::path::PathBuf;
use transport::Transport;

/// What happened when harvesting one project's issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    /// Issues were written to `file`
    Fetched { file: PathBuf, count: usize, degraded: bool },
    /// The project's JIRA key was harvested earlier in this batch
    AlreadyMined { key: String },
    /// Neither GitHub nor JIRA tracks this project
    Untracked,
}

/// Picks GitHub or JIRA for a project and fetches its issue history
pub struct IssueHarvester<T: Transport> {
    transport: T,
    github: GitHubClient,
    jira: JiraClient,
    /// JIRA catalog, fetched on first use and kept for the batch
    projects: Option<Vec<TrackerProject>>,
}

impl<T: Transport> IssueHarvester<T> {
    pub fn new(transport: T, github: GitHubClient, jira: JiraClient) -> Self {
        IssueHarvester { transport, github, jira, projects: None }
    }

    /// Uses `projects` instead of fetching the JIRA catalog
    #[cfg(test)]
    pub fn with_projects(mut self, mut projects: Vec<TrackerProject>) -> Self {
        jira::sort_projects(&mut projects);
        self.projects = Some(projects);
        self
    }

    fn known_projects(&mut self) -> &[TrackerProject] {
        let (transport, jira) = (&self.transport, &self.jira);
        self.projects.get_or_insert_with(|| {
            let projects = jira.fetch_projects(transport);
            tracing::info!("Loaded {} JIRA projects", projects.len());
            projects
        })
    }

    pub fn resolve_jira_key(&mut self, project: &ProjectReference) -> Result<String> {
        jira::find_jira_project_key(project.name(), self.known_projects())
            .ok_or_else(|| MinerError::Resolution(format!("{}/{}", project.owner(), project.name())))
    }

    /// GitHub wins when its repository probe succeeds; otherwise the JIRA key
    /// is resolved and fetched unless `cache` already holds it.
    pub fn harvest(
        &mut self,
        project: &ProjectReference,
        cache: &mut TrackerCache,
        bundle: &OutputBundle,
    ) -> Result<HarvestOutcome> {
        let (owner, repo) = (project.owner(), project.name());

        if self.github.has_repository(&self.transport, owner, repo)? {
            let set = self.github.fetch_issues(&self.transport, owner, repo);
            tracing::info!("Retrieved {} issues for GitHub repo {}/{}", set.issues.len(), owner, repo);
            let file = bundle.write_issues(&set)?;
            return Ok(HarvestOutcome::Fetched { file, count: set.issues.len(), degraded: set.degraded });
        }

        let key = match self.resolve_jira_key(project) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Issues are not enabled for {}/{}: {}", owner, repo, e);
                return Ok(HarvestOutcome::Untracked);
            }
        };

        if cache.contains(&key) {
            tracing::info!("JIRA issues already mined for {} ({})", project, key);
            return Ok(HarvestOutcome::AlreadyMined { key });
        }

        let set = self.jira.fetch_issues(&self.transport, &key);
        tracing::info!("Retrieved {} issues for JIRA project {}", set.issues.len(), key);
        let file = bundle.write_issues(&set)?;
        cache.insert(&key);

        Ok(HarvestOutcome::Fetched { file, count: set.issues.len(), degraded: set.degraded })
    }
}
