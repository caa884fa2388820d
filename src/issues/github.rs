// src/issues/github.rs

use super::transport::Transport;
use crate::error::Result;
use crate::model::{IssueSet, Tracker};
use serde_json::Value;

pub const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct GitHubClient {
    api: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api: impl Into<String>, token: Option<String>) -> Self {
        GitHubClient { api: api.into().trim_end_matches('/').to_string(), token }
    }

    fn get(&self, transport: &dyn Transport, url: &str) -> Result<super::transport::HttpResponse> {
        let authorization = self.token.as_ref().map(|t| format!("Bearer {}", t));
        let mut headers = vec![("Accept", "application/vnd.github+json")];
        if let Some(value) = authorization.as_deref() {
            headers.push(("Authorization", value));
        }
        transport.get(url, &headers)
    }

    /// True when the repository resource answers 200
    pub fn has_repository(&self, transport: &dyn Transport, owner: &str, repo: &str) -> Result<bool> {
        let url = format!("{}/repos/{}/{}", self.api, owner, repo);
        Ok(self.get(transport, &url)?.is_ok())
    }

    /// Walks `?page=1,2,...` until an empty page. A failed page ends the walk
    /// and the issues gathered so far are returned as a degraded set.
    pub fn fetch_issues(&self, transport: &dyn Transport, owner: &str, repo: &str) -> IssueSet {
        let mut issues = Vec::new();
        let mut degraded = false;
        let mut page = 1;

        loop {
            let url = format!("{}/repos/{}/{}/issues?page={}", self.api, owner, repo, page);
            let page_data = match self.get(transport, &url) {
                Ok(response) if response.is_ok() => response.json::<Vec<Value>>(),
                Ok(response) => {
                    tracing::warn!("Failed to fetch issues from GitHub: {}", response.status);
                    degraded = true;
                    break;
                }
                Err(e) => Err(e),
            };

            match page_data {
                Ok(page_data) if page_data.is_empty() => break,
                Ok(page_data) => issues.extend(page_data),
                Err(e) => {
                    tracing::warn!("Failed to fetch issues from GitHub: {}", e);
                    degraded = true;
                    break;
                }
            }
            page += 1;
        }

        IssueSet { tracker: Tracker::GitHub, label: repo.to_string(), issues, degraded }
    }
}
