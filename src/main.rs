// src/main.rs

mod cli;
mod config;
mod detector;
mod error;
mod issues;
mod language;
mod manifest;
mod metrics;
mod miner;
mod model;
mod output;
mod workspace;

#[cfg(test)]
mod testutil;

use anyhow::Result;
use clap::Parser;
use cli::Args;
use config::MinerConfig;
use issues::github::GitHubClient;
use issues::jira::JiraClient;
use issues::transport::UreqTransport;
use issues::IssueHarvester;
use miner::{Miner, ProjectOutcome};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "repo_miner=info";

/// `RUST_LOG` directives when set and valid, `repo_miner=info` otherwise
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(log_filter(std::env::var("RUST_LOG").ok())).init();

    let config = MinerConfig::from_args(Args::parse())?;
    let start_time = Instant::now();

    let projects = manifest::read_manifest(&config.manifest)?;
    let detector = config.detector.runner();
    let harvester = IssueHarvester::new(
        UreqTransport::new(),
        GitHubClient::new(&config.github_api, config.github_token.clone()),
        JiraClient::new(&config.jira_api),
    );

    let mut miner = Miner::new(detector.as_ref(), harvester, &config.output, &config.clone_dir);
    let report = miner.run_batch(&projects);

    for (project, outcome) in &report.projects {
        match outcome {
            ProjectOutcome::Mined { refactorings, issues } => {
                tracing::info!("{}: {} refactorings, issues {:?}", project, refactorings, issues)
            }
            ProjectOutcome::Skipped => tracing::info!("{}: skipped", project),
            ProjectOutcome::Failed(cause) => tracing::warn!("{}: {}", project, cause),
        }
    }
    tracing::info!(
        "Batch finished in {:.2?}: {} mined, {} skipped, {} failed",
        start_time.elapsed(),
        report.mined(),
        report.skipped(),
        report.failed()
    );

    Ok(())
}
