// src/config.rs

use crate::cli::Args;
use crate::detector::{ContainerDetector, DetectorRunner, LocalDetector};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one batch run, resolved from the command line
#[derive(Debug, Clone)]
pub struct MinerConfig {
    pub manifest: PathBuf,
    pub detector: DetectorMode,
    pub output: PathBuf,
    pub clone_dir: PathBuf,
    pub github_token: Option<String>,
    pub github_api: String,
    pub jira_api: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorMode {
    Local(PathBuf),
    Container { docker: String, image: String },
}

impl DetectorMode {
    pub fn runner(&self) -> Box<dyn DetectorRunner> {
        match self {
            DetectorMode::Local(path) => Box::new(LocalDetector::new(path)),
            DetectorMode::Container { docker, image } => Box::new(ContainerDetector::new(docker, image)),
        }
    }
}

impl MinerConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        let github_token = match args.github_token.filter(|t| !t.trim().is_empty()) {
            Some(token) => Some(token.trim().to_string()),
            None => read_token(&args.token_file)?,
        };
        if github_token.is_none() {
            tracing::warn!("No GitHub token configured, API calls will be rate limited");
        }

        let detector = match args.detector {
            Some(path) => DetectorMode::Local(path),
            None => DetectorMode::Container { docker: args.docker, image: args.detector_image },
        };

        Ok(MinerConfig {
            manifest: args.manifest,
            detector,
            output: args.output,
            clone_dir: args.clone_dir,
            github_token,
            github_api: args.github_api,
            jira_api: args.jira_api,
        })
    }
}

/// Reads a token file; a missing or blank file means no token
fn read_token(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let token = fs::read_to_string(path).with_context(|| format!("Failed to read token file {}", path.display()))?;
    let token = token.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}
