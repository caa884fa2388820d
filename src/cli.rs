// src/cli.rs

use crate::issues::github::GITHUB_API_URL;
use crate::issues::jira::JIRA_API_URL;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mine refactorings, diffs, developer effort and issues from repositories", long_about = None)]
pub struct Args {
    /// CSV manifest with a `project` column
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Local refactoring detector executable. Without it the detector runs in a container.
    #[arg(short, long, env = "REPO_MINER_DETECTOR")]
    pub detector: Option<PathBuf>,

    /// Container image used when no local detector is given
    #[arg(long, default_value = "tsantalis/refactoringminer")]
    pub detector_image: String,

    /// Container runtime binary
    #[arg(long, default_value = "docker")]
    pub docker: String,

    /// Directory receiving one sub-directory per mined project
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Directory where working copies are cloned
    #[arg(long, default_value = "./clones")]
    pub clone_dir: PathBuf,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// File holding the GitHub token, used when no token is given directly
    #[arg(long, default_value = ".env")]
    pub token_file: PathBuf,

    #[arg(long, default_value = GITHUB_API_URL)]
    pub github_api: String,

    #[arg(long, default_value = JIRA_API_URL)]
    pub jira_api: String,
}
