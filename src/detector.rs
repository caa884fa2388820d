// src/detector.rs

use crate::error::{MinerError, Result};
use crate::model::RefactoringEvent;
use crate::workspace::WorkingCopy;
use git2::{Oid, Repository};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Where the working copy is mounted inside the detector container
pub const CONTAINER_PROJECT_DIR: &str = "/diff/project";
/// Where the detector writes its report inside the container
pub const CONTAINER_REPORT_PATH: &str = "/diff/rminer-output.json";

/// The detector's JSON report. Unknown fields are kept so the report can be
/// persisted without losing anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorReport {
    #[serde(default)]
    pub commits: Vec<ReportCommit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCommit {
    pub sha1: String,
    #[serde(default)]
    pub refactorings: Vec<ReportRefactoring>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRefactoring {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetectorReport {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MinerError::Detection(format!("malformed report: {}", e)))
    }

    /// Commits carrying at least one refactoring, in report order (newest first)
    pub fn refactoring_commits(&self) -> impl Iterator<Item = &ReportCommit> {
        self.commits.iter().filter(|c| !c.refactorings.is_empty())
    }

    /// Flattens the report into one event per refactoring, resolving each
    /// commit's timestamp in `repo`.
    pub fn events(&self, repo: &Repository) -> Result<Vec<RefactoringEvent>> {
        let mut events = Vec::new();
        for commit in self.refactoring_commits() {
            let timestamp = Oid::from_str(&commit.sha1)
                .and_then(|oid| repo.find_commit(oid))
                .map(|c| c.time().seconds())
                .map_err(|e| {
                    MinerError::Detection(format!("commit {} is not in the working copy: {}", commit.sha1, e))
                })?;

            for refactoring in &commit.refactorings {
                events.push(RefactoringEvent {
                    commit_hash: commit.sha1.clone(),
                    kind: refactoring.kind.clone(),
                    commit_timestamp: timestamp,
                });
            }
        }
        Ok(events)
    }
}

/// Something that can run the refactoring detector against a working copy
pub trait DetectorRunner {
    fn run(&self, copy: &WorkingCopy) -> Result<DetectorReport>;
}

/// Runs a detector executable installed on this machine
#[derive(Debug, Clone)]
pub struct LocalDetector {
    executable: PathBuf,
}

impl LocalDetector {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        LocalDetector { executable: executable.into() }
    }
}

impl DetectorRunner for LocalDetector {
    fn run(&self, copy: &WorkingCopy) -> Result<DetectorReport> {
        let report_path = sibling_report_path(copy.path());
        let output = Command::new(&self.executable)
            .arg("-a")
            .arg(copy.path())
            .arg("-json")
            .arg(&report_path)
            .output()
            .map_err(|e| MinerError::Detection(format!("failed to start {}: {}", self.executable.display(), e)))?;
        check_exit(&output)?;

        let json = fs::read_to_string(&report_path)
            .map_err(|e| MinerError::Detection(format!("missing report {}: {}", report_path.display(), e)))?;
        let _ = fs::remove_file(&report_path);
        DetectorReport::parse(&json)
    }
}

/// Runs the detector image in a container with the working copy bind-mounted
#[derive(Debug, Clone)]
pub struct ContainerDetector {
    docker: String,
    image: String,
}

impl ContainerDetector {
    pub fn new(docker: impl Into<String>, image: impl Into<String>) -> Self {
        ContainerDetector { docker: docker.into(), image: image.into() }
    }

    fn docker(&self, args: &[&str]) -> Result<Output> {
        Command::new(&self.docker)
            .args(args)
            .output()
            .map_err(|e| MinerError::Detection(format!("failed to start {}: {}", self.docker, e)))
    }
}

impl DetectorRunner for ContainerDetector {
    fn run(&self, copy: &WorkingCopy) -> Result<DetectorReport> {
        let mount_source = fs::canonicalize(copy.path())?;
        let container = Container {
            docker: &self.docker,
            name: format!("repo-miner-{}-{}", copy.project().name(), std::process::id()),
        };
        let mount = format!("{}:{}", mount_source.display(), CONTAINER_PROJECT_DIR);

        // Blocks until the detector exits
        let output = self.docker(&[
            "run",
            "--name",
            container.name.as_str(),
            "-v",
            mount.as_str(),
            self.image.as_str(),
            "-a",
            CONTAINER_PROJECT_DIR,
            "-json",
            CONTAINER_REPORT_PATH,
        ])?;
        check_exit(&output)?;

        let source = format!("{}:{}", container.name, CONTAINER_REPORT_PATH);
        let archive = self.docker(&["cp", source.as_str(), "-"])?;
        check_exit(&archive)?;

        let json = extract_report(archive.stdout.as_slice())?;
        DetectorReport::parse(&json)
    }
}

/// Removes the named container once the report has been copied out
struct Container<'a> {
    docker: &'a str,
    name: String,
}

impl Drop for Container<'_> {
    fn drop(&mut self) {
        let removed = Command::new(self.docker).args(["rm", "-f", self.name.as_str()]).output();
        if let Err(e) = removed {
            tracing::warn!("Failed to remove container {}: {}", self.name, e);
        }
    }
}

/// Pulls the single JSON file out of the tar stream `docker cp` produces
pub fn extract_report<R: Read>(archive: R) -> Result<String> {
    let mut archive = tar::Archive::new(archive);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_json = entry.path()?.extension().is_some_and(|ext| ext == "json");
        if entry.header().entry_type().is_file() && is_json {
            let mut json = String::new();
            entry.read_to_string(&mut json)?;
            return Ok(json);
        }
    }
    Err(MinerError::Detection("report archive contains no JSON file".to_string()))
}

fn check_exit(output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(MinerError::Detection(format!(
        "detector exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    )))
}

fn sibling_report_path(dir: &Path) -> PathBuf {
    let name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    dir.with_file_name(format!("{}.rminer-output.json", name))
}
