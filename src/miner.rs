// src/miner.rs

use crate::detector::DetectorRunner;
use crate::error::{MinerError, Result};
use crate::issues::cache::TrackerCache;
use crate::issues::transport::Transport;
use crate::issues::{HarvestOutcome, IssueHarvester};
use crate::metrics::{self, diffs, effort, summary};
use crate::model::ProjectReference;
use crate::output::OutputBundle;
use crate::workspace::WorkingCopy;
use std::path::PathBuf;

/// How a single project's run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    Mined { refactorings: usize, issues: HarvestOutcome },
    Skipped,
    Failed(String),
}

/// Results for every project in a batch, in manifest order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub projects: Vec<(ProjectReference, ProjectOutcome)>,
}

impl BatchReport {
    fn count(&self, predicate: impl Fn(&ProjectOutcome) -> bool) -> usize {
        self.projects.iter().filter(|(_, outcome)| predicate(outcome)).count()
    }

    pub fn mined(&self) -> usize {
        self.count(|o| matches!(o, ProjectOutcome::Mined { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ProjectOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ProjectOutcome::Failed(_)))
    }
}

/// Runs the mining pipeline over a batch of projects, one at a time
pub struct Miner<'a, T: Transport> {
    detector: &'a dyn DetectorRunner,
    harvester: IssueHarvester<T>,
    cache: TrackerCache,
    output_root: PathBuf,
    clone_root: PathBuf,
}

impl<'a, T: Transport> Miner<'a, T> {
    pub fn new(
        detector: &'a dyn DetectorRunner,
        harvester: IssueHarvester<T>,
        output_root: impl Into<PathBuf>,
        clone_root: impl Into<PathBuf>,
    ) -> Self {
        Miner {
            detector,
            harvester,
            cache: TrackerCache::new(),
            output_root: output_root.into(),
            clone_root: clone_root.into(),
        }
    }

    /// Mines every project. A failing project is logged and the batch moves on.
    pub fn run_batch(&mut self, projects: &[ProjectReference]) -> BatchReport {
        let mut report = BatchReport::default();

        for (i, project) in projects.iter().enumerate() {
            tracing::info!("[{}/{}] Mining {}", i + 1, projects.len(), project);

            let outcome = match self.mine_project(project) {
                Ok(outcome) => {
                    tracing::info!("Success! {}", project);
                    outcome
                }
                Err(MinerError::AlreadyMined(dir)) => {
                    tracing::info!("{} already mined at {}, skipping", project, dir.display());
                    ProjectOutcome::Skipped
                }
                Err(e) => {
                    tracing::error!("Failed to mine {}: {}", project, e);
                    ProjectOutcome::Failed(e.to_string())
                }
            };
            report.projects.push((project.clone(), outcome));
        }

        report
    }

    pub fn mine_project(&mut self, project: &ProjectReference) -> Result<ProjectOutcome> {
        let bundle = OutputBundle::create(&self.output_root, project.name())?;
        tracing::info!("Writing output to {}", bundle.dir().display());
        let mut copy = match WorkingCopy::acquire(project, &self.clone_root) {
            Ok(copy) => copy,
            Err(e) => {
                // Nothing was mined, so a later run must not treat the project as done
                if let Err(cleanup) = bundle.discard() {
                    tracing::warn!("Failed to remove output for {}: {}", project, cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!("Running refactoring detector...");
        let report = self.detector.run(&copy)?;
        bundle.write_report(&report)?;

        tracing::info!("Parsing detector output...");
        let repo = copy.open()?;
        let events = report.events(&repo)?;
        bundle.write_summary(&summary::summarize(&events))?;
        let commits = metrics::unique_commits(&events);

        tracing::info!("Collecting diffs...");
        bundle.write_diffs(&diffs::collect_diffs(&repo, &commits)?)?;

        tracing::info!("Collecting developer effort...");
        let written = bundle.write_effort(&effort::collect_effort(&repo, &commits)?)?;
        tracing::debug!("Wrote {} effort rows", written);
        drop(repo);

        tracing::info!("Mining issue data...");
        let issues = self.harvester.harvest(project, &mut self.cache, &bundle)?;

        copy.release()?;
        Ok(ProjectOutcome::Mined { refactorings: events.len(), issues })
    }
}
