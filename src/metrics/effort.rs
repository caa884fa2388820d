// src/metrics/effort.rs

use crate::error::Result;
use crate::language::Language;
use crate::model::DeveloperEffortRecord;
use git2::{ObjectType, Oid, Repository, Tree, TreeWalkMode, TreeWalkResult};
use indicatif::ProgressBar;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const EFFORT_HEADER: &str = "refactoring hash, previous hash, TLOC";
pub const UNKNOWN_DEVELOPER: &str = "Unknown";

/// Computes TLOC for each commit against its first parent. Root commits are skipped.
pub fn collect_effort(repo: &Repository, commits: &[String]) -> Result<Vec<DeveloperEffortRecord>> {
    let bar = ProgressBar::new(commits.len() as u64);
    bar.set_message("Collecting developer effort");

    let mut counter = LineCounter::default();
    let mut records = Vec::new();
    for hash in commits {
        bar.inc(1);
        let commit = repo.find_commit(Oid::from_str(hash)?)?;
        if commit.parent_count() == 0 {
            tracing::warn!("Commit {} has no parent, skipping effort", hash);
            continue;
        }
        let parent = commit.parent(0)?;

        let current = counter.tree_lines(repo, &commit.tree()?)?;
        let previous = counter.tree_lines(repo, &parent.tree()?)?;

        let developer = developer_name(commit.author().name());

        records.push(DeveloperEffortRecord {
            commit_hash: hash.clone(),
            parent_hash: parent.id().to_string(),
            developer_name: developer,
            lines_changed: current.abs_diff(previous),
        });
    }
    bar.finish_and_clear();

    Ok(records)
}

/// Author name, or `Unknown` when it is missing or blank
fn developer_name(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => UNKNOWN_DEVELOPER.to_string(),
    }
}

/// Counts lines in recognized source files, remembering blobs already seen
#[derive(Default)]
struct LineCounter {
    blobs: HashMap<Oid, u64>,
}

impl LineCounter {
    fn tree_lines(&mut self, repo: &Repository, tree: &Tree) -> Result<u64> {
        let mut total = 0;
        let mut failure = None;

        let walk = tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            let Some(name) = entry.name() else { return TreeWalkResult::Ok };
            if Language::from_path(&Path::new(root).join(name)).is_none() {
                return TreeWalkResult::Ok;
            }

            if let Some(lines) = self.blobs.get(&entry.id()) {
                total += lines;
                return TreeWalkResult::Ok;
            }
            match repo.find_blob(entry.id()) {
                Ok(blob) => {
                    let lines = blob.content().lines().count() as u64;
                    self.blobs.insert(entry.id(), lines);
                    total += lines;
                    TreeWalkResult::Ok
                }
                Err(e) => {
                    failure = Some(e);
                    TreeWalkResult::Abort
                }
            }
        });

        if let Some(e) = failure {
            return Err(e.into());
        }
        walk?;
        Ok(total)
    }
}

/// `{developer}_developer_effort.csv`, with spaces replaced by underscores
pub fn effort_file_name(developer: &str) -> String {
    let sanitized: String = developer
        .chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}_developer_effort.csv", sanitized)
}

/// Appends records to one CSV per developer in `dir`. A header goes into files
/// that are empty when opened; commits already present are not written again.
/// Returns the number of rows written.
pub fn append_effort(dir: &Path, records: &[DeveloperEffortRecord]) -> Result<usize> {
    let mut by_developer: BTreeMap<&str, Vec<&DeveloperEffortRecord>> = BTreeMap::new();
    for record in records {
        by_developer.entry(record.developer_name.as_str()).or_default().push(record);
    }

    let mut written = 0;
    for (developer, records) in by_developer {
        let path: PathBuf = dir.join(effort_file_name(developer));
        let mut known = recorded_hashes(&path)?;

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", EFFORT_HEADER)?;
        }
        for record in records {
            if !known.insert(record.commit_hash.clone()) {
                continue;
            }
            writeln!(file, "{},{},{}", record.commit_hash, record.parent_hash, record.lines_changed)?;
            written += 1;
        }
    }

    Ok(written)
}

fn recorded_hashes(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .collect())
}
