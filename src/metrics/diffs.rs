// src/metrics/diffs.rs

use crate::error::Result;
use crate::model::{CommitDiffRecord, FileDiff};
use git2::{Commit, DiffOptions, Oid, Patch, Repository};
use indicatif::ProgressBar;

/// Builds one diff record per commit in `commits`. Callers pass unique hashes.
pub fn collect_diffs(repo: &Repository, commits: &[String]) -> Result<Vec<CommitDiffRecord>> {
    let bar = ProgressBar::new(commits.len() as u64);
    bar.set_message("Collecting diffs");

    let mut records = Vec::with_capacity(commits.len());
    for hash in commits {
        let commit = repo.find_commit(Oid::from_str(hash)?)?;
        records.push(CommitDiffRecord {
            commit_hash: hash.clone(),
            diffs: file_diffs(repo, &commit)?,
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(records)
}

/// Per-file changes of `commit` against its first parent (or the empty tree
/// for a root commit)
fn file_diffs(repo: &Repository, commit: &Commit) -> Result<Vec<FileDiff>> {
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };
    let current_tree = commit.tree()?;

    let mut diff_opts = DiffOptions::new();
    diff_opts.ignore_filemode(true);

    let mut diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&current_tree), Some(&mut diff_opts))?;
    diff.find_similar(None)?;

    let mut files = Vec::new();
    for idx in 0..diff.deltas().len() {
        let Some(mut patch) = Patch::from_diff(&diff, idx)? else { continue };

        let file = {
            let delta = patch.delta();
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let (_, added, deleted) = patch.line_stats()?;
        let text = patch.to_buf()?;

        files.push(FileDiff {
            file,
            added,
            deleted,
            diff: String::from_utf8_lossy(&text).into_owned(),
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestRepo;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collects_line_counts_and_patch() {
        let test_repo = TestRepo::new();
        test_repo.commit("Ada", 1_000, &[("src/a.rs", "one\ntwo\nthree\n")]);
        let second = test_repo.commit("Ada", 2_000, &[("src/a.rs", "one\nTWO\nthree\nfour\n"), ("notes.md", "hi\n")]);

        let records = collect_diffs(&test_repo.repo, &[second.to_string()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].commit_hash, second.to_string());

        let mut files: Vec<(&str, usize, usize)> =
            records[0].diffs.iter().map(|d| (d.file.as_str(), d.added, d.deleted)).collect();
        files.sort();
        assert_eq!(files, vec![("notes.md", 1, 0), ("src/a.rs", 2, 1)]);

        let patch = &records[0].diffs.iter().find(|d| d.file == "src/a.rs").unwrap().diff;
        assert!(patch.contains("-two"));
        assert!(patch.contains("+TWO"));
    }

    #[test]
    fn test_root_commit_diffs_against_empty_tree() {
        let test_repo = TestRepo::new();
        let root = test_repo.commit("Ada", 1_000, &[("a.py", "x = 1\ny = 2\n")]);

        let records = collect_diffs(&test_repo.repo, &[root.to_string()]).unwrap();
        assert_eq!(records[0].diffs.len(), 1);
        assert_eq!(records[0].diffs[0].added, 2);
        assert_eq!(records[0].diffs[0].deleted, 0);
    }

    #[test]
    fn test_serialized_shape() {
        let record = CommitDiffRecord {
            commit_hash: "abc".into(),
            diffs: vec![FileDiff { file: "a.rs".into(), added: 1, deleted: 2, diff: "@@".into() }],
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"commit_hash": "abc", "diffs": [{"file": "a.rs", "added": 1, "deleted": 2, "diff": "@@"}]})
        );
    }
}
