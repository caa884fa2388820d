// src/output.rs

use crate::detector::DetectorReport;
use crate::error::{MinerError, Result};
use crate::metrics::effort;
use crate::metrics::summary::RefactoringSummary;
use crate::model::{CommitDiffRecord, DeveloperEffortRecord, IssueSet};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "rminer-output.json";
pub const SUMMARY_FILE: &str = "refactorings.json";
pub const DIFFS_FILE: &str = "diffs.json";

/// Per-project output directory
#[derive(Debug, Clone)]
pub struct OutputBundle {
    dir: PathBuf,
}

impl OutputBundle {
    /// Creates `root/name`. An existing directory means the project was
    /// already mined and is reported as `AlreadyMined`.
    pub fn create(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        if dir.exists() {
            return Err(MinerError::AlreadyMined(dir));
        }
        fs::create_dir_all(&dir)?;
        Ok(OutputBundle { dir })
    }

    /// Removes the directory again, for projects that never got started
    pub fn discard(self) -> Result<()> {
        fs::remove_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_report(&self, report: &DetectorReport) -> Result<()> {
        write_json(&self.dir.join(REPORT_FILE), report)
    }

    pub fn write_summary(&self, summary: &RefactoringSummary) -> Result<()> {
        write_json(&self.dir.join(SUMMARY_FILE), summary)
    }

    pub fn write_diffs(&self, diffs: &[CommitDiffRecord]) -> Result<()> {
        write_json(&self.dir.join(DIFFS_FILE), diffs)
    }

    pub fn write_effort(&self, records: &[DeveloperEffortRecord]) -> Result<usize> {
        effort::append_effort(&self.dir, records)
    }

    pub fn write_issues(&self, set: &IssueSet) -> Result<PathBuf> {
        let path = self.dir.join(set.file_name());
        write_json(&path, &set.issues)?;
        Ok(path)
    }
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_directory_is_already_mined() {
        let root = TempDir::new().unwrap();
        let bundle = OutputBundle::create(root.path(), "kafka").unwrap();
        assert!(bundle.dir().is_dir());

        let err = OutputBundle::create(root.path(), "kafka").unwrap_err();
        assert!(matches!(err, MinerError::AlreadyMined(_)));
    }

    #[test]
    fn test_discarded_bundle_can_be_recreated() {
        let root = TempDir::new().unwrap();
        let bundle = OutputBundle::create(root.path(), "kafka").unwrap();
        let dir = bundle.dir().to_path_buf();
        bundle.discard().unwrap();
        assert!(!dir.exists());

        assert!(OutputBundle::create(root.path(), "kafka").is_ok());
    }

    #[test]
    fn test_issue_file_written_verbatim() {
        let root = TempDir::new().unwrap();
        let bundle = OutputBundle::create(root.path(), "kafka").unwrap();
        let set = IssueSet {
            tracker: crate::model::Tracker::GitHub,
            label: "kafka".into(),
            issues: vec![serde_json::json!({"number": 7, "title": "x"})],
            degraded: false,
        };

        let path = bundle.write_issues(&set).unwrap();
        assert_eq!(path.file_name().unwrap(), "kafka_github_issues.json");
        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!([{"number": 7, "title": "x"}]));
    }
}
