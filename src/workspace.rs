// src/workspace.rs

use crate::error::{MinerError, Result};
use crate::model::ProjectReference;
use git2::Repository;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use walkdir::WalkDir;

/// A local clone of one project. The directory lives exactly as long as this
/// value: it is removed by `release` or, failing that, on drop.
#[derive(Debug)]
pub struct WorkingCopy {
    project: ProjectReference,
    path: PathBuf,
    released: bool,
}

impl WorkingCopy {
    /// Clones `project` into `clone_root/<name>`.
    pub fn acquire(project: &ProjectReference, clone_root: &Path) -> Result<Self> {
        let path = clone_root.join(project.name());
        if path.exists() {
            tracing::warn!("Removing stale working copy at {}", path.display());
            remove_tree(&path)?;
        }
        fs::create_dir_all(clone_root)?;

        let clone_error = |message: String| MinerError::Clone { url: project.url().to_string(), message };

        let mut child = Command::new("git")
            .arg("clone")
            .arg(project.url())
            .arg(&path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| clone_error(e.to_string()))?;

        // From here on a partial clone is cleaned up on every exit path
        let copy = WorkingCopy { project: project.clone(), path, released: false };

        let mut output = Vec::new();
        if let Some(stderr) = child.stderr.take() {
            for line in BufReader::new(stderr).lines() {
                let line = line?;
                tracing::debug!("{}", line);
                output.push(line);
            }
        }
        let status = child.wait()?;
        if !status.success() {
            return Err(clone_error(format!("git exited with {}: {}", status, output.join(" "))));
        }

        tracing::info!("Cloned {} into {}", project, copy.path.display());
        Ok(copy)
    }

    /// Wraps an existing directory without cloning
    #[cfg(test)]
    pub(crate) fn adopt(project: ProjectReference, path: PathBuf) -> Self {
        WorkingCopy { project, path, released: false }
    }

    pub fn project(&self) -> &ProjectReference {
        &self.project
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Result<Repository> {
        Ok(Repository::open(&self.path)?)
    }

    /// Deletes the working directory. Safe to call again after a failed attempt.
    pub fn release(&mut self) -> Result<()> {
        remove_tree(&self.path)?;
        self.released = true;
        Ok(())
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_tree(&self.path) {
            tracing::warn!("Failed to remove working copy {}: {}", self.path.display(), e);
        }
    }
}

/// Recursively removes `path`, clearing read-only flags first. Git marks its
/// object files read-only, which makes plain removal fail on some platforms.
fn remove_tree(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        let Ok(metadata) = entry.metadata() else { continue };
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            fs::set_permissions(entry.path(), permissions)?;
        }
    }

    fs::remove_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn adopt(dir: &Path) -> WorkingCopy {
        WorkingCopy::adopt(ProjectReference::from_url("https://github.com/apache/demo.git"), dir.to_path_buf())
    }

    fn populate_read_only(dir: &Path) {
        let objects = dir.join(".git").join("objects");
        fs::create_dir_all(&objects).unwrap();
        let file = objects.join("pack");
        fs::write(&file, b"data").unwrap();
        let mut permissions = fs::metadata(&file).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&file, permissions).unwrap();
    }

    #[test]
    fn test_release_removes_read_only_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("demo");
        populate_read_only(&dir);

        let mut copy = adopt(&dir);
        copy.release().unwrap();
        assert!(!dir.exists());

        // Second release is a no-op
        copy.release().unwrap();
    }

    #[test]
    fn test_drop_releases_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("demo");
        populate_read_only(&dir);

        {
            let _copy = adopt(&dir);
            assert!(dir.exists());
        }
        assert!(!dir.exists());
    }

    #[test]
    fn test_clone_failure_is_clone_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        let project = ProjectReference::from_url(missing.to_str().unwrap());
        let clones = temp.path().join("clones");

        let err = WorkingCopy::acquire(&project, &clones).unwrap_err();
        assert!(matches!(err, MinerError::Clone { .. }), "unexpected error: {err}");
        assert!(!clones.join("does-not-exist").exists());
    }
}
