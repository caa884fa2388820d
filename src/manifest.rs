// src/manifest.rs

use crate::model::ProjectReference;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const PROJECT_COLUMN: &str = "project";

/// Reads the unique projects listed in the `project` column of a CSV
/// manifest, in order of first appearance.
pub fn read_manifest(path: &Path) -> Result<Vec<ProjectReference>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read manifest {}", path.display()))?;
    parse_manifest(&contents).with_context(|| format!("Invalid manifest {}", path.display()))
}

pub fn parse_manifest(contents: &str) -> Result<Vec<ProjectReference>> {
    let mut lines = contents.lines();
    let header = lines.next().unwrap_or_default();
    let Some(column) = split_row(header).iter().position(|c| c == PROJECT_COLUMN) else {
        bail!("no `{}` column in header", PROJECT_COLUMN);
    };

    let mut seen = HashSet::new();
    let mut projects = Vec::new();
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let Some(identifier) = split_row(line).into_iter().nth(column) else { continue };
        if identifier.is_empty() || !seen.insert(identifier.clone()) {
            continue;
        }
        projects.push(if identifier.contains("://") {
            ProjectReference::from_url(&identifier)
        } else {
            ProjectReference::from_identifier(&identifier)
        });
    }

    tracing::info!("There are {} unique projects", projects.len());
    Ok(projects)
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().trim_matches('"').to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unique_projects_in_order() {
        let csv = "metric,project,value\nncloc,apache_kafka,1\ncomplexity,apache_kafka,2\nncloc,\"incubator-iotdb\",3\n";
        let urls: Vec<String> = parse_manifest(csv).unwrap().iter().map(|p| p.url().to_string()).collect();
        assert_eq!(
            urls,
            vec!["https://github.com/apache/kafka.git", "https://github.com/apache/incubator-iotdb.git"]
        );
    }

    #[test]
    fn test_urls_are_used_as_is() {
        let csv = "project\nhttps://github.com/apache/commons-io.git\n";
        let projects = parse_manifest(csv).unwrap();
        assert_eq!(projects[0].name(), "commons-io");
    }

    #[test]
    fn test_missing_column() {
        assert!(parse_manifest("name,value\nx,1\n").is_err());
    }
}
