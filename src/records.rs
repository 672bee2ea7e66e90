//! Record sources.
//!
//! Every screen loads its collection once per mount, either from the JSON
//! fixtures bundled into the binary or from a directory override passed on
//! the command line (`--data <dir>`, same file names). Collections are
//! validated for unique ids on load since `id` is the only key used for
//! selection, reordering, and detail identity.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{OpsdeckError, Result};
use crate::types::{Issue, MergeRequest, Repository};

pub const ISSUES_FILE: &str = "issues.json";
pub const MERGE_REQUESTS_FILE: &str = "merge_requests.json";
pub const REPOSITORIES_FILE: &str = "repositories.json";

const BUNDLED_ISSUES: &str = include_str!("../data/issues.json");
const BUNDLED_MERGE_REQUESTS: &str = include_str!("../data/merge_requests.json");
const BUNDLED_REPOSITORIES: &str = include_str!("../data/repositories.json");

/// Where record collections are read from.
#[derive(Debug, Clone, Default)]
pub struct RecordSource {
    data_dir: Option<PathBuf>,
}

impl RecordSource {
    /// Source backed by the JSON bundled into the binary.
    pub fn bundled() -> Self {
        Self { data_dir: None }
    }

    /// Source reading the fixture file names from `dir` instead.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
        }
    }

    pub fn for_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(d) => Self::from_dir(d),
            None => Self::bundled(),
        }
    }

    pub async fn load_issues(&self) -> Result<Vec<Issue>> {
        let issues: Vec<Issue> = self.load(ISSUES_FILE, BUNDLED_ISSUES).await?;
        validate_unique_ids(issues.iter().map(|i| i.id.as_str()))?;
        Ok(issues)
    }

    pub async fn load_merge_requests(&self) -> Result<Vec<MergeRequest>> {
        let mrs: Vec<MergeRequest> = self.load(MERGE_REQUESTS_FILE, BUNDLED_MERGE_REQUESTS).await?;
        validate_unique_ids(mrs.iter().map(|m| m.id.as_str()))?;
        Ok(mrs)
    }

    pub async fn load_repositories(&self) -> Result<Vec<Repository>> {
        self.load(REPOSITORIES_FILE, BUNDLED_REPOSITORIES).await
    }

    /// Blocking variants for plain-text commands that run outside the UI loop.
    pub fn load_repositories_sync(&self) -> Result<Vec<Repository>> {
        self.load_sync(REPOSITORIES_FILE, BUNDLED_REPOSITORIES)
    }

    async fn load<T: DeserializeOwned>(&self, file_name: &str, bundled: &str) -> Result<Vec<T>> {
        match &self.data_dir {
            Some(dir) => {
                let path = dir.join(file_name);
                let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    OpsdeckError::InvalidData(format!("{}: {}", path.display(), e))
                })?;
                parse_records(&raw, file_name)
            }
            None => parse_records(bundled, file_name),
        }
    }

    fn load_sync<T: DeserializeOwned>(&self, file_name: &str, bundled: &str) -> Result<Vec<T>> {
        match &self.data_dir {
            Some(dir) => {
                let path = dir.join(file_name);
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    OpsdeckError::InvalidData(format!("{}: {}", path.display(), e))
                })?;
                parse_records(&raw, file_name)
            }
            None => parse_records(bundled, file_name),
        }
    }
}

fn parse_records<T: DeserializeOwned>(raw: &str, file_name: &str) -> Result<Vec<T>> {
    serde_json::from_str(raw)
        .map_err(|e| OpsdeckError::InvalidData(format!("{}: {}", file_name, e)))
}

fn validate_unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            tracing::warn!(id, "duplicate record id in collection");
            return Err(OpsdeckError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundled_issues_parse() {
        let issues = RecordSource::bundled().load_issues().await.unwrap();
        assert!(!issues.is_empty());
        assert!(issues.iter().all(|i| !i.id.is_empty()));
    }

    #[tokio::test]
    async fn test_bundled_merge_requests_parse() {
        let mrs = RecordSource::bundled().load_merge_requests().await.unwrap();
        assert_eq!(mrs.len(), 12);
    }

    #[tokio::test]
    async fn test_bundled_repositories_parse() {
        let repos = RecordSource::bundled().load_repositories().await.unwrap();
        assert!(repos.iter().any(|r| r.name == "backend/api"));
    }

    #[tokio::test]
    async fn test_dir_override_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordSource::from_dir(dir.path())
            .load_issues()
            .await
            .unwrap_err();
        assert!(matches!(err, OpsdeckError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ISSUES_FILE);
        let issue = r#"{
            "id": "ISS-1", "title": "a", "type": "Bug", "status": "Open",
            "repository": "r", "author": "x", "created": "2025-01-01",
            "updated": "2025-01-01", "assignee": "y", "aiAnalyzed": false,
            "priority": "Low", "labels": []
        }"#;
        std::fs::write(&path, format!("[{issue},{issue}]")).unwrap();
        let err = RecordSource::from_dir(dir.path())
            .load_issues()
            .await
            .unwrap_err();
        assert!(matches!(err, OpsdeckError::DuplicateId(_)));
    }
}
