//! Record model shared by every screen.
//!
//! The wire format is the camelCase JSON used by the bundled fixtures
//! (`data/*.json`). Status, kind, and priority are closed enumerations;
//! unrecognized wire values deserialize to `Unknown` so rendering always
//! has a defined fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OpsdeckError;

/// Workflow status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IssueStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueStatus::Open => write!(f, "Open"),
            IssueStatus::InProgress => write!(f, "In Progress"),
            IssueStatus::Closed => write!(f, "Closed"),
            IssueStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for IssueStatus {
    type Err = OpsdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(IssueStatus::Open),
            "in progress" | "in-progress" => Ok(IssueStatus::InProgress),
            "closed" => Ok(IssueStatus::Closed),
            _ => Err(OpsdeckError::InvalidStatus(s.to_string())),
        }
    }
}

/// Review status of a merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MergeStatus {
    #[default]
    Open,
    #[serde(rename = "In Review")]
    InReview,
    Merged,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStatus::Open => write!(f, "Open"),
            MergeStatus::InReview => write!(f, "In Review"),
            MergeStatus::Merged => write!(f, "Merged"),
            MergeStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for MergeStatus {
    type Err = OpsdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(MergeStatus::Open),
            "in review" | "in-review" => Ok(MergeStatus::InReview),
            "merged" => Ok(MergeStatus::Merged),
            _ => Err(OpsdeckError::InvalidStatus(s.to_string())),
        }
    }
}

/// Categorization shared by issues and merge requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RecordKind {
    Bug,
    Feature,
    Security,
    Performance,
    Documentation,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Bug => write!(f, "Bug"),
            RecordKind::Feature => write!(f, "Feature"),
            RecordKind::Security => write!(f, "Security"),
            RecordKind::Performance => write!(f, "Performance"),
            RecordKind::Documentation => write!(f, "Documentation"),
            RecordKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Priority bucket shared by issues and merge requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl Priority {
    /// Sort rank; lower means more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Unknown => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => write!(f, "Critical"),
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
            Priority::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for Priority {
    type Err = OpsdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(OpsdeckError::InvalidPriority(s.to_string())),
        }
    }
}

/// Source-control platform a record or API key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    GitHub,
    GitLab,
    SelfHosted,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GitHub => write!(f, "GitHub"),
            Platform::GitLab => write!(f, "GitLab"),
            Platform::SelfHosted => write!(f, "Self-hosted"),
        }
    }
}

impl FromStr for Platform {
    type Err = OpsdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(Platform::GitHub),
            "gitlab" => Ok(Platform::GitLab),
            "self-hosted" | "selfhosted" => Ok(Platform::SelfHosted),
            _ => Err(OpsdeckError::Other(format!("invalid platform: {}", s))),
        }
    }
}

pub const VALID_PLATFORMS: &[&str] = &["github", "gitlab", "self-hosted"];

/// One tracked issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub status: IssueStatus,
    pub repository: String,
    pub author: String,
    pub created: String,
    pub updated: String,
    pub assignee: String,
    pub ai_analyzed: bool,
    pub priority: Priority,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// One merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub status: MergeStatus,
    pub repository: String,
    pub author: String,
    pub created: String,
    pub updated: String,
    #[serde(default)]
    pub reviewers: Vec<String>,
    pub ai_reviewed: bool,
    pub priority: Priority,
    pub branch: String,
    pub source: String,
}

/// Repository summary shown by `opsdeck repos` and used by create forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    pub description: String,
    pub language: String,
    pub stars: u32,
    pub open_issues: u32,
    pub open_merge_requests: u32,
    pub updated: String,
}
