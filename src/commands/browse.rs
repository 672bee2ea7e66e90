//! Browser commands (`opsdeck issues`, `opsdeck merge-requests`)
//!
//! Launch the fullscreen record browsers.

use std::path::PathBuf;

use iocraft::prelude::*;

use crate::error::{OpsdeckError, Result};
use crate::tui::{IssuesScreen, MergeRequestsScreen};

/// Launch the issues browser TUI.
pub fn cmd_issues(repo: Option<String>, data_dir: Option<PathBuf>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| OpsdeckError::Other(format!("Failed to create runtime: {}", e)))?;

    rt.block_on(async {
        element!(IssuesScreen(repo: repo.clone(), data_dir: data_dir.clone()))
            .fullscreen()
            .await
            .map_err(|e| OpsdeckError::Other(format!("TUI error: {}", e)))
    })
}

/// Launch the merge requests browser TUI.
pub fn cmd_merge_requests(repo: Option<String>, data_dir: Option<PathBuf>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| OpsdeckError::Other(format!("Failed to create runtime: {}", e)))?;

    rt.block_on(async {
        element!(MergeRequestsScreen(repo: repo.clone(), data_dir: data_dir.clone()))
            .fullscreen()
            .await
            .map_err(|e| OpsdeckError::Other(format!("TUI error: {}", e)))
    })
}
