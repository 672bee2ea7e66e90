//! Per-entity configuration consumed by the generic browser.
//!
//! The browser itself knows nothing about issues or merge requests; each
//! screen supplies an `EntityConfig` with its schema, status tabs, detail
//! overlay content, and AI-flag accessors.

use crate::grid::{ColumnId, TableSchema};
use crate::grid::schema::BadgeColor;

/// Column id carrying the status values used by the tab bar.
pub const STATUS_COLUMN: ColumnId = "status";
/// Column id targeted by the `--repo` filter.
pub const REPOSITORY_COLUMN: ColumnId = "repository";

/// People offered by the assignee/reviewer pickers in the create forms.
pub const PEOPLE: &[&str] = &[
    "Sarah Chen",
    "Eddie Lake",
    "Jamik Tashpulatov",
    "Raj Patel",
];

/// One status tab; `filter` is the exact status value it applies, `None`
/// showing everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub label: &'static str,
    pub filter: Option<&'static str>,
}

/// One insight card shown on the AI tab of the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InsightCard {
    pub title: String,
    pub body: String,
}

/// Fully rendered content for one record's detail overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailContent {
    pub id: String,
    pub title: String,
    pub status_label: String,
    pub status_color: BadgeColor,
    pub repository: String,
    /// Label/value pairs for the Details tab.
    pub fields: Vec<(&'static str, String)>,
    /// "Labels" for issues, "Reviewers" for merge requests.
    pub tags_title: &'static str,
    pub tags: Vec<String>,
    pub description: Vec<String>,
    pub activity: Vec<String>,
    pub flag_set: bool,
    /// Canned AI insight cards, shown once the flag is set.
    pub insights: Vec<InsightCard>,
}

/// Everything the generic browser needs to host one entity kind.
pub struct EntityConfig<R> {
    /// Plural display title, e.g. "Issues".
    pub title: &'static str,
    /// Singular noun used in toasts, e.g. "issue".
    pub singular: &'static str,
    /// Title of the create form, e.g. "Create New Issue".
    pub create_title: &'static str,
    /// Label for the create form's person picker.
    pub person_label: &'static str,
    /// Label of the per-row AI action, e.g. "Analyze".
    pub action_label: &'static str,
    /// Toast text prefix while the AI action runs.
    pub action_running: &'static str,
    /// Toast text when the AI action completes.
    pub action_done: &'static str,
    /// Title of the AI tab in the detail overlay.
    pub analysis_title: &'static str,
    pub schema: TableSchema<R>,
    pub tabs: Vec<Tab>,
    pub detail: fn(&R) -> DetailContent,
    pub flag_set: fn(&R) -> bool,
    pub set_flag: fn(&mut R),
}
