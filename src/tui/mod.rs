//! TUI module for the interactive dashboard screens
//!
//! Two screens share one generic record browser:
//! - `issues` - the issue grid
//! - `merge_requests` - the merge request grid

pub mod browser;
pub mod components;
pub mod issues;
pub mod merge_requests;
pub mod theme;

pub use browser::BrowserView;
pub use issues::{IssuesScreen, IssuesScreenProps};
pub use merge_requests::{MergeRequestsScreen, MergeRequestsScreenProps};
pub use theme::Theme;
