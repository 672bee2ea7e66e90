pub mod cli;
pub mod client;
pub mod commands;
pub mod error;
pub mod grid;
pub mod records;
pub mod store;
pub mod tui;
pub mod types;

pub use client::{ActionClient, Analysis, Insight, MockClient, Review};
pub use error::{OpsdeckError, Result};
pub use grid::{move_by_id, Cell, ColumnSpec, GridRecord, SortDirection, TableSchema, ViewState};
pub use records::RecordSource;
pub use types::{
    Issue, IssueStatus, MergeRequest, MergeStatus, Platform, Priority, RecordKind, Repository,
};
