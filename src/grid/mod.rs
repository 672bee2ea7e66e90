//! Generic record grid core.
//!
//! One implementation drives both the issues and merge-requests screens:
//! - `schema` - column descriptors and cell render descriptors
//! - `view_state` - sort/filter/visibility/selection/pagination state and
//!   the pure derivation of the visible page
//! - `reorder` - id-keyed array move for drag reordering

pub mod reorder;
pub mod schema;
pub mod view_state;

pub use reorder::move_by_id;
pub use schema::{BadgeColor, Cell, ColumnId, ColumnSpec, FilterMode, GridRecord, SortKey, TableSchema};
pub use view_state::{
    Filter, GridView, Pagination, SortDirection, SortRule, ViewState, PAGE_SIZES,
};
