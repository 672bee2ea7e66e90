//! Interactive view state for the generic grid and the pure derivation of
//! the visible page.
//!
//! `ViewState` holds everything the user can change without touching the
//! record collection: free-text query, sort rules, hidden columns, column
//! filters, row selection, and pagination. `derive` turns a collection plus
//! a `ViewState` into the exact rows to render; it never mutates either
//! input, so the same inputs always produce the same page.

use std::collections::BTreeSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use unicase::UniCase;

use super::schema::{ColumnId, FilterMode, GridRecord, TableSchema};

/// Page sizes offered by the rows-per-page selector.
pub const PAGE_SIZES: &[usize] = &[10, 20, 30, 40, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// One sort criterion; rules apply in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortRule {
    pub column: ColumnId,
    pub direction: SortDirection,
}

/// One active column filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: ColumnId,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: PAGE_SIZES[0],
        }
    }
}

/// All interactive state for one grid instance.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub query: String,
    pub sorting: Vec<SortRule>,
    pub hidden_columns: BTreeSet<ColumnId>,
    pub filters: Vec<Filter>,
    pub selection: BTreeSet<String>,
    pub pagination: Pagination,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace or clear the sort rule for a column. Passing `None` removes
    /// the rule; a new rule is appended, so multi-column sort order is the
    /// order in which sorts were applied.
    pub fn set_sort(&mut self, column: ColumnId, direction: Option<SortDirection>) {
        match direction {
            Some(direction) => {
                if let Some(rule) = self.sorting.iter_mut().find(|r| r.column == column) {
                    rule.direction = direction;
                } else {
                    self.sorting.push(SortRule { column, direction });
                }
            }
            None => self.sorting.retain(|r| r.column != column),
        }
    }

    /// Cycle a column through ascending, descending, unsorted.
    pub fn cycle_sort(&mut self, column: ColumnId) {
        let current = self
            .sorting
            .iter()
            .find(|r| r.column == column)
            .map(|r| r.direction);
        let next = match current {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        };
        self.set_sort(column, next);
    }

    pub fn sort_for(&self, column: ColumnId) -> Option<SortRule> {
        self.sorting.iter().copied().find(|r| r.column == column)
    }

    /// Show or hide a column. Whether the column is actually hideable is
    /// enforced at derivation time against the schema, so structural
    /// columns can never disappear.
    pub fn set_column_visible(&mut self, column: ColumnId, visible: bool) {
        if visible {
            self.hidden_columns.remove(column);
        } else {
            self.hidden_columns.insert(column);
        }
    }

    pub fn is_column_visible(&self, column: ColumnId) -> bool {
        !self.hidden_columns.contains(column)
    }

    /// Replace the filter for a column; an empty value clears it. Changing
    /// a filter resets pagination to the first page.
    pub fn set_filter(&mut self, column: ColumnId, value: &str) {
        self.filters.retain(|f| f.column != column);
        if !value.is_empty() {
            self.filters.push(Filter {
                column,
                value: value.to_string(),
            });
        }
        self.pagination.page_index = 0;
    }

    pub fn filter_for(&self, column: ColumnId) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pagination.page_index = 0;
    }

    pub fn toggle_row_selected(&mut self, id: &str) {
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Select or deselect exactly the given page of row ids. Rows on other
    /// pages keep their selection state.
    pub fn set_page_selected<'a>(&mut self, page_ids: impl IntoIterator<Item = &'a str>, on: bool) {
        for id in page_ids {
            if on {
                self.selection.insert(id.to_string());
            } else {
                self.selection.remove(id);
            }
        }
    }

    /// Jump to a page, clamped into the valid range for `filtered_count`.
    pub fn set_page(&mut self, index: usize, filtered_count: usize) {
        let last = total_pages(filtered_count, self.pagination.page_size) - 1;
        self.pagination.page_index = index.min(last);
    }

    /// Change the page size, recomputing the page count and clamping the
    /// current page into range.
    pub fn set_page_size(&mut self, size: usize, filtered_count: usize) {
        if size == 0 {
            return;
        }
        self.pagination.page_size = size;
        let last = total_pages(filtered_count, size) - 1;
        self.pagination.page_index = self.pagination.page_index.min(last);
    }

    /// True when nothing narrows or reorders the view, i.e. the rendered
    /// order equals the base collection order. Drag reordering is only
    /// offered in this state.
    pub fn is_natural_order(&self) -> bool {
        self.query.is_empty() && self.sorting.is_empty() && self.filters.is_empty()
    }
}

/// `ceil(filtered / page_size)`, never less than one page.
pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    filtered_count.div_ceil(page_size).max(1)
}

/// The derived, render-ready view of one grid page.
#[derive(Debug)]
pub struct GridView<'a, R> {
    pub page_rows: Vec<&'a R>,
    pub filtered_count: usize,
    pub total_pages: usize,
    /// Clamped page index actually rendered.
    pub page_index: usize,
    pub page_size: usize,
    /// How many of the filtered rows are selected (for "N of M selected").
    pub selected_filtered: usize,
}

impl<'a, R: GridRecord> GridView<'a, R> {
    pub fn page_ids(&self) -> Vec<String> {
        self.page_rows.iter().map(|r| r.id().to_string()).collect()
    }

    pub fn all_page_selected(&self, view: &ViewState) -> bool {
        !self.page_rows.is_empty() && self.page_rows.iter().all(|r| view.is_selected(r.id()))
    }

    pub fn can_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }
}

/// Pure derivation: filter, sort, and paginate a collection.
///
/// Out-of-range page indices clamp to the last valid page; a filter with no
/// matches yields an empty page rather than an error.
pub fn derive<'a, R: GridRecord>(
    records: &'a [R],
    view: &ViewState,
    schema: &TableSchema<R>,
) -> GridView<'a, R> {
    let mut rows: Vec<&R> = records.iter().collect();

    // Free-text query first, preserving collection order.
    if !view.query.is_empty() {
        let matcher = SkimMatcherV2::default().smart_case();
        rows.retain(|r| matcher.fuzzy_match(&r.search_text(), &view.query).is_some());
    }

    // Column filters.
    for filter in &view.filters {
        let Some(column) = schema.column(filter.column) else {
            continue;
        };
        match column.filter {
            FilterMode::Substring => {
                let needle = filter.value.to_lowercase();
                rows.retain(|r| (column.text)(r).to_lowercase().contains(&needle));
            }
            FilterMode::Exact => {
                let needle = UniCase::new(filter.value.clone());
                rows.retain(|r| UniCase::new((column.text)(r)) == needle);
            }
            FilterMode::None => {}
        }
    }

    // Sort rules in insertion order; stable sort keeps collection order for
    // ties on every rule.
    for rule in view.sorting.iter().rev() {
        let Some(column) = schema.column(rule.column) else {
            continue;
        };
        if !column.sortable {
            continue;
        }
        rows.sort_by(|a, b| {
            let ord = (column.sort_key)(a).cmp(&(column.sort_key)(b));
            match rule.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    let filtered_count = rows.len();
    let selected_filtered = rows.iter().filter(|r| view.is_selected(r.id())).count();

    let page_size = view.pagination.page_size.max(1);
    let pages = total_pages(filtered_count, page_size);
    let page_index = view.pagination.page_index.min(pages - 1);

    let start = page_index * page_size;
    let end = (start + page_size).min(filtered_count);
    let page_rows = if start < filtered_count {
        rows[start..end].to_vec()
    } else {
        Vec::new()
    };

    GridView {
        page_rows,
        filtered_count,
        total_pages: pages,
        page_index,
        page_size,
        selected_filtered,
    }
}

/// Visible columns in schema order. Hidden state only applies to hideable
/// columns, so structural columns are always rendered.
pub fn visible_columns<'a, R>(
    schema: &'a TableSchema<R>,
    view: &ViewState,
) -> Vec<&'a super::schema::ColumnSpec<R>> {
    schema
        .columns
        .iter()
        .filter(|c| !c.hideable || view.is_column_visible(c.id))
        .collect()
}
