//! Grid core properties exercised through the real entity schemas.
//!
//! These tests complement the unit tests in `src/grid/` by running the
//! derivation, selection, and reorder contracts against the issue and
//! merge-request configurations instead of synthetic schemas.

mod common;

use common::mock_data::{mock_issues, mock_merge_requests, IssueBuilder};
use opsdeck::grid::view_state::{derive, total_pages, ViewState};
use opsdeck::grid::{move_by_id, Cell, GridRecord, PAGE_SIZES};
use opsdeck::tui::issues::ISSUE_CONFIG;
use opsdeck::tui::merge_requests::MERGE_REQUEST_CONFIG;
use opsdeck::types::{Issue, IssueStatus, Priority, RecordKind};

fn ids(rows: &[&Issue]) -> Vec<String> {
    rows.iter().map(|i| i.id.clone()).collect()
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_repo_filter_then_clear_restores_view() {
    // Spec scenario: two records in repos A and B.
    let issues = vec![
        IssueBuilder::new("1").repository("repo-a").build(),
        IssueBuilder::new("2")
            .repository("repo-b")
            .status(IssueStatus::Closed)
            .build(),
    ];
    let schema = &ISSUE_CONFIG.schema;
    let mut view = ViewState::new();

    let before = derive(&issues, &view, schema);
    let original = ids(&before.page_rows);
    let original_pages = before.total_pages;

    view.set_filter("repository", "repo-a");
    let filtered = derive(&issues, &view, schema);
    assert_eq!(ids(&filtered.page_rows), vec!["1"]);

    view.set_filter("repository", "");
    let after = derive(&issues, &view, schema);
    assert_eq!(ids(&after.page_rows), original);
    assert_eq!(after.total_pages, original_pages);
}

#[test]
fn test_status_filter_empty_result_is_page_not_error() {
    let issues: Vec<Issue> = (0..4)
        .map(|i| IssueBuilder::new(&format!("i-{i}")).build())
        .collect();
    let mut view = ViewState::new();
    view.set_filter("status", "Closed");
    let gv = derive(&issues, &view, &ISSUE_CONFIG.schema);
    assert_eq!(gv.filtered_count, 0);
    assert_eq!(gv.total_pages, 1);
    assert!(gv.page_rows.is_empty());
}

// ============================================================================
// Pagination invariants
// ============================================================================

#[test]
fn test_page_index_always_in_range_after_mutations() {
    let issues = mock_issues(37);
    let schema = &ISSUE_CONFIG.schema;
    let mut view = ViewState::new();

    // Arbitrary sequence of page-size/filter/page mutations.
    let filtered = derive(&issues, &view, schema).filtered_count;
    view.set_page(3, filtered);
    view.set_page_size(10, filtered);
    view.set_filter("status", "Open");
    let filtered = derive(&issues, &view, schema).filtered_count;
    view.set_page(99, filtered);
    view.set_page_size(50, filtered);
    view.set_filter("status", "");

    let gv = derive(&issues, &view, schema);
    assert_eq!(
        gv.total_pages,
        total_pages(gv.filtered_count, gv.page_size)
    );
    assert!(gv.page_index < gv.total_pages);
}

#[test]
fn test_total_pages_formula_for_all_page_sizes() {
    let issues = mock_issues(23);
    let schema = &ISSUE_CONFIG.schema;
    for &size in PAGE_SIZES {
        let mut view = ViewState::new();
        view.set_page_size(size, issues.len());
        let gv = derive(&issues, &view, schema);
        assert_eq!(gv.total_pages, 23usize.div_ceil(size).max(1));
    }
}

#[test]
fn test_twelve_merge_requests_two_pages() {
    // Spec scenario: 12 records, page size 10, then 20.
    let mrs = mock_merge_requests(12);
    let schema = &MERGE_REQUEST_CONFIG.schema;
    let mut view = ViewState::new();

    let gv = derive(&mrs, &view, schema);
    assert_eq!(gv.total_pages, 2);
    let first_page: Vec<&str> = gv.page_rows.iter().map(|m| m.id.as_str()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("mr-{i}")).collect();
    assert_eq!(first_page, expected.iter().map(|s| s.as_str()).collect::<Vec<_>>());

    view.set_page_size(20, gv.filtered_count);
    let gv = derive(&mrs, &view, schema);
    assert_eq!(gv.total_pages, 1);
    assert_eq!(gv.page_index, 0);
    assert_eq!(gv.page_rows.len(), 12);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_select_all_is_scoped_to_visible_page() {
    let issues = mock_issues(25);
    let schema = &ISSUE_CONFIG.schema;
    let mut view = ViewState::new();
    view.set_page(1, issues.len());

    let page_ids = derive(&issues, &view, schema).page_ids();
    assert_eq!(page_ids.len(), 10);
    view.set_page_selected(page_ids.iter().map(|s| s.as_str()), true);

    // Exactly the page's ids are selected.
    assert_eq!(view.selection.len(), 10);
    for id in &page_ids {
        assert!(view.is_selected(id));
    }
    assert!(!view.is_selected("issue-0"));
    assert!(!view.is_selected("issue-24"));

    // Toggling again deselects exactly those ids.
    view.set_page_selected(page_ids.iter().map(|s| s.as_str()), false);
    assert!(view.selection.is_empty());
}

// ============================================================================
// Reorder
// ============================================================================

#[test]
fn test_array_move_exact_result_and_multiset() {
    let mut issues = mock_issues(8);
    let before: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();

    assert!(move_by_id(&mut issues, "issue-2", "issue-6"));
    let after: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();

    // Exact array-move semantics: elements between shift by one.
    assert_eq!(
        after,
        vec![
            "issue-0", "issue-1", "issue-3", "issue-4", "issue-5", "issue-6", "issue-2",
            "issue-7"
        ]
    );

    // Multiset of ids is preserved.
    let mut sorted_before = before;
    let mut sorted_after = after;
    sorted_before.sort();
    sorted_after.sort();
    assert_eq!(sorted_before, sorted_after);
}

#[test]
fn test_stale_drag_target_is_noop() {
    let mut issues = mock_issues(4);
    let before: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
    assert!(!move_by_id(&mut issues, "issue-1", "deleted-id"));
    let after: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
    assert_eq!(before, after);
}

// ============================================================================
// Enum fallback rendering
// ============================================================================

#[test]
fn test_unknown_enum_values_render_through_default_branch() {
    let issue = Issue {
        kind: RecordKind::Unknown,
        status: IssueStatus::Unknown,
        priority: Priority::Unknown,
        ..IssueBuilder::new("weird").build()
    };

    let schema = &ISSUE_CONFIG.schema;
    for column in ["type", "status", "priority"] {
        let spec = schema.column(column).expect("column exists");
        // Rendering never panics and produces a non-empty cell.
        let cell = (spec.cell)(&issue);
        assert!(!cell.plain().is_empty(), "empty cell for {column}");
    }

    let status_cell = (schema.column("status").unwrap().cell)(&issue);
    match status_cell {
        Cell::Badge { label, .. } => assert_eq!(label, "Unknown"),
        other => panic!("expected badge, got {:?}", other),
    }
}

#[test]
fn test_search_text_covers_identity_fields() {
    let issue = IssueBuilder::new("ISS-9").title("Strange crash").build();
    let text = issue.search_text();
    assert!(text.contains("ISS-9"));
    assert!(text.contains("Strange crash"));
    assert!(text.contains("backend/api"));
}
