//! Browser reducer and async-lifecycle tests against the real issue
//! configuration, including the simulated-action contract.

mod common;

use std::time::Duration;

use common::mock_data::{mock_issues, IssueBuilder};
use opsdeck::client::{ActionClient, MockClient};
use opsdeck::tui::browser::model::{
    compute_view_model, reduce, BrowserAction, BrowserState, Mode, OverlayVm,
};
use opsdeck::tui::issues::ISSUE_CONFIG;
use opsdeck::types::Issue;

fn loaded_state(count: usize) -> BrowserState<Issue> {
    let state = BrowserState::new("OpenAI GPT-4o".to_string(), None);
    reduce(
        state,
        BrowserAction::RecordsLoaded(
            mock_issues(count),
            vec!["backend/api".to_string(), "frontend/user-portal".to_string()],
        ),
        &ISSUE_CONFIG,
    )
}

fn apply(
    state: BrowserState<Issue>,
    actions: impl IntoIterator<Item = BrowserAction<Issue>>,
) -> BrowserState<Issue> {
    actions
        .into_iter()
        .fold(state, |s, a| reduce(s, a, &ISSUE_CONFIG))
}

#[test]
fn test_records_loaded_clears_loading() {
    let state = loaded_state(5);
    assert!(!state.loading);
    assert_eq!(state.records.len(), 5);
    assert_eq!(state.repositories.len(), 2);

    let vm = compute_view_model(&state, &ISSUE_CONFIG);
    assert!(vm.empty.is_none());
    assert_eq!(vm.rows.len(), 5);
}

#[test]
fn test_repo_flag_preapplies_filter_with_clear_affordance() {
    let state = BrowserState::<Issue>::new(
        "OpenAI GPT-4o".to_string(),
        Some("frontend/user-portal".to_string()),
    );
    let state = reduce(
        state,
        BrowserAction::RecordsLoaded(
            vec![
                IssueBuilder::new("a").repository("frontend/user-portal").build(),
                IssueBuilder::new("b").repository("backend/api").build(),
            ],
            Vec::new(),
        ),
        &ISSUE_CONFIG,
    );

    let vm = compute_view_model(&state, &ISSUE_CONFIG);
    assert_eq!(vm.repo_filter.as_deref(), Some("frontend/user-portal"));
    assert_eq!(vm.rows.len(), 1);
    assert_eq!(vm.rows[0].id, "a");

    let state = apply(state, [BrowserAction::ClearRepoFilter]);
    let vm = compute_view_model(&state, &ISSUE_CONFIG);
    assert!(vm.repo_filter.is_none());
    assert_eq!(vm.rows.len(), 2);
}

// ============================================================================
// Simulated async action contract
// ============================================================================

#[tokio::test]
async fn test_analyze_contract_pending_then_single_flip() {
    let client = MockClient::with_delay(Duration::from_millis(20));
    let state = loaded_state(3);

    // Start: pending indicator shows, flag unchanged.
    let state = apply(state, [BrowserAction::MarkPending("issue-1".to_string())]);
    assert!(state.pending.contains("issue-1"));
    assert!(!state.records[1].ai_analyzed);
    let vm = compute_view_model(&state, &ISSUE_CONFIG);
    let row = vm.rows.iter().find(|r| r.id == "issue-1").unwrap();
    assert!(row.pending);

    // Resolve after the configured delay.
    let analysis = client.analyze_issue("issue-1").await.unwrap();
    assert_eq!(analysis.record_id, "issue-1");

    // Completion: flag flips exactly once and pending clears.
    let state = apply(state, [BrowserAction::ApplyFlag("issue-1".to_string())]);
    assert!(state.pending.is_empty());
    assert!(state.records[1].ai_analyzed);

    // The flag survives closing and reopening the detail overlay.
    let mut state = state;
    state.cursor = 1;
    let state = apply(
        state,
        [BrowserAction::OpenDetail, BrowserAction::CloseDetail, BrowserAction::OpenDetail],
    );
    let vm = compute_view_model(&state, &ISSUE_CONFIG);
    match vm.overlay {
        Some(OverlayVm::Detail(detail)) => {
            assert!(detail.content.flag_set);
            assert!(!detail.content.insights.is_empty());
        }
        other => panic!("expected detail overlay, got {:?}", other),
    }
}

#[tokio::test]
async fn test_completion_after_overlay_close_still_applies() {
    let client = MockClient::with_delay(Duration::from_millis(5));
    let state = loaded_state(2);

    // Start from the overlay, close it while "in flight", then complete.
    let state = apply(
        state,
        [
            BrowserAction::OpenDetail,
            BrowserAction::MarkPending("issue-0".to_string()),
            BrowserAction::CloseDetail,
        ],
    );
    client.analyze_issue("issue-0").await.unwrap();
    let state = apply(state, [BrowserAction::ApplyFlag("issue-0".to_string())]);
    assert!(state.records[0].ai_analyzed);
}

// ============================================================================
// Create flow
// ============================================================================

#[test]
fn test_create_flow_prepends_returned_record() {
    let state = loaded_state(3);
    let state = apply(
        state,
        [
            BrowserAction::OpenCreate,
            BrowserAction::SetCreateTitle("Brand new".to_string()),
            // Select the first repository.
            BrowserAction::CreateCycleOption,
            BrowserAction::MarkSubmitting,
        ],
    );
    assert!(matches!(state.mode, Mode::Create(_)));

    let created = IssueBuilder::new("issue-new").title("Brand new").build();
    let state = apply(state, [BrowserAction::ApplyCreated(created)]);

    assert_eq!(state.mode, Mode::Browse);
    assert_eq!(state.records.len(), 4);
    assert_eq!(state.records[0].id, "issue-new");
    assert_eq!(state.cursor, 0);
    assert_eq!(state.view.pagination.page_index, 0);

    let vm = compute_view_model(&state, &ISSUE_CONFIG);
    assert_eq!(vm.rows[0].id, "issue-new");
    assert!(vm.toast.is_some());
}

#[tokio::test]
async fn test_create_issue_via_mock_client() {
    let client = MockClient::with_delay(Duration::from_millis(5));
    let issue = client
        .create_issue(opsdeck::client::IssueDraft {
            title: "From dialog".to_string(),
            repository: "backend/api".to_string(),
            author: "you".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    // The returned record is ready to prepend into the grid.
    let state = loaded_state(1);
    let state = apply(state, [BrowserAction::ApplyCreated(issue)]);
    assert_eq!(state.records.len(), 2);
    assert_eq!(state.records[0].title, "From dialog");
}

// ============================================================================
// Tabs on the real config
// ============================================================================

#[test]
fn test_issue_tabs_filter_statuses() {
    // 9 issues: statuses cycle Open / InProgress / Closed.
    let state = loaded_state(9);

    let all = compute_view_model(&state, &ISSUE_CONFIG);
    assert_eq!(all.tabs.len(), 4);
    assert_eq!(all.tabs[0].count, 9);
    assert_eq!(all.tabs[1].count, 3);

    let state = apply(state, [BrowserAction::SetTab(2)]);
    let vm = compute_view_model(&state, &ISSUE_CONFIG);
    assert_eq!(vm.pagination.filtered, 3);
    assert!(vm.tabs[2].active);
}
