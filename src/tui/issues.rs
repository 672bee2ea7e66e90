//! Issues screen: entity configuration and the hosting component.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use iocraft::prelude::*;
use once_cell::sync::Lazy;

use crate::client::{ActionClient, IssueDraft, MockClient};
use crate::grid::schema::{Cell, ColumnSpec, FilterMode, GridRecord, SortKey, TableSchema};
use crate::records::RecordSource;
use crate::store;
use crate::tui::browser::config::{
    DetailContent, EntityConfig, InsightCard, Tab, REPOSITORY_COLUMN, STATUS_COLUMN,
};
use crate::tui::browser::model::{
    self, reduce, BrowserAction, BrowserState, BrowserViewModel, CreateDraft,
};
use crate::tui::browser::{dispatch_action, BrowserView};
use crate::tui::theme::{issue_status_badge, kind_presentation, priority_badge};
use crate::types::{Issue, IssueStatus};

impl GridRecord for Issue {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {} {} {} {}",
            self.id,
            self.title,
            self.repository,
            self.author,
            self.assignee,
            self.labels.join(" "),
            self.status,
            self.kind,
        )
    }
}

fn status_rank(status: IssueStatus) -> u8 {
    match status {
        IssueStatus::Open => 0,
        IssueStatus::InProgress => 1,
        IssueStatus::Closed => 2,
        IssueStatus::Unknown => 3,
    }
}

fn issue_schema() -> TableSchema<Issue> {
    TableSchema::new(vec![
        ColumnSpec {
            id: "title",
            title: "Title",
            width: 40,
            hideable: false,
            sortable: true,
            filter: FilterMode::Substring,
            text: |i| i.title.clone(),
            sort_key: |i| SortKey::text(&i.title),
            cell: |i| Cell::Text(i.title.clone()),
        },
        ColumnSpec {
            id: "type",
            title: "Type",
            width: 15,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |i| i.kind.to_string(),
            sort_key: |i| SortKey::text(&i.kind.to_string()),
            cell: |i| {
                let (icon, color) = kind_presentation(i.kind);
                Cell::IconText {
                    icon,
                    color,
                    label: i.kind.to_string(),
                }
            },
        },
        ColumnSpec {
            id: STATUS_COLUMN,
            title: "Status",
            width: 14,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |i| i.status.to_string(),
            sort_key: |i| SortKey::Rank(status_rank(i.status)),
            cell: |i| Cell::Badge {
                label: i.status.to_string(),
                color: issue_status_badge(i.status),
            },
        },
        ColumnSpec {
            id: REPOSITORY_COLUMN,
            title: "Repository",
            width: 24,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |i| i.repository.clone(),
            sort_key: |i| SortKey::text(&i.repository),
            cell: |i| Cell::Text(i.repository.clone()),
        },
        ColumnSpec {
            id: "author",
            title: "Author",
            width: 19,
            hideable: true,
            sortable: true,
            filter: FilterMode::Substring,
            text: |i| i.author.clone(),
            sort_key: |i| SortKey::text(&i.author),
            cell: |i| Cell::Text(i.author.clone()),
        },
        ColumnSpec {
            id: "assignee",
            title: "Assignee",
            width: 19,
            hideable: true,
            sortable: true,
            filter: FilterMode::Substring,
            text: |i| i.assignee.clone(),
            sort_key: |i| SortKey::text(&i.assignee),
            cell: |i| Cell::Text(i.assignee.clone()),
        },
        ColumnSpec {
            id: "priority",
            title: "Priority",
            width: 11,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |i| i.priority.to_string(),
            sort_key: |i| SortKey::Rank(i.priority.rank()),
            cell: |i| Cell::Badge {
                label: i.priority.to_string(),
                color: priority_badge(i.priority),
            },
        },
        ColumnSpec {
            id: "created",
            title: "Created",
            width: 12,
            hideable: true,
            sortable: true,
            filter: FilterMode::None,
            text: |i| i.created.clone(),
            sort_key: |i| SortKey::date(&i.created),
            cell: |i| Cell::Text(i.created.clone()),
        },
        ColumnSpec {
            id: "ai",
            title: "AI Analysis",
            width: 14,
            hideable: true,
            sortable: true,
            filter: FilterMode::None,
            text: |i| {
                if i.ai_analyzed {
                    "Analyzed".to_string()
                } else {
                    "Analyze".to_string()
                }
            },
            sort_key: |i| SortKey::Flag(i.ai_analyzed),
            cell: |i| Cell::Flag {
                set: i.ai_analyzed,
                set_label: "Analyzed",
                unset_label: "Analyze",
            },
        },
    ])
}

fn issue_detail(issue: &Issue) -> DetailContent {
    DetailContent {
        id: issue.id.clone(),
        title: issue.title.clone(),
        status_label: issue.status.to_string(),
        status_color: issue_status_badge(issue.status),
        repository: issue.repository.clone(),
        fields: vec![
            ("Assignee", issue.assignee.clone()),
            ("Author", issue.author.clone()),
            ("Type", issue.kind.to_string()),
            ("Priority", issue.priority.to_string()),
            ("Created", issue.created.clone()),
            ("Updated", issue.updated.clone()),
        ],
        tags_title: "Labels",
        tags: issue.labels.clone(),
        description: vec![
            format!(
                "This issue is about {}. It was reported by {} on {} and is currently {}.",
                issue.title.to_lowercase(),
                issue.author,
                issue.created,
                issue.status.to_string().to_lowercase(),
            ),
            format!(
                "The issue lives in the {} repository and is assigned to {} with {} priority.",
                issue.repository,
                issue.assignee,
                issue.priority.to_string().to_lowercase(),
            ),
        ],
        activity: vec![
            format!("{} created this issue on {}", issue.author, issue.created),
            format!("System assigned to {} on {}", issue.assignee, issue.updated),
        ],
        flag_set: issue.ai_analyzed,
        insights: vec![
            InsightCard {
                title: "Root Cause Analysis".to_string(),
                body: "The reported behavior points at state being read before it is \
                       initialized; the failure disappears once the first render is delayed."
                    .to_string(),
            },
            InsightCard {
                title: "Similar Issues".to_string(),
                body: "Two previously closed reports in this repository had the same shape \
                       and were fixed by introducing explicit loading states."
                    .to_string(),
            },
            InsightCard {
                title: "Suggested Solution".to_string(),
                body: "Initialize the state with defaults, gate rendering on readiness, and \
                       add a regression test for the uninitialized path."
                    .to_string(),
            },
        ],
    }
}

/// The issues entity configuration: one call site of the generic grid.
pub static ISSUE_CONFIG: Lazy<EntityConfig<Issue>> = Lazy::new(|| EntityConfig {
    title: "Issues",
    singular: "issue",
    create_title: "Create New Issue",
    person_label: "Assignee",
    action_label: "Analyze",
    action_running: "Running AI analysis for",
    action_done: "AI analysis completed",
    analysis_title: "AI Analysis",
    schema: issue_schema(),
    tabs: vec![
        Tab {
            label: "All Issues",
            filter: None,
        },
        Tab {
            label: "Open",
            filter: Some("Open"),
        },
        Tab {
            label: "In Progress",
            filter: Some("In Progress"),
        },
        Tab {
            label: "Closed",
            filter: Some("Closed"),
        },
    ],
    detail: issue_detail,
    flag_set: |i| i.ai_analyzed,
    set_flag: |i| i.ai_analyzed = true,
});

fn issue_draft(draft: &CreateDraft) -> IssueDraft {
    IssueDraft {
        title: draft.title.clone(),
        description: draft.description.clone(),
        repository: draft.repository.clone(),
        priority: draft.priority,
        assignee: draft.person.clone(),
        author: "you".to_string(),
    }
}

fn analyze_issue(
    client: Arc<dyn ActionClient>,
    id: String,
) -> futures::future::BoxFuture<'static, crate::error::Result<()>> {
    Box::pin(async move { client.analyze_issue(&id).await.map(|_| ()) })
}

fn create_issue(
    client: Arc<dyn ActionClient>,
    draft: CreateDraft,
) -> futures::future::BoxFuture<'static, crate::error::Result<Issue>> {
    Box::pin(async move { client.create_issue(issue_draft(&draft)).await })
}

/// Props for the IssuesScreen component
#[derive(Default, Props)]
pub struct IssuesScreenProps {
    /// Pre-applied repository filter (the `--repo` flag).
    pub repo: Option<String>,
    /// Directory override for the record fixtures.
    pub data_dir: Option<PathBuf>,
    /// Backend seam; defaults to the timer-backed mock.
    pub client: Option<Arc<dyn ActionClient>>,
}

/// The issues browser screen.
#[component]
pub fn IssuesScreen(props: &IssuesScreenProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let mut system = hooks.use_context_mut::<SystemContext>();
    let config: &'static EntityConfig<Issue> = &ISSUE_CONFIG;
    let client: Arc<dyn ActionClient> = props
        .client
        .clone()
        .unwrap_or_else(|| Arc::new(MockClient::default()));

    let state: State<BrowserState<Issue>> = hooks.use_state(|| {
        BrowserState::new(store::ai::active_model().to_string(), props.repo.clone())
    });

    // Load records once per mount, with a minimum loading-indicator time to
    // prevent flicker.
    let load_handler: Handler<()> = hooks.use_async_handler({
        let data_dir = props.data_dir.clone();
        move |()| {
            let data_dir = data_dir.clone();
            let mut state = state;
            async move {
                let start = Instant::now();
                let source = RecordSource::for_dir(data_dir.as_deref());
                let loaded = source.load_issues().await;
                let repositories = source
                    .load_repositories()
                    .await
                    .map(|repos| repos.into_iter().map(|r| r.name).collect::<Vec<_>>())
                    .unwrap_or_default();

                let elapsed = start.elapsed();
                if elapsed < Duration::from_millis(100) {
                    tokio::time::sleep(Duration::from_millis(100) - elapsed).await;
                }

                match loaded {
                    Ok(records) => {
                        let current = state.read().clone();
                        state.set(reduce(
                            current,
                            BrowserAction::RecordsLoaded(records, repositories),
                            config,
                        ));
                    }
                    Err(e) => {
                        let current = state.read().clone();
                        let current = reduce(
                            current,
                            BrowserAction::RecordsLoaded(Vec::new(), repositories),
                            config,
                        );
                        state.set(reduce(
                            current,
                            BrowserAction::ShowToast(format!("Could not load issues: {}", e)),
                            config,
                        ));
                    }
                }
            }
        }
    });

    let mut load_started = hooks.use_state(|| false);
    if !load_started.get() {
        load_started.set(true);
        load_handler.clone()(());
    }

    // Central dispatch: pure actions reduce in place, marker actions run
    // the simulated backend call through the shared dispatch loop.
    let dispatch: Handler<BrowserAction<Issue>> = hooks.use_async_handler({
        let client = client.clone();
        move |action: BrowserAction<Issue>| {
            let client = client.clone();
            async move {
                dispatch_action(state, action, config, client, analyze_issue, create_issue).await;
            }
        }
    });

    // Keyboard events
    hooks.use_terminal_events({
        let dispatch = dispatch.clone();
        move |event| {
            if let TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            {
                if kind != KeyEventKind::Release {
                    let action = {
                        let s = state.read();
                        model::key_to_action(&s, config, code, modifiers)
                    };
                    if let Some(action) = action {
                        dispatch.clone()(action);
                    }
                }
            }
        }
    });

    // Text-input change handlers, routed through the same dispatch.
    let on_query_change: Handler<String> = hooks.use_async_handler({
        let dispatch = dispatch.clone();
        move |value: String| {
            let dispatch = dispatch.clone();
            async move {
                dispatch(BrowserAction::SetQuery(value));
            }
        }
    });
    let on_comment_change: Handler<String> = hooks.use_async_handler({
        let dispatch = dispatch.clone();
        move |value: String| {
            let dispatch = dispatch.clone();
            async move {
                dispatch(BrowserAction::SetCommentDraft(value));
            }
        }
    });
    let on_chat_change: Handler<String> = hooks.use_async_handler({
        let dispatch = dispatch.clone();
        move |value: String| {
            let dispatch = dispatch.clone();
            async move {
                dispatch(BrowserAction::SetChatDraft(value));
            }
        }
    });
    let on_create_title_change: Handler<String> = hooks.use_async_handler({
        let dispatch = dispatch.clone();
        move |value: String| {
            let dispatch = dispatch.clone();
            async move {
                dispatch(BrowserAction::SetCreateTitle(value));
            }
        }
    });
    let on_create_description_change: Handler<String> = hooks.use_async_handler({
        let dispatch = dispatch.clone();
        move |value: String| {
            let dispatch = dispatch.clone();
            async move {
                dispatch(BrowserAction::SetCreateDescription(value));
            }
        }
    });
    let on_palette_query_change: Handler<String> = hooks.use_async_handler({
        let dispatch = dispatch.clone();
        move |value: String| {
            let dispatch = dispatch.clone();
            async move {
                dispatch(BrowserAction::SetPaletteQuery(value));
            }
        }
    });

    if state.read().should_exit {
        system.exit();
    }

    let vm: BrowserViewModel = {
        let s = state.read();
        model::compute_view_model(&s, config)
    };

    element! {
        BrowserView(
            vm,
            on_query_change: Some(on_query_change),
            on_comment_change: Some(on_comment_change),
            on_chat_change: Some(on_chat_change),
            on_create_title_change: Some(on_create_title_change),
            on_create_description_change: Some(on_create_description_change),
            on_palette_query_change: Some(on_palette_query_change),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::view_state::{derive, ViewState};

    fn issues() -> Vec<Issue> {
        serde_json::from_str(include_str!("../../data/issues.json")).unwrap()
    }

    #[test]
    fn test_schema_has_expected_columns() {
        let schema = issue_schema();
        for id in [
            "title",
            "type",
            STATUS_COLUMN,
            REPOSITORY_COLUMN,
            "author",
            "assignee",
            "priority",
            "created",
            "ai",
        ] {
            assert!(schema.column(id).is_some(), "missing column {id}");
        }
        assert!(!schema.column("title").unwrap().hideable);
    }

    #[test]
    fn test_repo_filter_on_fixture() {
        let issues = issues();
        let schema = issue_schema();
        let mut view = ViewState::new();
        view.set_filter(REPOSITORY_COLUMN, "backend/api");
        let gv = derive(&issues, &view, &schema);
        assert!(gv.filtered_count > 0);
        assert!(gv.page_rows.iter().all(|i| i.repository == "backend/api"));
    }

    #[test]
    fn test_priority_sort_on_fixture() {
        let issues = issues();
        let schema = issue_schema();
        let mut view = ViewState::new();
        view.cycle_sort("priority");
        let gv = derive(&issues, &view, &schema);
        let ranks: Vec<u8> = gv.page_rows.iter().map(|i| i.priority.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_detail_content_for_fixture_issue() {
        let issues = issues();
        let content = issue_detail(&issues[0]);
        assert_eq!(content.id, issues[0].id);
        assert_eq!(content.tags_title, "Labels");
        assert_eq!(content.insights.len(), 3);
        assert!(!content.description.is_empty());
    }

    #[test]
    fn test_config_tabs_cover_statuses() {
        let labels: Vec<&str> = ISSUE_CONFIG.tabs.iter().map(|t| t.label).collect();
        assert_eq!(
            labels,
            vec!["All Issues", "Open", "In Progress", "Closed"]
        );
    }
}
