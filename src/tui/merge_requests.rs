//! Merge requests screen: entity configuration and the hosting component.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use iocraft::prelude::*;
use once_cell::sync::Lazy;

use crate::client::{ActionClient, MergeRequestDraft, MockClient};
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
use crate::tui::theme::{kind_presentation, merge_status_badge, priority_badge};
use crate::types::{MergeRequest, MergeStatus};

impl GridRecord for MergeRequest {
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
            self.reviewers.join(" "),
            self.branch,
            self.status,
            self.kind,
        )
    }
}

fn status_rank(status: MergeStatus) -> u8 {
    match status {
        MergeStatus::Open => 0,
        MergeStatus::InReview => 1,
        MergeStatus::Merged => 2,
        MergeStatus::Unknown => 3,
    }
}

fn merge_request_schema() -> TableSchema<MergeRequest> {
    TableSchema::new(vec![
        ColumnSpec {
            id: "title",
            title: "Title",
            width: 40,
            hideable: false,
            sortable: true,
            filter: FilterMode::Substring,
            text: |m| m.title.clone(),
            sort_key: |m| SortKey::text(&m.title),
            cell: |m| Cell::Text(m.title.clone()),
        },
        ColumnSpec {
            id: "type",
            title: "Type",
            width: 15,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |m| m.kind.to_string(),
            sort_key: |m| SortKey::text(&m.kind.to_string()),
            cell: |m| {
                let (icon, color) = kind_presentation(m.kind);
                Cell::IconText {
                    icon,
                    color,
                    label: m.kind.to_string(),
                }
            },
        },
        ColumnSpec {
            id: STATUS_COLUMN,
            title: "Status",
            width: 13,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |m| m.status.to_string(),
            sort_key: |m| SortKey::Rank(status_rank(m.status)),
            cell: |m| Cell::Badge {
                label: m.status.to_string(),
                color: merge_status_badge(m.status),
            },
        },
        ColumnSpec {
            id: REPOSITORY_COLUMN,
            title: "Repository",
            width: 24,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |m| m.repository.clone(),
            sort_key: |m| SortKey::text(&m.repository),
            cell: |m| Cell::Text(m.repository.clone()),
        },
        ColumnSpec {
            id: "branch",
            title: "Branch",
            width: 24,
            hideable: true,
            sortable: true,
            filter: FilterMode::Substring,
            text: |m| m.branch.clone(),
            sort_key: |m| SortKey::text(&m.branch),
            cell: |m| Cell::Text(m.branch.clone()),
        },
        ColumnSpec {
            id: "author",
            title: "Author",
            width: 19,
            hideable: true,
            sortable: true,
            filter: FilterMode::Substring,
            text: |m| m.author.clone(),
            sort_key: |m| SortKey::text(&m.author),
            cell: |m| Cell::Text(m.author.clone()),
        },
        ColumnSpec {
            id: "reviewers",
            title: "Reviewers",
            width: 26,
            hideable: true,
            sortable: false,
            filter: FilterMode::Substring,
            text: |m| m.reviewers.join(", "),
            sort_key: |m| SortKey::text(&m.reviewers.join(", ")),
            cell: |m| Cell::People(m.reviewers.clone()),
        },
        ColumnSpec {
            id: "priority",
            title: "Priority",
            width: 11,
            hideable: true,
            sortable: true,
            filter: FilterMode::Exact,
            text: |m| m.priority.to_string(),
            sort_key: |m| SortKey::Rank(m.priority.rank()),
            cell: |m| Cell::Badge {
                label: m.priority.to_string(),
                color: priority_badge(m.priority),
            },
        },
        ColumnSpec {
            id: "updated",
            title: "Updated",
            width: 12,
            hideable: true,
            sortable: true,
            filter: FilterMode::None,
            text: |m| m.updated.clone(),
            sort_key: |m| SortKey::date(&m.updated),
            cell: |m| Cell::Text(m.updated.clone()),
        },
        ColumnSpec {
            id: "ai",
            title: "AI Review",
            width: 13,
            hideable: true,
            sortable: true,
            filter: FilterMode::None,
            text: |m| {
                if m.ai_reviewed {
                    "Reviewed".to_string()
                } else {
                    "Review".to_string()
                }
            },
            sort_key: |m| SortKey::Flag(m.ai_reviewed),
            cell: |m| Cell::Flag {
                set: m.ai_reviewed,
                set_label: "Reviewed",
                unset_label: "Review",
            },
        },
    ])
}

fn merge_request_detail(mr: &MergeRequest) -> DetailContent {
    DetailContent {
        id: mr.id.clone(),
        title: mr.title.clone(),
        status_label: mr.status.to_string(),
        status_color: merge_status_badge(mr.status),
        repository: mr.repository.clone(),
        fields: vec![
            ("Author", mr.author.clone()),
            ("Branch", mr.branch.clone()),
            ("Source", mr.source.clone()),
            ("Type", mr.kind.to_string()),
            ("Priority", mr.priority.to_string()),
            ("Created", mr.created.clone()),
            ("Updated", mr.updated.clone()),
        ],
        tags_title: "Reviewers",
        tags: mr.reviewers.clone(),
        description: vec![
            format!(
                "This merge request proposes {}. It was opened by {} on {} from the {} branch.",
                mr.title.to_lowercase(),
                mr.author,
                mr.created,
                mr.branch,
            ),
            format!(
                "It targets the {} repository and is currently {}.",
                mr.repository,
                mr.status.to_string().to_lowercase(),
            ),
        ],
        activity: vec![
            format!("{} opened this merge request on {}", mr.author, mr.created),
            format!("Last updated on {}", mr.updated),
        ],
        flag_set: mr.ai_reviewed,
        insights: vec![
            InsightCard {
                title: "Change Summary".to_string(),
                body: "The diff is focused and keeps the public surface stable; no breaking \
                       changes detected."
                    .to_string(),
            },
            InsightCard {
                title: "Risk Assessment".to_string(),
                body: "Existing tests cover the new error paths; the retry loop would \
                       benefit from an upper bound."
                    .to_string(),
            },
            InsightCard {
                title: "Suggested Follow-up".to_string(),
                body: "Extract the duplicated validation into a shared helper before more \
                       code builds on it."
                    .to_string(),
            },
        ],
    }
}

/// The merge requests entity configuration: the second call site of the
/// generic grid.
pub static MERGE_REQUEST_CONFIG: Lazy<EntityConfig<MergeRequest>> = Lazy::new(|| EntityConfig {
    title: "Merge Requests",
    singular: "merge request",
    create_title: "Create New Merge Request",
    person_label: "Reviewer",
    action_label: "Review",
    action_running: "Running AI review for",
    action_done: "AI review completed",
    analysis_title: "AI Review",
    schema: merge_request_schema(),
    tabs: vec![
        Tab {
            label: "All",
            filter: None,
        },
        Tab {
            label: "Open",
            filter: Some("Open"),
        },
        Tab {
            label: "In Review",
            filter: Some("In Review"),
        },
        Tab {
            label: "Merged",
            filter: Some("Merged"),
        },
    ],
    detail: merge_request_detail,
    flag_set: |m| m.ai_reviewed,
    set_flag: |m| m.ai_reviewed = true,
});

/// Branch name derived from the draft title, e.g. "change/fix-login".
fn branch_slug(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "change/untitled".to_string()
    } else {
        format!("change/{}", slug)
    }
}

fn merge_request_draft(draft: &CreateDraft) -> MergeRequestDraft {
    MergeRequestDraft {
        title: draft.title.clone(),
        description: draft.description.clone(),
        repository: draft.repository.clone(),
        priority: draft.priority,
        branch: branch_slug(&draft.title),
        reviewer: draft.person.clone(),
        author: "you".to_string(),
    }
}

fn review_merge_request(
    client: Arc<dyn ActionClient>,
    id: String,
) -> futures::future::BoxFuture<'static, crate::error::Result<()>> {
    Box::pin(async move { client.review_merge_request(&id).await.map(|_| ()) })
}

fn create_merge_request(
    client: Arc<dyn ActionClient>,
    draft: CreateDraft,
) -> futures::future::BoxFuture<'static, crate::error::Result<MergeRequest>> {
    Box::pin(async move { client.create_merge_request(merge_request_draft(&draft)).await })
}

/// Props for the MergeRequestsScreen component
#[derive(Default, Props)]
pub struct MergeRequestsScreenProps {
    /// Pre-applied repository filter (the `--repo` flag).
    pub repo: Option<String>,
    /// Directory override for the record fixtures.
    pub data_dir: Option<PathBuf>,
    /// Backend seam; defaults to the timer-backed mock.
    pub client: Option<Arc<dyn ActionClient>>,
}

/// The merge requests browser screen.
#[component]
pub fn MergeRequestsScreen(
    props: &MergeRequestsScreenProps,
    mut hooks: Hooks,
) -> impl Into<AnyElement<'static>> {
    let mut system = hooks.use_context_mut::<SystemContext>();
    let config: &'static EntityConfig<MergeRequest> = &MERGE_REQUEST_CONFIG;
    let client: Arc<dyn ActionClient> = props
        .client
        .clone()
        .unwrap_or_else(|| Arc::new(MockClient::default()));

    let state: State<BrowserState<MergeRequest>> = hooks.use_state(|| {
        BrowserState::new(store::ai::active_model().to_string(), props.repo.clone())
    });

    let load_handler: Handler<()> = hooks.use_async_handler({
        let data_dir = props.data_dir.clone();
        move |()| {
            let data_dir = data_dir.clone();
            let mut state = state;
            async move {
                let start = Instant::now();
                let source = RecordSource::for_dir(data_dir.as_deref());
                let loaded = source.load_merge_requests().await;
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
                            BrowserAction::ShowToast(format!(
                                "Could not load merge requests: {}",
                                e
                            )),
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

    let dispatch: Handler<BrowserAction<MergeRequest>> = hooks.use_async_handler({
        let client = client.clone();
        move |action: BrowserAction<MergeRequest>| {
            let client = client.clone();
            async move {
                dispatch_action(
                    state,
                    action,
                    config,
                    client,
                    review_merge_request,
                    create_merge_request,
                )
                .await;
            }
        }
    });

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
    use crate::types::Priority;

    fn merge_requests() -> Vec<MergeRequest> {
        serde_json::from_str(include_str!("../../data/merge_requests.json")).unwrap()
    }

    #[test]
    fn test_fixture_pagination_two_pages() {
        let mrs = merge_requests();
        assert_eq!(mrs.len(), 12);
        let schema = merge_request_schema();
        let mut view = ViewState::new();

        let gv = derive(&mrs, &view, &schema);
        assert_eq!(gv.total_pages, 2);
        assert_eq!(gv.page_rows.len(), 10);
        assert_eq!(gv.page_rows[0].id, mrs[0].id);
        assert_eq!(gv.page_rows[9].id, mrs[9].id);

        view.set_page_size(20, gv.filtered_count);
        let gv = derive(&mrs, &view, &schema);
        assert_eq!(gv.total_pages, 1);
        assert_eq!(gv.page_index, 0);
        assert_eq!(gv.page_rows.len(), 12);
    }

    #[test]
    fn test_status_tab_values_match_wire_format() {
        for tab in &MERGE_REQUEST_CONFIG.tabs {
            if let Some(value) = tab.filter {
                let status: MergeStatus = value.parse().unwrap();
                assert_eq!(status.to_string(), value);
            }
        }
    }

    #[test]
    fn test_branch_slug() {
        assert_eq!(branch_slug("Fix login state"), "change/fix-login-state");
        assert_eq!(branch_slug("  !! "), "change/untitled");
        assert_eq!(branch_slug("A--B"), "change/a-b");
    }

    #[test]
    fn test_merge_request_draft_mapping() {
        let draft = CreateDraft {
            title: "Fix the thing".to_string(),
            description: "details".to_string(),
            repository: "backend/api".to_string(),
            priority: Priority::High,
            person: Some("Sarah Chen".to_string()),
        };
        let mr_draft = merge_request_draft(&draft);
        assert_eq!(mr_draft.branch, "change/fix-the-thing");
        assert_eq!(mr_draft.reviewer.as_deref(), Some("Sarah Chen"));
    }

    #[test]
    fn test_detail_content_reviewers() {
        let mrs = merge_requests();
        let content = merge_request_detail(&mrs[0]);
        assert_eq!(content.tags_title, "Reviewers");
        assert_eq!(content.tags, mrs[0].reviewers);
    }
}
