//! Generic record browser.
//!
//! `model` holds the testable state machine; `BrowserView` renders a
//! computed `BrowserViewModel`. The issues and merge-requests screens wire
//! the two together with their `EntityConfig`.

pub mod config;
pub mod model;

use std::sync::Arc;

use futures::future::BoxFuture;
use iocraft::prelude::*;

use crate::client::ActionClient;
use crate::grid::GridRecord;
use crate::store;
use crate::tui::components::query_box::QueryBox;
use crate::tui::components::{
    ColumnMenu, CommandPalette, CreateForm, Footer, GridTable, Header, RecordDetail, TabBar,
    ToastNotification,
};
use crate::tui::theme::theme;

use config::EntityConfig;
use model::{reduce, BrowserAction, BrowserState, BrowserViewModel, CreateDraft, OverlayVm};

/// Entity-specific analyze call, fn-pointer so it can live in screen code
/// without captures.
pub type AnalyzeFn = fn(Arc<dyn ActionClient>, String) -> BoxFuture<'static, crate::error::Result<()>>;

/// Entity-specific create call returning the new record.
pub type CreateFn<R> = fn(Arc<dyn ActionClient>, CreateDraft) -> BoxFuture<'static, crate::error::Result<R>>;

/// Shared dispatch loop body: pure actions go through the reducer, the
/// marker actions run their simulated backend call and feed the async
/// lifecycle actions back in. Both screens call this from their
/// `use_async_handler`.
pub async fn dispatch_action<R: GridRecord>(
    mut state: iocraft::prelude::State<BrowserState<R>>,
    action: BrowserAction<R>,
    config: &'static EntityConfig<R>,
    client: Arc<dyn ActionClient>,
    analyze: AnalyzeFn,
    create: CreateFn<R>,
) {
    match action {
        BrowserAction::AnalyzeRequested => {
            let target = {
                let s = state.read();
                model::analyze_target(&s, config)
            };
            let Some(id) = target else {
                return;
            };
            let current = state.read().clone();
            state.set(reduce(current, BrowserAction::MarkPending(id.clone()), config));

            let follow = match analyze(client, id.clone()).await {
                Ok(()) => BrowserAction::ApplyFlag(id),
                Err(e) => BrowserAction::ActionFailed(
                    id,
                    format!("Error running {}: {}", config.analysis_title.to_lowercase(), e),
                ),
            };
            let current = state.read().clone();
            state.set(reduce(current, follow, config));
        }
        BrowserAction::SubmitCreate => {
            let validation = {
                let s = state.read();
                model::validate_create(&s)
            };
            if let Err(message) = validation {
                let current = state.read().clone();
                state.set(reduce(current, BrowserAction::ShowToast(message), config));
                return;
            }
            let draft = {
                let s = state.read();
                model::create_draft(&s)
            };
            let Some(draft) = draft else {
                return;
            };
            let current = state.read().clone();
            state.set(reduce(current, BrowserAction::MarkSubmitting, config));

            let follow = match create(client, draft).await {
                Ok(record) => BrowserAction::ApplyCreated(record),
                Err(e) => BrowserAction::CreateFailed(format!(
                    "Could not create {}: {}",
                    config.singular, e
                )),
            };
            let current = state.read().clone();
            state.set(reduce(current, follow, config));
        }
        BrowserAction::CycleModelRequested => {
            let follow = match store::ai::cycle_active_model() {
                Ok(model) => BrowserAction::SetActiveModel(model.to_string()),
                Err(e) => BrowserAction::ShowToast(format!("Could not save model: {}", e)),
            };
            let current = state.read().clone();
            state.set(reduce(current, follow, config));
        }
        other => {
            let current = state.read().clone();
            state.set(reduce(current, other, config));
        }
    }
}

/// Props for the BrowserView component.
///
/// The change handlers carry text-input edits back into the hosting
/// screen's dispatch loop; everything else is read from the view model.
#[derive(Default, Props)]
pub struct BrowserViewProps {
    pub vm: BrowserViewModel,
    pub on_query_change: Option<Handler<String>>,
    pub on_comment_change: Option<Handler<String>>,
    pub on_chat_change: Option<Handler<String>>,
    pub on_create_title_change: Option<Handler<String>>,
    pub on_create_description_change: Option<Handler<String>>,
    pub on_palette_query_change: Option<Handler<String>>,
}

/// Full browser screen layout:
///
/// ```text
/// +------------------------------------------+
/// | Header                                    |
/// | TabBar                                    |
/// | QueryBox                                  |
/// | GridTable (header / rows / pagination)    |
/// | Toast                                     |
/// | Footer                                    |
/// +------------------------------------------+
/// ```
///
/// Overlays (columns menu, detail, create form, palette) render above.
#[component]
pub fn BrowserView(props: &mut BrowserViewProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let (width, height) = hooks.use_terminal_size();
    let theme = theme();
    let vm = props.vm.clone();

    let on_query_change = props.on_query_change.clone();
    let on_comment_change = props.on_comment_change.clone();
    let on_chat_change = props.on_chat_change.clone();
    let on_create_title_change = props.on_create_title_change.clone();
    let on_create_description_change = props.on_create_description_change.clone();
    let on_palette_query_change = props.on_palette_query_change.clone();

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(
                title: vm.title.clone(),
                repo_filter: vm.repo_filter.clone(),
                active_model: Some(vm.active_model.clone()),
                record_count: Some(vm.total_records),
            )

            TabBar(tabs: vm.tabs.clone())

            View(width: 100pct, padding_left: 1, padding_right: 1) {
                QueryBox(
                    value: vm.query.clone(),
                    has_focus: vm.query_focused,
                    result_count: vm.pagination.filtered,
                    on_change: on_query_change,
                )
            }

            View(
                width: 100pct,
                flex_grow: 1.0,
                padding_left: 1,
                padding_right: 1,
            ) {
                GridTable(
                    headers: vm.headers.clone(),
                    rows: vm.rows.clone(),
                    pagination: vm.pagination.clone(),
                    empty: vm.empty,
                    all_page_selected: vm.all_page_selected,
                    reordering: vm.reordering,
                    has_focus: !vm.query_focused && vm.overlay.is_none() && vm.palette.is_none(),
                )
            }

            ToastNotification(toast: vm.toast.clone())

            Footer(shortcuts: vm.shortcuts.clone())

            // Overlays
            #(vm.overlay.as_ref().map(|overlay| match overlay {
                OverlayVm::Columns(columns) => element! {
                    ColumnMenu(vm: columns.clone())
                }
                .into_any(),
                OverlayVm::Detail(detail) => element! {
                    RecordDetail(
                        vm: detail.clone(),
                        on_comment_change: on_comment_change.clone(),
                        on_chat_change: on_chat_change.clone(),
                        inputs_active: Some(vm.palette.is_none()),
                    )
                }
                .into_any(),
                OverlayVm::Create(create) => element! {
                    CreateForm(
                        vm: create.clone(),
                        on_title_change: on_create_title_change.clone(),
                        on_description_change: on_create_description_change.clone(),
                        inputs_active: Some(vm.palette.is_none()),
                    )
                }
                .into_any(),
            }))

            #(vm.palette.as_ref().map(|palette| {
                element! {
                    CommandPalette(
                        vm: palette.clone(),
                        on_query_change: on_palette_query_change.clone(),
                    )
                }
            }))
        }
    }
}
