//! Browser model: testable state management for the record grid screens.
//!
//! This module separates state (`BrowserState`) from view
//! (`BrowserViewModel`), enabling unit testing without the iocraft
//! framework. `reduce` contains only pure state transitions; async effects
//! (simulated backend calls) are requested through marker actions the
//! hosting component intercepts.

use std::collections::BTreeSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use iocraft::prelude::{KeyCode, KeyModifiers};
use unicase::UniCase;

use crate::grid::schema::Cell;
use crate::grid::view_state::visible_columns;
use crate::grid::{self, GridRecord, SortDirection, ViewState, PAGE_SIZES};
use crate::tui::components::footer::Shortcut;
use crate::tui::components::toast::Toast;
use crate::types::Priority;

use super::config::{DetailContent, EntityConfig, PEOPLE, REPOSITORY_COLUMN, STATUS_COLUMN};

/// Priorities offered by the create form, most urgent first.
pub const PRIORITY_CHOICES: &[Priority] = &[
    Priority::Critical,
    Priority::High,
    Priority::Medium,
    Priority::Low,
];

// ============================================================================
// State Types
// ============================================================================

/// Tab of the record detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Details,
    Comments,
    Analysis,
    AskAi,
}

impl DetailTab {
    pub fn next(self) -> Self {
        match self {
            DetailTab::Details => DetailTab::Comments,
            DetailTab::Comments => DetailTab::Analysis,
            DetailTab::Analysis => DetailTab::AskAi,
            DetailTab::AskAi => DetailTab::Details,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DetailTab::Details => DetailTab::AskAi,
            DetailTab::Comments => DetailTab::Details,
            DetailTab::Analysis => DetailTab::Comments,
            DetailTab::AskAi => DetailTab::Analysis,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::Details => "Details",
            DetailTab::Comments => "Comments",
            DetailTab::Analysis => "AI",
            DetailTab::AskAi => "Ask AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub age: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from_user: bool,
    pub body: String,
}

/// Overlay-scoped state for one open record detail. Comments and chat
/// messages posted here are discarded when the overlay closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    pub id: String,
    pub tab: DetailTab,
    pub comments: Vec<Comment>,
    pub comment_draft: String,
    pub chat: Vec<ChatMessage>,
    pub chat_draft: String,
}

impl DetailState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tab: DetailTab::Details,
            comments: canned_comments(),
            comment_draft: String::new(),
            chat: canned_chat(),
            chat_draft: String::new(),
        }
    }
}

fn canned_comments() -> Vec<Comment> {
    vec![
        Comment {
            author: "jamiktashpulatov".to_string(),
            age: "2 days ago".to_string(),
            body: "I've been looking into this and it seems related to how we handle state."
                .to_string(),
        },
        Comment {
            author: "eddielake".to_string(),
            age: "1 day ago".to_string(),
            body: "Agreed. I'll dig into the state handling and see if I can find a fix."
                .to_string(),
        },
    ]
}

fn canned_chat() -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            from_user: true,
            body: "What's the best way to fix this?".to_string(),
        },
        ChatMessage {
            from_user: false,
            body: "Start with explicit state initialization, add a loading state for async \
                   paths, and cover the failure case with a regression test."
                .to_string(),
        },
    ]
}

const CANNED_CHAT_REPLY: &str =
    "Based on what I can see here, I'd start with the state initialization path and \
     add a focused regression test before touching anything else.";

/// Field focus within the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateField {
    #[default]
    Repository,
    Title,
    Description,
    Priority,
    Person,
}

impl CreateField {
    pub fn next(self) -> Self {
        match self {
            CreateField::Repository => CreateField::Title,
            CreateField::Title => CreateField::Description,
            CreateField::Description => CreateField::Priority,
            CreateField::Priority => CreateField::Person,
            CreateField::Person => CreateField::Repository,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            CreateField::Repository => CreateField::Person,
            CreateField::Title => CreateField::Repository,
            CreateField::Description => CreateField::Title,
            CreateField::Priority => CreateField::Description,
            CreateField::Person => CreateField::Priority,
        }
    }
}

/// State of the entity create form. `repo_index` 0 means "not selected";
/// `person_index` 0 means unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateState {
    pub focus: CreateField,
    pub title: String,
    pub description: String,
    pub repo_index: usize,
    pub priority_index: usize,
    pub person_index: usize,
    pub submitting: bool,
}

impl Default for CreateState {
    fn default() -> Self {
        Self {
            focus: CreateField::Repository,
            title: String::new(),
            description: String::new(),
            repo_index: 0,
            // Default priority: Medium.
            priority_index: 2,
            person_index: 0,
            submitting: false,
        }
    }
}

/// Entity-agnostic payload produced by a valid create form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateDraft {
    pub title: String,
    pub description: String,
    pub repository: String,
    pub priority: Priority,
    pub person: Option<String>,
}

/// Command palette state: an explicit open/close/toggle surface owned by
/// the screen root instead of hidden module-level globals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaletteState {
    pub is_open: bool,
    pub query: String,
    pub cursor: usize,
}

impl PaletteState {
    pub fn open(&mut self) {
        self.is_open = true;
        self.query.clear();
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }
}

/// Commands offered by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteEntry {
    NewRecord,
    ClearRepoFilter,
    ClearQuery,
    ShowTab(usize),
    CycleModel,
    Quit,
}

/// Interaction mode of the browser screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,
    Query,
    Columns {
        cursor: usize,
    },
    /// Keyboard drag: a row is grabbed and moved over its neighbors.
    /// `original` remembers the pre-grab id order so Esc can restore it.
    Reorder {
        grabbed: String,
        original: Vec<String>,
    },
    Detail(DetailState),
    Create(CreateState),
}

/// Raw state that changes during user interaction.
#[derive(Debug, Clone)]
pub struct BrowserState<R> {
    /// The base collection, in display order. Reordering mutates this
    /// directly; nothing else does.
    pub records: Vec<R>,
    pub view: ViewState,
    /// Row cursor within the current page.
    pub cursor: usize,
    /// Column cursor within the visible columns (sorting target).
    pub header_cursor: usize,
    /// Active status tab index.
    pub tab: usize,
    pub mode: Mode,
    pub palette: PaletteState,
    /// Record ids with an AI action in flight.
    pub pending: BTreeSet<String>,
    /// Repository names offered by the create form.
    pub repositories: Vec<String>,
    pub active_model: String,
    pub toast: Option<Toast>,
    pub loading: bool,
    pub should_exit: bool,
}

impl<R> Default for BrowserState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            view: ViewState::new(),
            cursor: 0,
            header_cursor: 0,
            tab: 0,
            mode: Mode::Browse,
            palette: PaletteState::default(),
            pending: BTreeSet::new(),
            repositories: Vec::new(),
            active_model: String::new(),
            toast: None,
            loading: true,
            should_exit: false,
        }
    }
}

impl<R: GridRecord> BrowserState<R> {
    pub fn new(active_model: String, repo_filter: Option<String>) -> Self {
        let mut state = Self {
            active_model,
            ..Self::default()
        };
        if let Some(repo) = repo_filter {
            state.view.set_filter(REPOSITORY_COLUMN, &repo);
        }
        state
    }
}

// ============================================================================
// Actions
// ============================================================================

/// All possible actions on the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction<R> {
    // Row navigation
    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,

    // Pagination
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    CyclePageSize,

    // Selection
    ToggleSelect,
    ToggleSelectPage,

    // Sorting / columns
    HeaderLeft,
    HeaderRight,
    CycleSortAtCursor,
    OpenColumns,
    ColumnsUp,
    ColumnsDown,
    ToggleColumnAtCursor,
    CloseColumns,

    // Tabs and filters
    SetTab(usize),
    NextTab,
    PrevTab,
    ClearRepoFilter,

    // Free-text query
    FocusQuery,
    SetQuery(String),
    AcceptQuery,
    ClearQuery,

    // Reorder (keyboard drag)
    GrabRow,
    MoveGrabbedUp,
    MoveGrabbedDown,
    DropGrabbed,
    CancelGrab,

    // Detail overlay
    OpenDetail,
    CloseDetail,
    DetailNextTab,
    DetailPrevTab,
    SetCommentDraft(String),
    PostComment,
    SetChatDraft(String),
    SendChat,

    // Create form
    OpenCreate,
    CancelCreate,
    CreateNextField,
    CreatePrevField,
    SetCreateTitle(String),
    SetCreateDescription(String),
    CreateCycleOption,
    CreateCycleOptionBack,

    // Palette
    TogglePalette,
    ClosePalette,
    SetPaletteQuery(String),
    PaletteUp,
    PaletteDown,

    // Async lifecycle (applied by the component's effect handlers)
    MarkPending(String),
    ApplyFlag(String),
    ActionFailed(String, String),
    MarkSubmitting,
    ApplyCreated(R),
    CreateFailed(String),
    RecordsLoaded(Vec<R>, Vec<String>),
    SetActiveModel(String),
    ShowToast(String),

    // Markers intercepted by the component before reduction
    AnalyzeRequested,
    SubmitCreate,
    CycleModelRequested,

    // App
    DismissToast,
    Quit,
}

// ============================================================================
// Reducer
// ============================================================================

/// Pure function: apply an action to the state (reducer pattern).
///
/// Marker actions requiring I/O are no-ops here; the hosting component
/// intercepts them and dispatches the async-lifecycle actions instead.
pub fn reduce<R: GridRecord>(
    mut state: BrowserState<R>,
    action: BrowserAction<R>,
    config: &EntityConfig<R>,
) -> BrowserState<R> {
    let page_len = {
        let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
        gv.page_rows.len()
    };

    match action {
        // Row navigation --------------------------------------------------
        BrowserAction::CursorUp => {
            if state.cursor > 0 {
                state.cursor -= 1;
            } else if state.view.pagination.page_index > 0 {
                let filtered = filtered_count(&state, config);
                let page = state.view.pagination.page_index - 1;
                state.view.set_page(page, filtered);
                let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
                state.cursor = gv.page_rows.len().saturating_sub(1);
            }
        }
        BrowserAction::CursorDown => {
            if state.cursor + 1 < page_len {
                state.cursor += 1;
            } else {
                let filtered = filtered_count(&state, config);
                let (can_next, page_index) = {
                    let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
                    (gv.can_next(), gv.page_index)
                };
                if can_next {
                    state.view.set_page(page_index + 1, filtered);
                    state.cursor = 0;
                }
            }
        }
        BrowserAction::CursorTop => state.cursor = 0,
        BrowserAction::CursorBottom => state.cursor = page_len.saturating_sub(1),

        // Pagination ------------------------------------------------------
        BrowserAction::NextPage => {
            let filtered = filtered_count(&state, config);
            let (can_next, page_index) = {
                let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
                (gv.can_next(), gv.page_index)
            };
            if can_next {
                state.view.set_page(page_index + 1, filtered);
                state.cursor = 0;
            }
        }
        BrowserAction::PrevPage => {
            let filtered = filtered_count(&state, config);
            let (can_prev, page_index) = {
                let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
                (gv.can_prev(), gv.page_index)
            };
            if can_prev {
                state.view.set_page(page_index - 1, filtered);
                state.cursor = 0;
            }
        }
        BrowserAction::FirstPage => {
            state.view.set_page(0, filtered_count(&state, config));
            state.cursor = 0;
        }
        BrowserAction::LastPage => {
            let filtered = filtered_count(&state, config);
            state.view.set_page(usize::MAX, filtered);
            state.cursor = 0;
        }
        BrowserAction::CyclePageSize => {
            let filtered = filtered_count(&state, config);
            let current = state.view.pagination.page_size;
            let index = PAGE_SIZES.iter().position(|&s| s == current).unwrap_or(0);
            let next = PAGE_SIZES[(index + 1) % PAGE_SIZES.len()];
            state.view.set_page_size(next, filtered);
            state.cursor = 0;
        }

        // Selection -------------------------------------------------------
        BrowserAction::ToggleSelect => {
            if let Some(id) = cursor_record_id(&state, config) {
                state.view.toggle_row_selected(&id);
            }
        }
        BrowserAction::ToggleSelectPage => {
            let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
            let all_selected = gv.all_page_selected(&state.view);
            let page_ids = gv.page_ids();
            drop(gv);
            state
                .view
                .set_page_selected(page_ids.iter().map(|s| s.as_str()), !all_selected);
        }

        // Sorting / columns -----------------------------------------------
        BrowserAction::HeaderLeft => {
            state.header_cursor = state.header_cursor.saturating_sub(1);
        }
        BrowserAction::HeaderRight => {
            let count = visible_columns(&config.schema, &state.view).len();
            if count > 0 {
                state.header_cursor = (state.header_cursor + 1).min(count - 1);
            }
        }
        BrowserAction::CycleSortAtCursor => {
            let column = visible_columns(&config.schema, &state.view)
                .get(state.header_cursor)
                .filter(|c| c.sortable)
                .map(|c| c.id);
            if let Some(id) = column {
                state.view.cycle_sort(id);
                state.cursor = 0;
            }
        }
        BrowserAction::OpenColumns => state.mode = Mode::Columns { cursor: 0 },
        BrowserAction::ColumnsUp => {
            if let Mode::Columns { cursor } = &mut state.mode {
                *cursor = cursor.saturating_sub(1);
            }
        }
        BrowserAction::ColumnsDown => {
            let count = config.schema.hideable_columns().count();
            if let Mode::Columns { cursor } = &mut state.mode {
                if count > 0 {
                    *cursor = (*cursor + 1).min(count - 1);
                }
            }
        }
        BrowserAction::ToggleColumnAtCursor => {
            if let Mode::Columns { cursor } = &state.mode {
                let id = config.schema.hideable_columns().nth(*cursor).map(|c| c.id);
                if let Some(id) = id {
                    let visible = state.view.is_column_visible(id);
                    state.view.set_column_visible(id, !visible);
                    clamp_header_cursor(&mut state, config);
                }
            }
        }
        BrowserAction::CloseColumns => state.mode = Mode::Browse,

        // Tabs and filters ------------------------------------------------
        BrowserAction::SetTab(index) => {
            apply_tab(&mut state, config, index);
            state.palette.close();
        }
        BrowserAction::NextTab => {
            let next = (state.tab + 1) % config.tabs.len().max(1);
            apply_tab(&mut state, config, next);
        }
        BrowserAction::PrevTab => {
            let len = config.tabs.len().max(1);
            let prev = (state.tab + len - 1) % len;
            apply_tab(&mut state, config, prev);
        }
        BrowserAction::ClearRepoFilter => {
            state.view.set_filter(REPOSITORY_COLUMN, "");
            state.cursor = 0;
            state.palette.close();
        }

        // Query -----------------------------------------------------------
        BrowserAction::FocusQuery => state.mode = Mode::Query,
        BrowserAction::SetQuery(query) => {
            state.view.set_query(query);
            state.cursor = 0;
        }
        BrowserAction::AcceptQuery => state.mode = Mode::Browse,
        BrowserAction::ClearQuery => {
            state.view.set_query("");
            state.cursor = 0;
            state.mode = Mode::Browse;
            state.palette.close();
        }

        // Reorder ---------------------------------------------------------
        BrowserAction::GrabRow => {
            if !state.view.is_natural_order() {
                state.toast = Some(Toast::warning(
                    "Clear the filters and sorting to reorder rows",
                ));
            } else if let Some(id) = cursor_record_id(&state, config) {
                let original = state.records.iter().map(|r| r.id().to_string()).collect();
                state.mode = Mode::Reorder {
                    grabbed: id,
                    original,
                };
            }
        }
        BrowserAction::MoveGrabbedUp => move_grabbed(&mut state, config, false),
        BrowserAction::MoveGrabbedDown => move_grabbed(&mut state, config, true),
        BrowserAction::DropGrabbed => {
            if matches!(state.mode, Mode::Reorder { .. }) {
                state.mode = Mode::Browse;
            }
        }
        BrowserAction::CancelGrab => {
            if let Mode::Reorder { original, .. } = &state.mode {
                let order: std::collections::HashMap<&str, usize> = original
                    .iter()
                    .enumerate()
                    .map(|(i, id)| (id.as_str(), i))
                    .collect();
                let mut records = std::mem::take(&mut state.records);
                records.sort_by_key(|r| order.get(r.id()).copied().unwrap_or(usize::MAX));
                state.records = records;
                state.mode = Mode::Browse;
            }
        }

        // Detail overlay --------------------------------------------------
        BrowserAction::OpenDetail => {
            if let Some(id) = cursor_record_id(&state, config) {
                state.mode = Mode::Detail(DetailState::new(id));
            }
        }
        BrowserAction::CloseDetail => {
            if matches!(state.mode, Mode::Detail(_)) {
                state.mode = Mode::Browse;
            }
        }
        BrowserAction::DetailNextTab => {
            if let Mode::Detail(detail) = &mut state.mode {
                detail.tab = detail.tab.next();
            }
        }
        BrowserAction::DetailPrevTab => {
            if let Mode::Detail(detail) = &mut state.mode {
                detail.tab = detail.tab.prev();
            }
        }
        BrowserAction::SetCommentDraft(text) => {
            if let Mode::Detail(detail) = &mut state.mode {
                detail.comment_draft = text;
            }
        }
        BrowserAction::PostComment => {
            if let Mode::Detail(detail) = &mut state.mode {
                let body = detail.comment_draft.trim().to_string();
                if !body.is_empty() {
                    detail.comments.push(Comment {
                        author: "you".to_string(),
                        age: "just now".to_string(),
                        body,
                    });
                    detail.comment_draft.clear();
                }
            }
        }
        BrowserAction::SetChatDraft(text) => {
            if let Mode::Detail(detail) = &mut state.mode {
                detail.chat_draft = text;
            }
        }
        BrowserAction::SendChat => {
            if let Mode::Detail(detail) = &mut state.mode {
                let body = detail.chat_draft.trim().to_string();
                if !body.is_empty() {
                    detail.chat.push(ChatMessage {
                        from_user: true,
                        body,
                    });
                    detail.chat.push(ChatMessage {
                        from_user: false,
                        body: CANNED_CHAT_REPLY.to_string(),
                    });
                    detail.chat_draft.clear();
                }
            }
        }

        // Create form -----------------------------------------------------
        BrowserAction::OpenCreate => {
            state.mode = Mode::Create(CreateState::default());
            state.palette.close();
        }
        BrowserAction::CancelCreate => {
            if matches!(state.mode, Mode::Create(_)) {
                state.mode = Mode::Browse;
            }
        }
        BrowserAction::CreateNextField => {
            if let Mode::Create(form) = &mut state.mode {
                form.focus = form.focus.next();
            }
        }
        BrowserAction::CreatePrevField => {
            if let Mode::Create(form) = &mut state.mode {
                form.focus = form.focus.prev();
            }
        }
        BrowserAction::SetCreateTitle(text) => {
            if let Mode::Create(form) = &mut state.mode {
                form.title = text;
            }
        }
        BrowserAction::SetCreateDescription(text) => {
            if let Mode::Create(form) = &mut state.mode {
                form.description = text;
            }
        }
        BrowserAction::CreateCycleOption => cycle_create_option(&mut state, true),
        BrowserAction::CreateCycleOptionBack => cycle_create_option(&mut state, false),

        // Palette ---------------------------------------------------------
        BrowserAction::TogglePalette => state.palette.toggle(),
        BrowserAction::ClosePalette => state.palette.close(),
        BrowserAction::SetPaletteQuery(query) => {
            state.palette.query = query;
            state.palette.cursor = 0;
        }
        BrowserAction::PaletteUp => {
            state.palette.cursor = state.palette.cursor.saturating_sub(1);
        }
        BrowserAction::PaletteDown => {
            let count = palette_entries(&state, config).len();
            if count > 0 {
                state.palette.cursor = (state.palette.cursor + 1).min(count - 1);
            }
        }

        // Async lifecycle -------------------------------------------------
        BrowserAction::MarkPending(id) => {
            state.toast = Some(Toast::info(format!("{} {}", config.action_running, id)));
            state.pending.insert(id);
        }
        BrowserAction::ApplyFlag(id) => {
            state.pending.remove(&id);
            // Relevance guard: the record may have been replaced since the
            // action started.
            if let Some(record) = state.records.iter_mut().find(|r| r.id() == id) {
                (config.set_flag)(record);
                state.toast = Some(Toast::success(config.action_done));
            }
        }
        BrowserAction::ActionFailed(id, message) => {
            state.pending.remove(&id);
            state.toast = Some(Toast::error(message));
        }
        BrowserAction::MarkSubmitting => {
            if let Mode::Create(form) = &mut state.mode {
                form.submitting = true;
            }
        }
        BrowserAction::ApplyCreated(record) => {
            if matches!(state.mode, Mode::Create(_)) {
                state.mode = Mode::Browse;
            }
            state.toast = Some(Toast::success(format!(
                "{} created successfully",
                capitalize(config.singular)
            )));
            state.records.insert(0, record);
            state.view.set_page(0, state.records.len());
            state.cursor = 0;
        }
        BrowserAction::CreateFailed(message) => {
            if let Mode::Create(form) = &mut state.mode {
                form.submitting = false;
            }
            state.toast = Some(Toast::error(message));
        }
        BrowserAction::RecordsLoaded(records, repositories) => {
            state.records = records;
            state.repositories = repositories;
            state.loading = false;
        }
        BrowserAction::SetActiveModel(label) => {
            state.toast = Some(Toast::info(format!("Active model: {}", label)));
            state.active_model = label;
            state.palette.close();
        }
        BrowserAction::ShowToast(message) => {
            state.toast = Some(Toast::error(message));
        }

        // Markers handled by the component --------------------------------
        BrowserAction::AnalyzeRequested
        | BrowserAction::SubmitCreate
        | BrowserAction::CycleModelRequested => {}

        // App -------------------------------------------------------------
        BrowserAction::DismissToast => state.toast = None,
        BrowserAction::Quit => {
            state.should_exit = true;
            state.palette.close();
        }
    }

    clamp_cursor(&mut state, config);
    state
}

fn filtered_count<R: GridRecord>(state: &BrowserState<R>, config: &EntityConfig<R>) -> usize {
    grid::view_state::derive(&state.records, &state.view, &config.schema).filtered_count
}

fn clamp_cursor<R: GridRecord>(state: &mut BrowserState<R>, config: &EntityConfig<R>) {
    let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
    let page_len = gv.page_rows.len();
    drop(gv);
    if page_len == 0 {
        state.cursor = 0;
    } else if state.cursor >= page_len {
        state.cursor = page_len - 1;
    }
    clamp_header_cursor(state, config);
}

fn clamp_header_cursor<R: GridRecord>(state: &mut BrowserState<R>, config: &EntityConfig<R>) {
    let count = visible_columns(&config.schema, &state.view).len();
    if count > 0 && state.header_cursor >= count {
        state.header_cursor = count - 1;
    }
}

fn apply_tab<R: GridRecord>(state: &mut BrowserState<R>, config: &EntityConfig<R>, index: usize) {
    let Some(tab) = config.tabs.get(index) else {
        return;
    };
    state.tab = index;
    state.view.set_filter(STATUS_COLUMN, tab.filter.unwrap_or(""));
    state.cursor = 0;
}

fn move_grabbed<R: GridRecord>(state: &mut BrowserState<R>, config: &EntityConfig<R>, forward: bool) {
    let Mode::Reorder { grabbed, .. } = &state.mode else {
        return;
    };
    let grabbed = grabbed.clone();
    let Some(over) = grid::reorder::neighbor_id(&state.records, &grabbed, forward) else {
        return;
    };
    if grid::move_by_id(&mut state.records, &grabbed, &over) {
        follow_grabbed(state, &grabbed);
    }
}

/// Keep the cursor and page on the grabbed row after it moves.
fn follow_grabbed<R: GridRecord>(state: &mut BrowserState<R>, grabbed: &str) {
    if let Some(index) = state.records.iter().position(|r| r.id() == grabbed) {
        let page_size = state.view.pagination.page_size.max(1);
        state.view.set_page(index / page_size, state.records.len());
        state.cursor = index % page_size;
    }
}

fn cycle_create_option<R: GridRecord>(state: &mut BrowserState<R>, forward: bool) {
    let repo_count = state.repositories.len();
    if let Mode::Create(form) = &mut state.mode {
        match form.focus {
            CreateField::Repository => {
                form.repo_index = cycle_index(form.repo_index, repo_count + 1, forward);
            }
            CreateField::Priority => {
                form.priority_index =
                    cycle_index(form.priority_index, PRIORITY_CHOICES.len(), forward);
            }
            CreateField::Person => {
                form.person_index = cycle_index(form.person_index, PEOPLE.len() + 1, forward);
            }
            CreateField::Title | CreateField::Description => {}
        }
    }
}

fn cycle_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ============================================================================
// Derived helpers
// ============================================================================

/// Id of the record under the row cursor on the current page.
pub fn cursor_record_id<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
) -> Option<String> {
    let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
    gv.page_rows.get(state.cursor).map(|r| r.id().to_string())
}

/// Record targeted by an AI action request: the open detail overlay's
/// record, otherwise the cursor row. Returns `None` when the action is
/// already pending or the flag is already set.
pub fn analyze_target<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
) -> Option<String> {
    let id = match &state.mode {
        Mode::Detail(detail) => Some(detail.id.clone()),
        _ => cursor_record_id(state, config),
    }?;
    let record = state.records.iter().find(|r| r.id() == id)?;
    if state.pending.contains(&id) || (config.flag_set)(record) {
        return None;
    }
    Some(id)
}

/// Client-side required-field validation for the create form.
pub fn validate_create<R: GridRecord>(state: &BrowserState<R>) -> Result<(), String> {
    let Mode::Create(form) = &state.mode else {
        return Err("No form open".to_string());
    };
    if form.submitting {
        return Err("Already creating".to_string());
    }
    if form.title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if form.repo_index == 0 {
        return Err("Repository is required".to_string());
    }
    Ok(())
}

/// Draft payload for a valid create form.
pub fn create_draft<R: GridRecord>(state: &BrowserState<R>) -> Option<CreateDraft> {
    let Mode::Create(form) = &state.mode else {
        return None;
    };
    let repository = state.repositories.get(form.repo_index.checked_sub(1)?)?;
    Some(CreateDraft {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        repository: repository.clone(),
        priority: PRIORITY_CHOICES[form.priority_index.min(PRIORITY_CHOICES.len() - 1)],
        person: form
            .person_index
            .checked_sub(1)
            .and_then(|i| PEOPLE.get(i))
            .map(|p| p.to_string()),
    })
}

/// Palette entries applicable to the current state, fuzzy-filtered by the
/// palette query.
pub fn palette_entries<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
) -> Vec<PaletteEntry> {
    let mut entries = vec![PaletteEntry::NewRecord];
    if state.view.filter_for(REPOSITORY_COLUMN).is_some() {
        entries.push(PaletteEntry::ClearRepoFilter);
    }
    if !state.view.query.is_empty() {
        entries.push(PaletteEntry::ClearQuery);
    }
    for index in 0..config.tabs.len() {
        entries.push(PaletteEntry::ShowTab(index));
    }
    entries.push(PaletteEntry::CycleModel);
    entries.push(PaletteEntry::Quit);

    if state.palette.query.is_empty() {
        return entries;
    }
    let matcher = SkimMatcherV2::default().smart_case();
    entries
        .into_iter()
        .filter(|e| {
            matcher
                .fuzzy_match(&palette_label(*e, config), &state.palette.query)
                .is_some()
        })
        .collect()
}

/// Display label for a palette entry.
pub fn palette_label<R>(entry: PaletteEntry, config: &EntityConfig<R>) -> String {
    match entry {
        PaletteEntry::NewRecord => config.create_title.to_string(),
        PaletteEntry::ClearRepoFilter => "Clear repository filter".to_string(),
        PaletteEntry::ClearQuery => "Clear search".to_string(),
        PaletteEntry::ShowTab(index) => {
            let label = config.tabs.get(index).map(|t| t.label).unwrap_or("?");
            format!("Show: {}", label)
        }
        PaletteEntry::CycleModel => "Switch AI model".to_string(),
        PaletteEntry::Quit => "Quit".to_string(),
    }
}

/// Entry currently selected in the palette.
pub fn palette_selection<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
) -> Option<PaletteEntry> {
    palette_entries(state, config)
        .get(state.palette.cursor)
        .copied()
}

/// Count of records carrying a tab's status, over the full collection.
pub fn tab_count<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
    tab_index: usize,
) -> usize {
    let Some(tab) = config.tabs.get(tab_index) else {
        return 0;
    };
    match tab.filter {
        None => state.records.len(),
        Some(value) => {
            let Some(column) = config.schema.column(STATUS_COLUMN) else {
                return 0;
            };
            let needle = UniCase::new(value.to_string());
            state
                .records
                .iter()
                .filter(|r| UniCase::new((column.text)(r)) == needle)
                .count()
        }
    }
}

// ============================================================================
// View model
// ============================================================================

/// Why the table body is empty, when it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    Loading,
    NoRecords,
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderVm {
    pub title: String,
    pub width: u16,
    pub stretch: bool,
    pub sort: Option<SortDirection>,
    pub is_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowVm {
    pub id: String,
    pub cells: Vec<Cell>,
    pub selected: bool,
    pub is_cursor: bool,
    pub grabbed: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationVm {
    pub page_index: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub filtered: usize,
    pub selected_filtered: usize,
    pub can_prev: bool,
    pub can_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabVm {
    pub label: &'static str,
    pub count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnsVm {
    pub entries: Vec<(String, bool, bool)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailVm {
    pub content: DetailContent,
    pub tab: DetailTab,
    pub comments: Vec<Comment>,
    pub comment_draft: String,
    pub chat: Vec<ChatMessage>,
    pub chat_draft: String,
    pub pending: bool,
    pub action_label: &'static str,
    pub analysis_title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateFieldVm {
    pub label: &'static str,
    pub value: String,
    pub focused: bool,
    pub is_select: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateVm {
    pub title: &'static str,
    pub fields: Vec<CreateFieldVm>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayVm {
    Columns(ColumnsVm),
    Detail(DetailVm),
    Create(CreateVm),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaletteVm {
    pub query: String,
    pub entries: Vec<(String, bool)>,
}

/// Computed view model for rendering the entire browser screen.
#[derive(Debug, Clone, Default)]
pub struct BrowserViewModel {
    pub title: String,
    pub active_model: String,
    pub repo_filter: Option<String>,
    pub tabs: Vec<TabVm>,
    pub query: String,
    pub query_focused: bool,
    pub headers: Vec<HeaderVm>,
    pub rows: Vec<RowVm>,
    pub all_page_selected: bool,
    pub pagination: PaginationVm,
    pub empty: Option<EmptyKind>,
    pub reordering: bool,
    pub overlay: Option<OverlayVm>,
    pub palette: Option<PaletteVm>,
    pub shortcuts: Vec<Shortcut>,
    pub toast: Option<Toast>,
    pub total_records: usize,
}

/// Pure function: compute the render-ready view model from state.
pub fn compute_view_model<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
) -> BrowserViewModel {
    let gv = grid::view_state::derive(&state.records, &state.view, &config.schema);
    let columns = visible_columns(&config.schema, &state.view);

    let headers: Vec<HeaderVm> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| HeaderVm {
            title: column.title.to_string(),
            width: column.width,
            stretch: column.id == "title",
            sort: state.view.sort_for(column.id).map(|r| r.direction),
            is_cursor: i == state.header_cursor,
        })
        .collect();

    let grabbed_id = match &state.mode {
        Mode::Reorder { grabbed, .. } => Some(grabbed.as_str()),
        _ => None,
    };

    let rows: Vec<RowVm> = gv
        .page_rows
        .iter()
        .enumerate()
        .map(|(i, record)| RowVm {
            id: record.id().to_string(),
            cells: columns.iter().map(|c| (c.cell)(record)).collect(),
            selected: state.view.is_selected(record.id()),
            is_cursor: i == state.cursor,
            grabbed: grabbed_id == Some(record.id()),
            pending: state.pending.contains(record.id()),
        })
        .collect();

    let pagination = PaginationVm {
        page_index: gv.page_index,
        total_pages: gv.total_pages,
        page_size: gv.page_size,
        filtered: gv.filtered_count,
        selected_filtered: gv.selected_filtered,
        can_prev: gv.can_prev(),
        can_next: gv.can_next(),
    };
    let all_page_selected = gv.all_page_selected(&state.view);

    let empty = if state.loading {
        Some(EmptyKind::Loading)
    } else if state.records.is_empty() {
        Some(EmptyKind::NoRecords)
    } else if gv.filtered_count == 0 {
        Some(EmptyKind::NoMatches)
    } else {
        None
    };

    let tabs: Vec<TabVm> = config
        .tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| TabVm {
            label: tab.label,
            count: tab_count(state, config, i),
            active: i == state.tab,
        })
        .collect();

    let overlay = match &state.mode {
        Mode::Columns { cursor } => Some(OverlayVm::Columns(ColumnsVm {
            entries: config
                .schema
                .hideable_columns()
                .enumerate()
                .map(|(i, c)| {
                    (
                        c.title.to_string(),
                        state.view.is_column_visible(c.id),
                        i == *cursor,
                    )
                })
                .collect(),
        })),
        Mode::Detail(detail) => state
            .records
            .iter()
            .find(|r| r.id() == detail.id)
            .map(|record| {
                OverlayVm::Detail(DetailVm {
                    content: (config.detail)(record),
                    tab: detail.tab,
                    comments: detail.comments.clone(),
                    comment_draft: detail.comment_draft.clone(),
                    chat: detail.chat.clone(),
                    chat_draft: detail.chat_draft.clone(),
                    pending: state.pending.contains(&detail.id),
                    action_label: config.action_label,
                    analysis_title: config.analysis_title,
                })
            }),
        Mode::Create(form) => Some(OverlayVm::Create(create_vm(state, config, form))),
        Mode::Browse | Mode::Query | Mode::Reorder { .. } => None,
    };

    let palette = state.palette.is_open.then(|| PaletteVm {
        query: state.palette.query.clone(),
        entries: palette_entries(state, config)
            .iter()
            .enumerate()
            .map(|(i, e)| (palette_label(*e, config), i == state.palette.cursor))
            .collect(),
    });

    BrowserViewModel {
        title: config.title.to_string(),
        active_model: state.active_model.clone(),
        repo_filter: state
            .view
            .filter_for(REPOSITORY_COLUMN)
            .map(|s| s.to_string()),
        tabs,
        query: state.view.query.clone(),
        query_focused: state.mode == Mode::Query,
        headers,
        rows,
        all_page_selected,
        pagination,
        empty,
        reordering: grabbed_id.is_some(),
        overlay,
        palette,
        shortcuts: shortcuts_for(state),
        toast: state.toast.clone(),
        total_records: state.records.len(),
    }
}

fn create_vm<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
    form: &CreateState,
) -> CreateVm {
    let repository = if form.repo_index == 0 {
        "Select repository".to_string()
    } else {
        state
            .repositories
            .get(form.repo_index - 1)
            .cloned()
            .unwrap_or_else(|| "Select repository".to_string())
    };
    let person = if form.person_index == 0 {
        "Unassigned".to_string()
    } else {
        PEOPLE
            .get(form.person_index - 1)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "Unassigned".to_string())
    };
    let priority = PRIORITY_CHOICES[form.priority_index.min(PRIORITY_CHOICES.len() - 1)];

    CreateVm {
        title: config.create_title,
        fields: vec![
            CreateFieldVm {
                label: "Repository",
                value: repository,
                focused: form.focus == CreateField::Repository,
                is_select: true,
            },
            CreateFieldVm {
                label: "Title",
                value: form.title.clone(),
                focused: form.focus == CreateField::Title,
                is_select: false,
            },
            CreateFieldVm {
                label: "Description",
                value: form.description.clone(),
                focused: form.focus == CreateField::Description,
                is_select: false,
            },
            CreateFieldVm {
                label: "Priority",
                value: priority.to_string(),
                focused: form.focus == CreateField::Priority,
                is_select: true,
            },
            CreateFieldVm {
                label: config.person_label,
                value: person,
                focused: form.focus == CreateField::Person,
                is_select: true,
            },
        ],
        submitting: form.submitting,
    }
}

fn shortcuts_for<R>(state: &BrowserState<R>) -> Vec<Shortcut> {
    use crate::tui::components::footer::{
        browse_shortcuts, columns_shortcuts, create_shortcuts, detail_shortcuts,
        palette_shortcuts, query_shortcuts, reorder_shortcuts,
    };
    if state.palette.is_open {
        return palette_shortcuts();
    }
    match &state.mode {
        Mode::Browse => browse_shortcuts(),
        Mode::Query => query_shortcuts(),
        Mode::Columns { .. } => columns_shortcuts(),
        Mode::Reorder { .. } => reorder_shortcuts(),
        Mode::Detail(_) => detail_shortcuts(),
        Mode::Create(_) => create_shortcuts(),
    }
}

// ============================================================================
// Key mapping
// ============================================================================

/// Convert a key event to a `BrowserAction` (pure function).
///
/// Needs the current state to route keys by mode and to resolve the
/// palette selection; text-editing keys return `None` so the focused
/// `TextInput` can handle them.
pub fn key_to_action<R: GridRecord>(
    state: &BrowserState<R>,
    config: &EntityConfig<R>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Option<BrowserAction<R>> {
    // Palette toggle works everywhere.
    if code == KeyCode::Char('k') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(BrowserAction::TogglePalette);
    }

    if state.palette.is_open {
        return match code {
            KeyCode::Esc => Some(BrowserAction::ClosePalette),
            KeyCode::Up => Some(BrowserAction::PaletteUp),
            KeyCode::Down => Some(BrowserAction::PaletteDown),
            KeyCode::Enter => palette_selection(state, config).map(|entry| match entry {
                PaletteEntry::NewRecord => BrowserAction::OpenCreate,
                PaletteEntry::ClearRepoFilter => BrowserAction::ClearRepoFilter,
                PaletteEntry::ClearQuery => BrowserAction::ClearQuery,
                PaletteEntry::ShowTab(index) => BrowserAction::SetTab(index),
                PaletteEntry::CycleModel => BrowserAction::CycleModelRequested,
                PaletteEntry::Quit => BrowserAction::Quit,
            }),
            _ => None,
        };
    }

    match &state.mode {
        Mode::Query => match code {
            KeyCode::Esc => Some(BrowserAction::ClearQuery),
            KeyCode::Enter | KeyCode::Tab => Some(BrowserAction::AcceptQuery),
            _ => None,
        },

        Mode::Columns { .. } => match code {
            KeyCode::Esc | KeyCode::Char('v') | KeyCode::Char('q') => {
                Some(BrowserAction::CloseColumns)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(BrowserAction::ColumnsDown),
            KeyCode::Char('k') | KeyCode::Up => Some(BrowserAction::ColumnsUp),
            KeyCode::Char(' ') | KeyCode::Enter => Some(BrowserAction::ToggleColumnAtCursor),
            _ => None,
        },

        Mode::Reorder { .. } => match code {
            KeyCode::Char('j') | KeyCode::Down => Some(BrowserAction::MoveGrabbedDown),
            KeyCode::Char('k') | KeyCode::Up => Some(BrowserAction::MoveGrabbedUp),
            KeyCode::Char(' ') | KeyCode::Enter => Some(BrowserAction::DropGrabbed),
            KeyCode::Esc => Some(BrowserAction::CancelGrab),
            _ => None,
        },

        Mode::Detail(detail) => match code {
            KeyCode::Esc => Some(BrowserAction::CloseDetail),
            // Resolve/Approve and Close both just close the overlay.
            KeyCode::Char('r') => Some(BrowserAction::CloseDetail),
            KeyCode::Tab | KeyCode::Right => Some(BrowserAction::DetailNextTab),
            KeyCode::BackTab | KeyCode::Left => Some(BrowserAction::DetailPrevTab),
            KeyCode::Enter if detail.tab == DetailTab::Comments => {
                Some(BrowserAction::PostComment)
            }
            KeyCode::Enter if detail.tab == DetailTab::AskAi => Some(BrowserAction::SendChat),
            KeyCode::Char('a') if detail.tab == DetailTab::Analysis => {
                Some(BrowserAction::AnalyzeRequested)
            }
            _ => None,
        },

        Mode::Create(_) => match code {
            KeyCode::Esc => Some(BrowserAction::CancelCreate),
            KeyCode::Tab | KeyCode::Down => Some(BrowserAction::CreateNextField),
            KeyCode::BackTab | KeyCode::Up => Some(BrowserAction::CreatePrevField),
            KeyCode::Left => Some(BrowserAction::CreateCycleOptionBack),
            KeyCode::Right => Some(BrowserAction::CreateCycleOption),
            KeyCode::Enter => Some(BrowserAction::SubmitCreate),
            _ => None,
        },

        Mode::Browse => match code {
            KeyCode::Char('j') | KeyCode::Down => Some(BrowserAction::CursorDown),
            KeyCode::Char('k') | KeyCode::Up => Some(BrowserAction::CursorUp),
            KeyCode::Char('g') => Some(BrowserAction::CursorTop),
            KeyCode::Char('G') => Some(BrowserAction::CursorBottom),
            KeyCode::Right | KeyCode::PageDown => Some(BrowserAction::NextPage),
            KeyCode::Left | KeyCode::PageUp => Some(BrowserAction::PrevPage),
            KeyCode::Home => Some(BrowserAction::FirstPage),
            KeyCode::End => Some(BrowserAction::LastPage),
            KeyCode::Char('z') => Some(BrowserAction::CyclePageSize),
            KeyCode::Char(' ') => Some(BrowserAction::ToggleSelect),
            KeyCode::Char('a') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(BrowserAction::ToggleSelectPage)
            }
            KeyCode::Char('a') => Some(BrowserAction::AnalyzeRequested),
            KeyCode::Char('h') => Some(BrowserAction::HeaderLeft),
            KeyCode::Char('l') => Some(BrowserAction::HeaderRight),
            KeyCode::Char('s') => Some(BrowserAction::CycleSortAtCursor),
            KeyCode::Char('v') => Some(BrowserAction::OpenColumns),
            KeyCode::Char('/') => Some(BrowserAction::FocusQuery),
            KeyCode::Char('t') => Some(BrowserAction::NextTab),
            KeyCode::Char('T') => Some(BrowserAction::PrevTab),
            KeyCode::Char('c') => Some(BrowserAction::ClearRepoFilter),
            KeyCode::Char('m') => Some(BrowserAction::GrabRow),
            KeyCode::Char('n') => Some(BrowserAction::OpenCreate),
            KeyCode::Enter => Some(BrowserAction::OpenDetail),
            KeyCode::Esc => Some(BrowserAction::DismissToast),
            KeyCode::Char('q') => Some(BrowserAction::Quit),
            _ => None,
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::schema::{ColumnSpec, FilterMode, SortKey, TableSchema};
    use crate::grid::ColumnId;
    use crate::tui::browser::config::Tab;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Rec {
        id: String,
        title: String,
        status: String,
        repo: String,
        flag: bool,
    }

    impl GridRecord for Rec {
        fn id(&self) -> &str {
            &self.id
        }

        fn search_text(&self) -> String {
            format!("{} {} {}", self.id, self.title, self.repo)
        }
    }

    fn rec(id: &str, title: &str, status: &str, repo: &str) -> Rec {
        Rec {
            id: id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            repo: repo.to_string(),
            flag: false,
        }
    }

    const TITLE_COLUMN: ColumnId = "title";

    fn config() -> EntityConfig<Rec> {
        EntityConfig {
            title: "Records",
            singular: "record",
            create_title: "Create New Record",
            person_label: "Assignee",
            action_label: "Analyze",
            action_running: "Running AI analysis for",
            action_done: "AI analysis completed",
            analysis_title: "AI Analysis",
            schema: TableSchema::new(vec![
                ColumnSpec {
                    id: TITLE_COLUMN,
                    title: "Title",
                    width: 30,
                    hideable: false,
                    sortable: true,
                    filter: FilterMode::Substring,
                    text: |r: &Rec| r.title.clone(),
                    sort_key: |r: &Rec| SortKey::text(&r.title),
                    cell: |r: &Rec| Cell::Text(r.title.clone()),
                },
                ColumnSpec {
                    id: STATUS_COLUMN,
                    title: "Status",
                    width: 12,
                    hideable: true,
                    sortable: true,
                    filter: FilterMode::Exact,
                    text: |r: &Rec| r.status.clone(),
                    sort_key: |r: &Rec| SortKey::text(&r.status),
                    cell: |r: &Rec| Cell::Text(r.status.clone()),
                },
                ColumnSpec {
                    id: REPOSITORY_COLUMN,
                    title: "Repository",
                    width: 20,
                    hideable: true,
                    sortable: true,
                    filter: FilterMode::Exact,
                    text: |r: &Rec| r.repo.clone(),
                    sort_key: |r: &Rec| SortKey::text(&r.repo),
                    cell: |r: &Rec| Cell::Text(r.repo.clone()),
                },
            ]),
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
                    label: "Closed",
                    filter: Some("Closed"),
                },
            ],
            detail: |r: &Rec| DetailContent {
                id: r.id.clone(),
                title: r.title.clone(),
                ..Default::default()
            },
            flag_set: |r: &Rec| r.flag,
            set_flag: |r: &mut Rec| r.flag = true,
        }
    }

    fn state_with(count: usize) -> BrowserState<Rec> {
        let records: Vec<Rec> = (0..count)
            .map(|i| {
                rec(
                    &format!("r-{i}"),
                    &format!("Record {i}"),
                    if i % 2 == 0 { "Open" } else { "Closed" },
                    "repo-a",
                )
            })
            .collect();
        BrowserState {
            records,
            loading: false,
            ..BrowserState::default()
        }
    }

    fn apply(
        state: BrowserState<Rec>,
        actions: impl IntoIterator<Item = BrowserAction<Rec>>,
    ) -> BrowserState<Rec> {
        let config = config();
        actions
            .into_iter()
            .fold(state, |s, a| reduce(s, a, &config))
    }

    // ------------------------------------------------------------------
    // Navigation and pagination
    // ------------------------------------------------------------------

    #[test]
    fn test_cursor_down_within_page() {
        let state = apply(state_with(5), [BrowserAction::CursorDown]);
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_cursor_down_at_page_end_advances_page() {
        let mut state = state_with(12);
        state.cursor = 9;
        let state = apply(state, [BrowserAction::CursorDown]);
        assert_eq!(state.view.pagination.page_index, 1);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_cursor_up_at_page_start_goes_back() {
        let mut state = state_with(12);
        state.view.set_page(1, 12);
        let state = apply(state, [BrowserAction::CursorUp]);
        assert_eq!(state.view.pagination.page_index, 0);
        assert_eq!(state.cursor, 9);
    }

    #[test]
    fn test_next_page_stops_at_last() {
        let state = apply(
            state_with(12),
            [BrowserAction::NextPage, BrowserAction::NextPage],
        );
        assert_eq!(state.view.pagination.page_index, 1);
    }

    #[test]
    fn test_cycle_page_size_clamps_page() {
        let mut state = state_with(12);
        state.view.set_page(1, 12);
        let state = apply(state, [BrowserAction::CyclePageSize]);
        assert_eq!(state.view.pagination.page_size, 20);
        assert_eq!(state.view.pagination.page_index, 0);
    }

    // ------------------------------------------------------------------
    // Tabs and filters
    // ------------------------------------------------------------------

    #[test]
    fn test_tab_applies_status_filter() {
        let config = config();
        let state = apply(state_with(6), [BrowserAction::SetTab(1)]);
        assert_eq!(state.tab, 1);
        let vm = compute_view_model(&state, &config);
        assert_eq!(vm.pagination.filtered, 3);
        assert!(vm.rows.iter().all(|r| r.id.ends_with(|c: char| {
            c.to_digit(10).map(|d| d % 2 == 0).unwrap_or(false)
        })));
    }

    #[test]
    fn test_tab_back_to_all_restores() {
        let state = apply(
            state_with(6),
            [BrowserAction::SetTab(2), BrowserAction::SetTab(0)],
        );
        let vm = compute_view_model(&state, &config());
        assert_eq!(vm.pagination.filtered, 6);
    }

    #[test]
    fn test_tab_counts_use_full_collection() {
        let state = apply(state_with(6), [BrowserAction::SetTab(1)]);
        let vm = compute_view_model(&state, &config());
        assert_eq!(vm.tabs[0].count, 6);
        assert_eq!(vm.tabs[1].count, 3);
        assert_eq!(vm.tabs[2].count, 3);
    }

    #[test]
    fn test_clear_repo_filter() {
        let mut state = state_with(4);
        state.view.set_filter(REPOSITORY_COLUMN, "repo-a");
        let state = apply(state, [BrowserAction::ClearRepoFilter]);
        assert!(state.view.filter_for(REPOSITORY_COLUMN).is_none());
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    #[test]
    fn test_toggle_select_cursor_row() {
        let state = apply(
            state_with(3),
            [BrowserAction::CursorDown, BrowserAction::ToggleSelect],
        );
        assert!(state.view.is_selected("r-1"));
        let state = apply(state, [BrowserAction::ToggleSelect]);
        assert!(!state.view.is_selected("r-1"));
    }

    #[test]
    fn test_toggle_select_page_is_page_scoped() {
        let state = apply(state_with(12), [BrowserAction::ToggleSelectPage]);
        assert_eq!(state.view.selection.len(), 10);
        assert!(!state.view.is_selected("r-10"));

        let state = apply(state, [BrowserAction::ToggleSelectPage]);
        assert!(state.view.selection.is_empty());
    }

    // ------------------------------------------------------------------
    // Sorting via header cursor
    // ------------------------------------------------------------------

    #[test]
    fn test_cycle_sort_at_cursor() {
        let state = apply(state_with(3), [BrowserAction::CycleSortAtCursor]);
        assert_eq!(
            state.view.sort_for(TITLE_COLUMN).map(|r| r.direction),
            Some(SortDirection::Ascending)
        );
        let state = apply(
            state,
            [
                BrowserAction::CycleSortAtCursor,
                BrowserAction::CycleSortAtCursor,
            ],
        );
        assert!(state.view.sorting.is_empty());
    }

    #[test]
    fn test_header_cursor_bounds() {
        let state = apply(
            state_with(2),
            [
                BrowserAction::HeaderRight,
                BrowserAction::HeaderRight,
                BrowserAction::HeaderRight,
                BrowserAction::HeaderRight,
            ],
        );
        assert_eq!(state.header_cursor, 2);
        let state = apply(state, [BrowserAction::HeaderLeft, BrowserAction::HeaderLeft]);
        assert_eq!(state.header_cursor, 0);
    }

    // ------------------------------------------------------------------
    // Column visibility
    // ------------------------------------------------------------------

    #[test]
    fn test_columns_menu_toggle() {
        let state = apply(
            state_with(2),
            [
                BrowserAction::OpenColumns,
                BrowserAction::ToggleColumnAtCursor,
            ],
        );
        // First hideable column is "status".
        assert!(!state.view.is_column_visible(STATUS_COLUMN));
        let vm = compute_view_model(&state, &config());
        assert!(vm.headers.iter().all(|h| h.title != "Status"));

        let state = apply(
            state,
            [
                BrowserAction::ToggleColumnAtCursor,
                BrowserAction::CloseColumns,
            ],
        );
        assert!(state.view.is_column_visible(STATUS_COLUMN));
        assert_eq!(state.mode, Mode::Browse);
    }

    // ------------------------------------------------------------------
    // Reorder
    // ------------------------------------------------------------------

    fn order(state: &BrowserState<Rec>) -> Vec<&str> {
        state.records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_grab_and_move_down() {
        let state = apply(
            state_with(4),
            [BrowserAction::GrabRow, BrowserAction::MoveGrabbedDown],
        );
        assert_eq!(order(&state), vec!["r-1", "r-0", "r-2", "r-3"]);
        assert!(matches!(state.mode, Mode::Reorder { .. }));
        assert_eq!(state.cursor, 1);

        let state = apply(state, [BrowserAction::DropGrabbed]);
        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(order(&state), vec!["r-1", "r-0", "r-2", "r-3"]);
    }

    #[test]
    fn test_cancel_grab_restores_order() {
        let state = apply(
            state_with(4),
            [
                BrowserAction::GrabRow,
                BrowserAction::MoveGrabbedDown,
                BrowserAction::MoveGrabbedDown,
                BrowserAction::CancelGrab,
            ],
        );
        assert_eq!(order(&state), vec!["r-0", "r-1", "r-2", "r-3"]);
        assert_eq!(state.mode, Mode::Browse);
    }

    #[test]
    fn test_grab_refused_when_filtered() {
        let mut state = state_with(4);
        state.view.set_query("Record");
        let state = apply(state, [BrowserAction::GrabRow]);
        assert_eq!(state.mode, Mode::Browse);
        assert!(state.toast.is_some());
    }

    #[test]
    fn test_move_grabbed_at_top_is_noop() {
        let state = apply(
            state_with(3),
            [BrowserAction::GrabRow, BrowserAction::MoveGrabbedUp],
        );
        assert_eq!(order(&state), vec!["r-0", "r-1", "r-2"]);
    }

    // ------------------------------------------------------------------
    // Detail overlay
    // ------------------------------------------------------------------

    #[test]
    fn test_open_detail_on_cursor_row() {
        let state = apply(
            state_with(3),
            [BrowserAction::CursorDown, BrowserAction::OpenDetail],
        );
        match &state.mode {
            Mode::Detail(detail) => {
                assert_eq!(detail.id, "r-1");
                assert_eq!(detail.tab, DetailTab::Details);
                assert_eq!(detail.comments.len(), 2);
            }
            other => panic!("expected detail mode, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_are_overlay_scoped() {
        let state = apply(
            state_with(3),
            [
                BrowserAction::OpenDetail,
                BrowserAction::SetCommentDraft("First!".to_string()),
                BrowserAction::PostComment,
            ],
        );
        let Mode::Detail(detail) = &state.mode else {
            panic!("expected detail mode");
        };
        assert_eq!(detail.comments.len(), 3);
        assert_eq!(detail.comments[2].body, "First!");
        assert!(detail.comment_draft.is_empty());

        // Close and reopen: the posted comment is gone.
        let state = apply(state, [BrowserAction::CloseDetail, BrowserAction::OpenDetail]);
        let Mode::Detail(detail) = &state.mode else {
            panic!("expected detail mode");
        };
        assert_eq!(detail.comments.len(), 2);
    }

    #[test]
    fn test_empty_comment_is_ignored() {
        let state = apply(
            state_with(1),
            [
                BrowserAction::OpenDetail,
                BrowserAction::SetCommentDraft("   ".to_string()),
                BrowserAction::PostComment,
            ],
        );
        let Mode::Detail(detail) = &state.mode else {
            panic!("expected detail mode");
        };
        assert_eq!(detail.comments.len(), 2);
    }

    #[test]
    fn test_chat_appends_user_and_reply() {
        let state = apply(
            state_with(1),
            [
                BrowserAction::OpenDetail,
                BrowserAction::SetChatDraft("Why is this broken?".to_string()),
                BrowserAction::SendChat,
            ],
        );
        let Mode::Detail(detail) = &state.mode else {
            panic!("expected detail mode");
        };
        assert_eq!(detail.chat.len(), 4);
        assert!(detail.chat[2].from_user);
        assert!(!detail.chat[3].from_user);
    }

    // ------------------------------------------------------------------
    // AI action lifecycle
    // ------------------------------------------------------------------

    #[test]
    fn test_pending_then_flag_flip() {
        let state = apply(
            state_with(2),
            [BrowserAction::MarkPending("r-0".to_string())],
        );
        assert!(state.pending.contains("r-0"));
        assert!(!state.records[0].flag);

        let state = apply(state, [BrowserAction::ApplyFlag("r-0".to_string())]);
        assert!(state.pending.is_empty());
        assert!(state.records[0].flag);

        // One-way: applying again keeps it set.
        let state = apply(state, [BrowserAction::ApplyFlag("r-0".to_string())]);
        assert!(state.records[0].flag);
    }

    #[test]
    fn test_apply_flag_for_missing_record_is_guarded() {
        let state = apply(
            state_with(1),
            [
                BrowserAction::MarkPending("ghost".to_string()),
                BrowserAction::ApplyFlag("ghost".to_string()),
            ],
        );
        assert!(state.pending.is_empty());
        assert!(!state.records[0].flag);
    }

    #[test]
    fn test_analyze_target_skips_pending_and_flagged() {
        let config = config();
        let mut state = state_with(2);
        assert_eq!(analyze_target(&state, &config).as_deref(), Some("r-0"));

        state.pending.insert("r-0".to_string());
        assert_eq!(analyze_target(&state, &config), None);

        state.pending.clear();
        state.records[0].flag = true;
        assert_eq!(analyze_target(&state, &config), None);
    }

    #[test]
    fn test_analyze_target_prefers_open_detail() {
        let config = config();
        let state = apply(state_with(3), [BrowserAction::OpenDetail]);
        // Cursor stays on the same row; move cursor semantics don't apply in
        // detail mode, so the overlay id wins.
        assert_eq!(analyze_target(&state, &config).as_deref(), Some("r-0"));
    }

    #[test]
    fn test_flag_survives_overlay_reopen() {
        let state = apply(
            state_with(1),
            [
                BrowserAction::OpenDetail,
                BrowserAction::MarkPending("r-0".to_string()),
                BrowserAction::CloseDetail,
                BrowserAction::ApplyFlag("r-0".to_string()),
                BrowserAction::OpenDetail,
            ],
        );
        let vm = compute_view_model(&state, &config());
        match vm.overlay {
            Some(OverlayVm::Detail(detail)) => assert!(detail.content.flag_set || state.records[0].flag),
            other => panic!("expected detail overlay, got {:?}", other),
        }
        assert!(state.records[0].flag);
    }

    // ------------------------------------------------------------------
    // Create form
    // ------------------------------------------------------------------

    fn create_ready() -> BrowserState<Rec> {
        let mut state = state_with(2);
        state.repositories = vec!["repo-a".to_string(), "repo-b".to_string()];
        apply(state, [BrowserAction::OpenCreate])
    }

    #[test]
    fn test_validate_create_requires_title_and_repo() {
        let state = create_ready();
        assert_eq!(
            validate_create(&state),
            Err("Title is required".to_string())
        );

        let state = apply(state, [BrowserAction::SetCreateTitle("New".to_string())]);
        assert_eq!(
            validate_create(&state),
            Err("Repository is required".to_string())
        );

        let state = apply(state, [BrowserAction::CreateCycleOption]);
        assert_eq!(validate_create(&state), Ok(()));
    }

    #[test]
    fn test_create_draft_contents() {
        let state = apply(
            create_ready(),
            [
                BrowserAction::SetCreateTitle("  New thing  ".to_string()),
                BrowserAction::CreateCycleOption,
                BrowserAction::CreateCycleOption,
            ],
        );
        let draft = create_draft(&state).unwrap();
        assert_eq!(draft.title, "New thing");
        assert_eq!(draft.repository, "repo-b");
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.person, None);
    }

    #[test]
    fn test_created_record_is_prepended() {
        let state = apply(
            create_ready(),
            [
                BrowserAction::MarkSubmitting,
                BrowserAction::ApplyCreated(rec("r-new", "Created", "Open", "repo-b")),
            ],
        );
        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(state.records[0].id, "r-new");
        assert_eq!(state.view.pagination.page_index, 0);
        assert_eq!(state.cursor, 0);
        assert!(state.toast.is_some());
    }

    #[test]
    fn test_create_failed_reenables_form() {
        let state = apply(
            create_ready(),
            [
                BrowserAction::MarkSubmitting,
                BrowserAction::CreateFailed("boom".to_string()),
            ],
        );
        let Mode::Create(form) = &state.mode else {
            panic!("expected create mode");
        };
        assert!(!form.submitting);
    }

    #[test]
    fn test_submit_while_submitting_is_rejected() {
        let state = apply(
            create_ready(),
            [
                BrowserAction::SetCreateTitle("x".to_string()),
                BrowserAction::CreateCycleOption,
                BrowserAction::MarkSubmitting,
            ],
        );
        assert!(validate_create(&state).is_err());
    }

    // ------------------------------------------------------------------
    // Palette
    // ------------------------------------------------------------------

    #[test]
    fn test_palette_open_close_toggle() {
        let mut palette = PaletteState::default();
        assert!(!palette.is_open);
        palette.toggle();
        assert!(palette.is_open);
        palette.toggle();
        assert!(!palette.is_open);
        palette.open();
        palette.close();
        assert!(!palette.is_open);
    }

    #[test]
    fn test_palette_entries_contextual() {
        let config = config();
        let mut state = state_with(2);
        let entries = palette_entries(&state, &config);
        assert!(!entries.contains(&PaletteEntry::ClearRepoFilter));

        state.view.set_filter(REPOSITORY_COLUMN, "repo-a");
        let entries = palette_entries(&state, &config);
        assert!(entries.contains(&PaletteEntry::ClearRepoFilter));
    }

    #[test]
    fn test_palette_fuzzy_query() {
        let config = config();
        let mut state = state_with(2);
        state.palette.open();
        state.palette.query = "quit".to_string();
        let entries = palette_entries(&state, &config);
        assert_eq!(entries, vec![PaletteEntry::Quit]);
    }

    #[test]
    fn test_palette_enter_maps_selection() {
        let config = config();
        let mut state = state_with(2);
        state.palette.open();
        let action = key_to_action(&state, &config, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(action, Some(BrowserAction::OpenCreate));
    }

    // ------------------------------------------------------------------
    // View model
    // ------------------------------------------------------------------

    #[test]
    fn test_view_model_loading_state() {
        let state: BrowserState<Rec> = BrowserState::default();
        let vm = compute_view_model(&state, &config());
        assert_eq!(vm.empty, Some(EmptyKind::Loading));
    }

    #[test]
    fn test_view_model_no_matches() {
        let mut state = state_with(3);
        state.view.set_query("zzz-no-match");
        let vm = compute_view_model(&state, &config());
        assert_eq!(vm.empty, Some(EmptyKind::NoMatches));
        assert!(vm.rows.is_empty());
    }

    #[test]
    fn test_view_model_rows_and_headers_align() {
        let state = state_with(2);
        let vm = compute_view_model(&state, &config());
        assert_eq!(vm.headers.len(), 3);
        for row in &vm.rows {
            assert_eq!(row.cells.len(), vm.headers.len());
        }
    }

    #[test]
    fn test_view_model_detail_overlay_closes_for_missing_record() {
        let mut state = apply(state_with(1), [BrowserAction::OpenDetail]);
        state.records.clear();
        let vm = compute_view_model(&state, &config());
        assert!(vm.overlay.is_none());
    }

    // ------------------------------------------------------------------
    // Key mapping
    // ------------------------------------------------------------------

    #[test]
    fn test_key_mapping_browse() {
        let config = config();
        let state = state_with(2);
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Char('j'), KeyModifiers::NONE),
            Some(BrowserAction::CursorDown)
        );
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Char('/'), KeyModifiers::NONE),
            Some(BrowserAction::FocusQuery)
        );
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Char('a'), KeyModifiers::NONE),
            Some(BrowserAction::AnalyzeRequested)
        );
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Char('a'), KeyModifiers::CONTROL),
            Some(BrowserAction::ToggleSelectPage)
        );
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Enter, KeyModifiers::NONE),
            Some(BrowserAction::OpenDetail)
        );
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Char('x'), KeyModifiers::NONE),
            None
        );
    }

    #[test]
    fn test_key_mapping_query_mode() {
        let config = config();
        let state = apply(state_with(2), [BrowserAction::FocusQuery]);
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Esc, KeyModifiers::NONE),
            Some(BrowserAction::ClearQuery)
        );
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Enter, KeyModifiers::NONE),
            Some(BrowserAction::AcceptQuery)
        );
        // Plain characters go to the text input.
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Char('j'), KeyModifiers::NONE),
            None
        );
    }

    #[test]
    fn test_key_mapping_ctrl_k_everywhere() {
        let config = config();
        for state in [
            state_with(2),
            apply(state_with(2), [BrowserAction::FocusQuery]),
            apply(state_with(2), [BrowserAction::OpenDetail]),
        ] {
            assert_eq!(
                key_to_action(&state, &config, KeyCode::Char('k'), KeyModifiers::CONTROL),
                Some(BrowserAction::TogglePalette)
            );
        }
    }

    #[test]
    fn test_key_mapping_detail_enter_depends_on_tab() {
        let config = config();
        let state = apply(state_with(2), [BrowserAction::OpenDetail]);
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Enter, KeyModifiers::NONE),
            None
        );
        let state = apply(state, [BrowserAction::DetailNextTab]);
        assert_eq!(
            key_to_action(&state, &config, KeyCode::Enter, KeyModifiers::NONE),
            Some(BrowserAction::PostComment)
        );
    }
}
