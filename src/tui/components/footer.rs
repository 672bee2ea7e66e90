//! Keyboard shortcuts bar component
//!
//! Displays the shortcuts available in the current mode at the bottom of
//! the screen.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// A single keyboard shortcut entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// The key or key combination (e.g., "q", "C-k", "Tab")
    pub key: String,
    /// Description of the action (e.g., "Quit", "Sort", "Next field")
    pub action: String,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Props for the Footer component
#[derive(Default, Props)]
pub struct FooterProps {
    /// List of keyboard shortcuts to display
    pub shortcuts: Vec<Shortcut>,
}

/// Keyboard shortcuts bar at the bottom of the screen
#[component]
pub fn Footer(props: &FooterProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(
            width: 100pct,
            min_height: 1,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            flex_shrink: 0.0,
            padding_left: 1,
            padding_right: 1,
            column_gap: 2,
            background_color: theme.border,
        ) {
            #(props.shortcuts.iter().map(|shortcut| {
                let key = shortcut.key.clone();
                let action = shortcut.action.clone();
                element! {
                    View(flex_direction: FlexDirection::Row) {
                        Text(
                            content: format!("[{}]", key),
                            color: theme.highlight,
                            weight: Weight::Bold,
                        )
                        Text(
                            content: format!(" {}", action),
                            color: theme.text,
                        )
                    }
                }
            }))
        }
    }
}

/// Shortcuts for the normal browse mode.
pub fn browse_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("j/k", "Rows"),
        Shortcut::new("←/→", "Page"),
        Shortcut::new("Space", "Select"),
        Shortcut::new("C-a", "Select Page"),
        Shortcut::new("s", "Sort"),
        Shortcut::new("v", "Columns"),
        Shortcut::new("/", "Search"),
        Shortcut::new("t", "Tab"),
        Shortcut::new("m", "Move Row"),
        Shortcut::new("a", "Analyze"),
        Shortcut::new("n", "New"),
        Shortcut::new("Enter", "Details"),
        Shortcut::new("C-k", "Palette"),
        Shortcut::new("q", "Quit"),
    ]
}

/// Shortcuts while the search box has focus.
pub fn query_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("Enter", "Apply"),
        Shortcut::new("Esc", "Clear & Exit"),
    ]
}

/// Shortcuts while the column menu is open.
pub fn columns_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("j/k", "Navigate"),
        Shortcut::new("Space", "Toggle"),
        Shortcut::new("Esc", "Close"),
    ]
}

/// Shortcuts while a row is grabbed for reordering.
pub fn reorder_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("j/k", "Move"),
        Shortcut::new("Space", "Drop"),
        Shortcut::new("Esc", "Cancel"),
    ]
}

/// Shortcuts while the detail overlay is open.
pub fn detail_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("Tab", "Next Tab"),
        Shortcut::new("a", "Analyze"),
        Shortcut::new("Enter", "Post/Send"),
        Shortcut::new("r", "Resolve"),
        Shortcut::new("Esc", "Close"),
    ]
}

/// Shortcuts while the create form is open.
pub fn create_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("Tab", "Next Field"),
        Shortcut::new("←/→", "Change Option"),
        Shortcut::new("Enter", "Create"),
        Shortcut::new("Esc", "Cancel"),
    ]
}

/// Shortcuts while the command palette is open.
pub fn palette_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("↑/↓", "Navigate"),
        Shortcut::new("Enter", "Run"),
        Shortcut::new("Esc", "Close"),
    ]
}
