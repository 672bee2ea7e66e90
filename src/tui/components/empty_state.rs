//! Empty state component
//!
//! Full-area messages for loading, empty collections, and filters that
//! match nothing.

use iocraft::prelude::*;

use crate::tui::browser::model::EmptyKind;
use crate::tui::theme::theme;

/// Props for the EmptyState component
#[derive(Default, Props)]
pub struct EmptyStateProps {
    pub kind: Option<EmptyKind>,
}

/// Empty state display with helpful message
#[component]
pub fn EmptyState(props: &EmptyStateProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let (icon, title, hint) = match props.kind {
        Some(EmptyKind::Loading) => ("~", "Loading", "Loading records..."),
        Some(EmptyKind::NoRecords) => (
            "i",
            "Nothing Here",
            "This collection is empty.",
        ),
        Some(EmptyKind::NoMatches) | None => (
            "?",
            "No results.",
            "Try a different search or filter, or press Esc to clear.",
        ),
    };

    element! {
        View(
            width: 100pct,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
        ) {
            Text(content: format!("[{}]", icon), color: theme.text_dimmed)
            Text(content: title, color: theme.text, weight: Weight::Bold)
            View(margin_top: 1) {
                Text(content: hint, color: theme.text_dimmed)
            }
        }
    }
}
