//! App header bar component
//!
//! Shows the screen title, the active repository filter (with its clear
//! affordance), the active AI model, and the record count.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the Header component
#[derive(Default, Props)]
pub struct HeaderProps {
    /// Screen title (e.g. "Issues")
    pub title: String,
    /// Active repository filter, if any
    pub repo_filter: Option<String>,
    /// Active AI model label
    pub active_model: Option<String>,
    /// Total record count
    pub record_count: Option<usize>,
}

/// App header bar
#[component]
pub fn Header(props: &HeaderProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let title = if props.title.is_empty() {
        "Opsdeck".to_string()
    } else {
        format!("Opsdeck - {}", props.title)
    };

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            padding_right: 1,
            background_color: theme.border,
        ) {
            Text(content: title, color: theme.text, weight: Weight::Bold)

            #(props.repo_filter.as_ref().map(|repo| {
                element! {
                    View(flex_direction: FlexDirection::Row, margin_left: 2) {
                        Text(
                            content: format!("repo: {}", repo),
                            color: theme.highlight_text,
                        )
                        Text(
                            content: " (c to clear)",
                            color: theme.text_dimmed,
                        )
                    }
                }
            }))

            View(flex_grow: 1.0)

            #(props.active_model.as_ref().map(|model| {
                element! {
                    View(margin_right: 2) {
                        Text(
                            content: format!("AI: {}", model),
                            color: theme.text_dimmed,
                        )
                    }
                }
            }))

            #(props.record_count.map(|count| {
                element! {
                    Text(
                        content: format!("{} records", count),
                        color: theme.text_dimmed,
                    )
                }
            }))
        }
    }
}
