//! Free-text filter input
//!
//! A text input with a search prefix, shown above the grid. Focus is
//! controlled by the browser mode.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the QueryBox component
#[derive(Default, Props)]
pub struct QueryBoxProps {
    pub value: String,
    pub has_focus: bool,
    /// Matching row count shown on the right.
    pub result_count: usize,
    pub on_change: Option<Handler<String>>,
}

/// Search input with a result counter.
#[component]
pub fn QueryBox(props: &mut QueryBoxProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let border_color = if props.has_focus {
        theme.border_focused
    } else {
        theme.border
    };
    let on_change = props.on_change.clone();
    let count = props.result_count;

    element! {
        View(
            flex_direction: FlexDirection::Row,
            border_style: BorderStyle::Round,
            border_color: border_color,
            padding_left: 1,
            padding_right: 1,
            height: 3,
            width: 100pct,
        ) {
            View(margin_right: 1) {
                Text(content: "/", color: theme.text_dimmed)
            }
            View(flex_grow: 1.0) {
                TextInput(
                    value: props.value.clone(),
                    has_focus: props.has_focus,
                    on_change: move |value: String| {
                        if let Some(ref handler) = on_change {
                            handler(value);
                        }
                    },
                    color: theme.text,
                )
            }
            Text(content: format!("{} match(es)", count), color: theme.text_dimmed)
        }
    }
}
