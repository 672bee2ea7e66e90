//! Status tab bar
//!
//! "All / Open / In Progress / ..." tabs with per-status counts over the
//! full collection.

use iocraft::prelude::*;

use crate::tui::browser::model::TabVm;
use crate::tui::theme::theme;

/// Props for the TabBar component
#[derive(Default, Props)]
pub struct TabBarProps {
    pub tabs: Vec<TabVm>,
}

/// Horizontal status tab strip.
#[component]
pub fn TabBar(props: &TabBarProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            column_gap: 2,
            padding_left: 1,
        ) {
            #(props.tabs.iter().map(|tab| {
                let label = format!("{} ({})", tab.label, tab.count);
                let content = if tab.active { format!("[{}]", label) } else { label };
                element! {
                    Text(
                        content: content,
                        color: if tab.active { theme.highlight } else { theme.text_dimmed },
                        weight: if tab.active { Weight::Bold } else { Weight::Normal },
                    )
                }
            }))
        }
    }
}
