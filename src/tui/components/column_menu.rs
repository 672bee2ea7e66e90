//! Customize-columns menu
//!
//! Checkbox list of the hideable columns; structural columns (selection,
//! drag handle) never appear here.

use iocraft::prelude::*;

use crate::tui::browser::model::ColumnsVm;
use crate::tui::components::modal_container::{ModalContainer, ModalWidth};
use crate::tui::components::modal_overlay::ModalOverlay;
use crate::tui::theme::theme;

/// Props for the ColumnMenu component
#[derive(Default, Props)]
pub struct ColumnMenuProps {
    pub vm: ColumnsVm,
}

/// The customize-columns modal.
#[component]
pub fn ColumnMenu(props: &ColumnMenuProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let entries = props.vm.entries.clone();

    element! {
        ModalOverlay(show_backdrop: true) {
            ModalContainer(
                width: ModalWidth::Fixed(36),
                title: "Customize Columns".to_string(),
                footer_text: "Space toggle · Esc close".to_string(),
            ) {
                #(entries.iter().map(|(title, visible, is_cursor)| {
                    let checkbox = if *visible { "[x]" } else { "[ ]" };
                    let bg = if *is_cursor { Some(theme.highlight) } else { None };
                    let color = if *is_cursor { theme.highlight_text } else { theme.text };
                    let title = title.clone();
                    element! {
                        View(
                            height: 1,
                            flex_direction: FlexDirection::Row,
                            background_color: bg,
                            padding_left: 1,
                        ) {
                            Text(content: format!("{} {}", checkbox, title), color: color)
                        }
                    }
                }))
            }
        }
    }
}
