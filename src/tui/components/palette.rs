//! Command palette modal
//!
//! Fuzzy-searchable command list toggled with Ctrl+K. The open/close state
//! lives in the browser model's `PaletteState`, owned by the screen root.

use iocraft::prelude::*;

use crate::tui::browser::model::PaletteVm;
use crate::tui::components::modal_container::{ModalContainer, ModalWidth};
use crate::tui::components::modal_overlay::ModalOverlay;
use crate::tui::theme::theme;

/// Props for the CommandPalette component
#[derive(Default, Props)]
pub struct CommandPaletteProps {
    pub vm: PaletteVm,
    pub on_query_change: Option<Handler<String>>,
}

/// The command palette modal.
#[component]
pub fn CommandPalette(props: &mut CommandPaletteProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let vm = props.vm.clone();
    let on_query_change = props.on_query_change.clone();

    element! {
        ModalOverlay(show_backdrop: false) {
            ModalContainer(
                width: ModalWidth::Fixed(48),
                title: "Commands".to_string(),
                footer_text: "Enter run · Esc close".to_string(),
            ) {
                View(
                    flex_direction: FlexDirection::Row,
                    border_style: BorderStyle::Round,
                    border_color: theme.border_focused,
                    padding_left: 1,
                    padding_right: 1,
                    height: 3,
                ) {
                    View(margin_right: 1) {
                        Text(content: ">", color: theme.text_dimmed)
                    }
                    View(flex_grow: 1.0) {
                        TextInput(
                            value: vm.query.clone(),
                            has_focus: true,
                            on_change: move |value: String| {
                                if let Some(ref handler) = on_query_change {
                                    handler(value);
                                }
                            },
                            color: theme.text,
                        )
                    }
                }

                #(if vm.entries.is_empty() {
                    Some(element! {
                        View(padding_left: 1, padding_top: 1) {
                            Text(content: "No matching commands", color: theme.text_dimmed)
                        }
                    })
                } else {
                    None
                })

                #(vm.entries.iter().map(|(label, is_cursor)| {
                    let bg = if *is_cursor { Some(theme.highlight) } else { None };
                    let color = if *is_cursor { theme.highlight_text } else { theme.text };
                    let label = label.clone();
                    element! {
                        View(
                            height: 1,
                            flex_direction: FlexDirection::Row,
                            background_color: bg,
                            padding_left: 1,
                        ) {
                            Text(content: label, color: color)
                        }
                    }
                }))
            }
        }
    }
}
