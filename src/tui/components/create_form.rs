//! Entity create form modal
//!
//! Repository picker, title, description, priority, and assignee/reviewer
//! fields. Required-field validation happens before submission; the form
//! is disabled while the simulated create is in flight.

use iocraft::prelude::*;

use crate::tui::browser::model::CreateVm;
use crate::tui::components::modal_container::{ModalContainer, ModalWidth};
use crate::tui::components::modal_overlay::ModalOverlay;
use crate::tui::theme::theme;

/// Props for the CreateForm component
#[derive(Default, Props)]
pub struct CreateFormProps {
    pub vm: CreateVm,
    pub on_title_change: Option<Handler<String>>,
    pub on_description_change: Option<Handler<String>>,
    /// False while another layer (the palette) should receive keystrokes.
    pub inputs_active: Option<bool>,
}

/// The create form modal.
#[component]
pub fn CreateForm(props: &mut CreateFormProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let vm = props.vm.clone();
    let on_title_change = props.on_title_change.clone();
    let on_description_change = props.on_description_change.clone();
    let inputs_active = props.inputs_active.unwrap_or(true);

    let footer = if vm.submitting {
        "Creating...".to_string()
    } else {
        "Enter create · Tab next field · Esc cancel".to_string()
    };

    element! {
        ModalOverlay(show_backdrop: true) {
            ModalContainer(
                width: ModalWidth::Fixed(64),
                title: vm.title.to_string(),
                footer_text: footer,
            ) {
                #(vm.fields.iter().enumerate().map(|(index, field)| {
                    let label_color = if field.focused {
                        theme.border_focused
                    } else {
                        theme.text_dimmed
                    };
                    let value = field.value.clone();
                    let focused = field.focused && !vm.submitting && inputs_active;

                    let body = if field.is_select {
                        let arrow_color = if field.focused {
                            theme.border_focused
                        } else {
                            theme.text_dimmed
                        };
                        element! {
                            View(flex_direction: FlexDirection::Row, column_gap: 1) {
                                Text(content: "◀", color: arrow_color)
                                Text(content: value, color: theme.text)
                                Text(content: "▶", color: arrow_color)
                            }
                        }
                        .into_any()
                    } else {
                        let on_change: Option<Handler<String>> = if index == 1 {
                            on_title_change.clone()
                        } else {
                            on_description_change.clone()
                        };
                        element! {
                            View(
                                border_style: BorderStyle::Round,
                                border_color: if field.focused { theme.border_focused } else { theme.border },
                                height: 3,
                                padding_left: 1,
                                padding_right: 1,
                            ) {
                                TextInput(
                                    value: value,
                                    has_focus: focused,
                                    on_change: move |text: String| {
                                        if let Some(ref handler) = on_change {
                                            handler(text);
                                        }
                                    },
                                    color: theme.text,
                                )
                            }
                        }
                        .into_any()
                    };

                    element! {
                        View(flex_direction: FlexDirection::Column, padding_bottom: 1) {
                            Text(content: field.label, color: label_color, weight: Weight::Bold)
                            #(Some(body))
                        }
                    }
                }))
            }
        }
    }
}
