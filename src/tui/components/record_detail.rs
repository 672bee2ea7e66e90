//! Record detail overlay
//!
//! Modal presenting one record's full detail with tabbed sub-views:
//! details, threaded comments (overlay-scoped), AI analysis/review, and an
//! AI chat transcript. Opening never mutates the record.

use iocraft::prelude::*;

use crate::tui::browser::model::{ChatMessage, Comment, DetailTab, DetailVm};
use crate::tui::components::modal_container::{ModalContainer, ModalHeight, ModalWidth};
use crate::tui::components::modal_overlay::ModalOverlay;
use crate::tui::theme::theme;

const DETAIL_TABS: &[DetailTab] = &[
    DetailTab::Details,
    DetailTab::Comments,
    DetailTab::Analysis,
    DetailTab::AskAi,
];

/// Props for the RecordDetail component
#[derive(Default, Props)]
pub struct RecordDetailProps {
    pub vm: DetailVm,
    pub on_comment_change: Option<Handler<String>>,
    pub on_chat_change: Option<Handler<String>>,
    /// False while another layer (the palette) should receive keystrokes.
    pub inputs_active: Option<bool>,
}

/// The detail overlay modal.
#[component]
pub fn RecordDetail(props: &mut RecordDetailProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let vm = props.vm.clone();
    let on_comment_change = props.on_comment_change.clone();
    let on_chat_change = props.on_chat_change.clone();
    let inputs_active = props.inputs_active.unwrap_or(true);

    let status_color = theme.badge_color(vm.content.status_color);

    element! {
        ModalOverlay(show_backdrop: true) {
            ModalContainer(
                width: ModalWidth::Percent(80),
                height: ModalHeight::Percent(80),
                title: vm.content.title.clone(),
                footer_text: "Tab switch tab · r resolve · Esc close".to_string(),
            ) {
                // Status line
                View(flex_direction: FlexDirection::Row, padding_bottom: 1) {
                    Text(
                        content: format!("[{}]", vm.content.status_label),
                        color: status_color,
                    )
                    Text(
                        content: format!(" · {} · {}", vm.content.repository, vm.content.id),
                        color: theme.text_dimmed,
                    )
                }

                // Tab bar
                View(flex_direction: FlexDirection::Row, column_gap: 2, padding_bottom: 1) {
                    #(DETAIL_TABS.iter().map(|tab| {
                        let active = *tab == vm.tab;
                        let label = if *tab == DetailTab::Analysis {
                            vm.analysis_title.to_string()
                        } else {
                            tab.label().to_string()
                        };
                        element! {
                            Text(
                                content: if active { format!("[{}]", label) } else { label },
                                color: if active { theme.highlight } else { theme.text_dimmed },
                                weight: if active { Weight::Bold } else { Weight::Normal },
                            )
                        }
                    }))
                }

                // Tab content
                #(Some(match vm.tab {
                    DetailTab::Details => details_tab(&vm),
                    DetailTab::Comments => comments_tab(&vm, on_comment_change, inputs_active),
                    DetailTab::Analysis => analysis_tab(&vm),
                    DetailTab::AskAi => ask_ai_tab(&vm, on_chat_change, inputs_active),
                }))
            }
        }
    }
}

fn details_tab(vm: &DetailVm) -> AnyElement<'static> {
    let theme = theme();
    let content = vm.content.clone();

    element! {
        View(flex_direction: FlexDirection::Column, width: 100pct, overflow: Overflow::Hidden) {
            // Field grid
            #(content.fields.iter().map(|(label, value)| {
                let label = *label;
                let value = value.clone();
                element! {
                    View(flex_direction: FlexDirection::Row, height: 1) {
                        View(width: 14, flex_shrink: 0.0) {
                            Text(content: format!("{}:", label), color: theme.text_dimmed)
                        }
                        Text(content: value, color: theme.text)
                    }
                }
            }))

            // Labels / reviewers
            View(flex_direction: FlexDirection::Row, height: 1) {
                View(width: 14, flex_shrink: 0.0) {
                    Text(content: format!("{}:", content.tags_title), color: theme.text_dimmed)
                }
                Text(
                    content: if content.tags.is_empty() {
                        "-".to_string()
                    } else {
                        content.tags.join(", ")
                    },
                    color: theme.id_color,
                )
            }

            // Description
            View(padding_top: 1, flex_direction: FlexDirection::Column) {
                Text(content: "Description", color: theme.text, weight: Weight::Bold)
                #(content.description.iter().map(|paragraph| {
                    let paragraph = paragraph.clone();
                    element! {
                        View(padding_top: 1) {
                            Text(content: paragraph, color: theme.text_dimmed)
                        }
                    }
                }))
            }

            // Activity
            View(padding_top: 1, flex_direction: FlexDirection::Column) {
                Text(content: "Activity", color: theme.text, weight: Weight::Bold)
                #(content.activity.iter().map(|line| {
                    let line = line.clone();
                    element! {
                        Text(content: format!("• {}", line), color: theme.text_dimmed)
                    }
                }))
            }
        }
    }
    .into_any()
}

fn comments_tab(
    vm: &DetailVm,
    on_change: Option<Handler<String>>,
    inputs_active: bool,
) -> AnyElement<'static> {
    let theme = theme();
    let comments: Vec<Comment> = vm.comments.clone();
    let draft = vm.comment_draft.clone();

    element! {
        View(flex_direction: FlexDirection::Column, width: 100pct, flex_grow: 1.0) {
            View(flex_direction: FlexDirection::Column, flex_grow: 1.0, overflow: Overflow::Hidden) {
                #(comments.iter().map(|comment| {
                    let comment = comment.clone();
                    element! {
                        View(flex_direction: FlexDirection::Column, padding_bottom: 1) {
                            View(flex_direction: FlexDirection::Row) {
                                Text(content: comment.author, color: theme.id_color, weight: Weight::Bold)
                                Text(content: format!("  {}", comment.age), color: theme.text_dimmed)
                            }
                            Text(content: comment.body, color: theme.text)
                        }
                    }
                }))
            }

            // Composer
            View(
                flex_direction: FlexDirection::Row,
                border_style: BorderStyle::Round,
                border_color: theme.border_focused,
                padding_left: 1,
                padding_right: 1,
                height: 3,
            ) {
                View(flex_grow: 1.0) {
                    TextInput(
                        value: draft,
                        has_focus: inputs_active,
                        on_change: move |value: String| {
                            if let Some(ref handler) = on_change {
                                handler(value);
                            }
                        },
                        color: theme.text,
                    )
                }
                Text(content: " Enter to post", color: theme.text_dimmed)
            }
        }
    }
    .into_any()
}

fn analysis_tab(vm: &DetailVm) -> AnyElement<'static> {
    let theme = theme();
    let content = vm.content.clone();
    let pending = vm.pending;
    let action_label = vm.action_label;

    if !content.flag_set {
        let cta = if pending {
            "Working on it...".to_string()
        } else {
            format!("Press 'a' to run {}", action_label.to_lowercase())
        };
        return element! {
            View(
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_grow: 1.0,
            ) {
                Text(content: "No AI results yet", color: theme.text, weight: Weight::Bold)
                View(padding_top: 1) {
                    Text(content: cta, color: theme.text_dimmed)
                }
            }
        }
        .into_any();
    }

    element! {
        View(flex_direction: FlexDirection::Column, width: 100pct, overflow: Overflow::Hidden) {
            View(flex_direction: FlexDirection::Row, padding_bottom: 1) {
                Text(content: "✓ ", color: theme.badge_success)
                Text(
                    content: format!("{} insights", content.insights.len()),
                    color: theme.text_dimmed,
                )
            }
            #(content.insights.iter().map(|insight| {
                let insight = insight.clone();
                element! {
                    View(
                        flex_direction: FlexDirection::Column,
                        border_style: BorderStyle::Round,
                        border_color: theme.border,
                        padding_left: 1,
                        padding_right: 1,
                        margin_bottom: 1,
                    ) {
                        Text(content: insight.title, color: theme.text, weight: Weight::Bold)
                        Text(content: insight.body, color: theme.text_dimmed)
                    }
                }
            }))
        }
    }
    .into_any()
}

fn ask_ai_tab(
    vm: &DetailVm,
    on_change: Option<Handler<String>>,
    inputs_active: bool,
) -> AnyElement<'static> {
    let theme = theme();
    let chat: Vec<ChatMessage> = vm.chat.clone();
    let draft = vm.chat_draft.clone();

    element! {
        View(flex_direction: FlexDirection::Column, width: 100pct, flex_grow: 1.0) {
            View(flex_direction: FlexDirection::Column, flex_grow: 1.0, overflow: Overflow::Hidden) {
                #(chat.iter().map(|message| {
                    let body = message.body.clone();
                    let from_user = message.from_user;
                    element! {
                        View(flex_direction: FlexDirection::Row, padding_bottom: 1) {
                            View(width: 5, flex_shrink: 0.0) {
                                Text(
                                    content: if from_user { "you" } else { "AI" },
                                    color: if from_user { theme.id_color } else { theme.badge_accent },
                                    weight: Weight::Bold,
                                )
                            }
                            Text(content: body, color: theme.text)
                        }
                    }
                }))
            }

            View(
                flex_direction: FlexDirection::Row,
                border_style: BorderStyle::Round,
                border_color: theme.border_focused,
                padding_left: 1,
                padding_right: 1,
                height: 3,
            ) {
                View(flex_grow: 1.0) {
                    TextInput(
                        value: draft,
                        has_focus: inputs_active,
                        on_change: move |value: String| {
                            if let Some(ref handler) = on_change {
                                handler(value);
                            }
                        },
                        color: theme.text,
                    )
                }
                Text(content: " Enter to send", color: theme.text_dimmed)
            }
        }
    }
    .into_any()
}
