//! Record grid component
//!
//! Renders the header row (sort indicators, column cursor), the body rows
//! for the current page (selection checkbox, drag handle, per-column
//! cells), the empty state, and the pagination footer.

use iocraft::prelude::*;

use crate::grid::schema::Cell;
use crate::tui::browser::model::{EmptyKind, HeaderVm, PaginationVm, RowVm};
use crate::tui::components::empty_state::EmptyState;
use crate::tui::theme::theme;

/// Props for the GridTable component
#[derive(Default, Props)]
pub struct GridTableProps {
    pub headers: Vec<HeaderVm>,
    pub rows: Vec<RowVm>,
    pub pagination: PaginationVm,
    pub empty: Option<EmptyKind>,
    pub all_page_selected: bool,
    /// Whether a row is currently grabbed for reordering.
    pub reordering: bool,
    pub has_focus: bool,
}

/// The record grid: header, page rows, pagination.
#[component]
pub fn GridTable(props: &GridTableProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let border_color = if props.reordering {
        theme.grab_color
    } else if props.has_focus {
        theme.border_focused
    } else {
        theme.border
    };

    let header_checkbox = if props.all_page_selected { "[x]" } else { "[ ]" };

    element! {
        View(
            width: 100pct,
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: border_color,
        ) {
            // Header row
            View(
                width: 100pct,
                height: 1,
                flex_direction: FlexDirection::Row,
                padding_left: 1,
                padding_right: 1,
                background_color: theme.border,
            ) {
                // Select-all checkbox column
                View(width: 4, flex_shrink: 0.0) {
                    Text(content: header_checkbox, color: theme.text)
                }
                // Drag handle column
                View(width: 2, flex_shrink: 0.0) {
                    Text(content: " ", color: theme.text)
                }
                #(props.headers.iter().map(|h| render_header(h)))
            }

            // Body
            #(if props.empty.is_some() {
                Some(element! {
                    View(flex_grow: 1.0, width: 100pct) {
                        EmptyState(kind: props.empty)
                    }
                })
            } else {
                None
            })

            #(props.rows.iter().map(|row| {
                render_row(row, &props.headers)
            }))

            View(flex_grow: 1.0)

            // Pagination footer
            PaginationBar(
                pagination: props.pagination.clone(),
            )
        }
    }
}

fn render_header(header: &HeaderVm) -> AnyElement<'static> {
    let theme = theme();
    let mut title = header.title.clone();
    if let Some(direction) = header.sort {
        title.push(' ');
        title.push_str(direction.indicator());
    }
    let color = if header.is_cursor {
        theme.highlight_text
    } else {
        theme.text
    };
    let weight = if header.is_cursor {
        Weight::Bold
    } else {
        Weight::Normal
    };

    if header.stretch {
        element! {
            View(flex_grow: 1.0, flex_shrink: 1.0, overflow: Overflow::Hidden) {
                Text(content: title, color: color, weight: weight)
            }
        }
        .into_any()
    } else {
        element! {
            View(width: Size::Length(header.width as u32), flex_shrink: 0.0, overflow: Overflow::Hidden) {
                Text(content: title, color: color, weight: weight)
            }
        }
        .into_any()
    }
}

fn render_row(row: &RowVm, headers: &[HeaderVm]) -> AnyElement<'static> {
    let theme = theme();

    let bg_color = if row.grabbed {
        Some(theme.grab_color)
    } else if row.is_cursor {
        Some(theme.highlight)
    } else {
        None
    };
    let text_color = if row.is_cursor || row.grabbed {
        theme.highlight_text
    } else {
        theme.text
    };

    let checkbox = if row.selected { "[x]" } else { "[ ]" };
    let handle = if row.grabbed { "◆" } else { "≡" };

    let cells: Vec<AnyElement<'static>> = row
        .cells
        .iter()
        .zip(headers.iter())
        .map(|(cell, header)| render_cell(cell, header, row.pending, text_color))
        .collect();

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            padding_right: 1,
            background_color: bg_color,
        ) {
            View(width: 4, flex_shrink: 0.0) {
                Text(content: checkbox, color: text_color)
            }
            View(width: 2, flex_shrink: 0.0) {
                Text(content: handle, color: if row.grabbed { theme.highlight_text } else { theme.text_dimmed })
            }
            #(cells)
        }
    }
    .into_any()
}

fn render_cell(
    cell: &Cell,
    header: &HeaderVm,
    pending: bool,
    row_color: Color,
) -> AnyElement<'static> {
    let theme = theme();

    let (content, color) = match cell {
        Cell::Text(text) => (text.clone(), row_color),
        Cell::Badge { label, color } => {
            (format!("[{}]", label), theme.badge_color(*color))
        }
        Cell::IconText { icon, color, label } => {
            (format!("{} {}", icon, label), theme.badge_color(*color))
        }
        Cell::Flag {
            set,
            set_label,
            unset_label,
        } => {
            if *set {
                (format!("✓ {}", set_label), theme.badge_color(crate::grid::BadgeColor::Success))
            } else if pending {
                ("… working".to_string(), theme.text_dimmed)
            } else {
                (format!("▷ {}", unset_label), theme.text_dimmed)
            }
        }
        Cell::People(names) => (names.join(", "), row_color),
    };

    if header.stretch {
        element! {
            View(flex_grow: 1.0, flex_shrink: 1.0, overflow: Overflow::Hidden) {
                Text(content: content, color: color)
            }
        }
        .into_any()
    } else {
        element! {
            View(width: Size::Length(header.width as u32), flex_shrink: 0.0, overflow: Overflow::Hidden) {
                Text(content: content, color: color)
            }
        }
        .into_any()
    }
}

/// Props for the pagination footer.
#[derive(Default, Props)]
pub struct PaginationBarProps {
    pub pagination: PaginationVm,
}

/// Selection summary, rows-per-page, page position, and paging arrows.
#[component]
pub fn PaginationBar(props: &PaginationBarProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let p = &props.pagination;

    let prev_color = if p.can_prev { theme.text } else { theme.text_dimmed };
    let next_color = if p.can_next { theme.text } else { theme.text_dimmed };

    element! {
        View(
            width: 100pct,
            height: 2,
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            padding_left: 1,
            padding_right: 1,
            border_edges: Edges::Top,
            border_style: BorderStyle::Single,
            border_color: theme.border,
        ) {
            Text(
                content: format!("{} of {} row(s) selected.", p.selected_filtered, p.filtered),
                color: theme.text_dimmed,
            )
            View(flex_grow: 1.0)
            View(margin_right: 2) {
                Text(
                    content: format!("Rows per page {} (z)", p.page_size),
                    color: theme.text_dimmed,
                )
            }
            View(margin_right: 2) {
                Text(
                    content: format!("Page {} of {}", p.page_index + 1, p.total_pages),
                    color: theme.text,
                )
            }
            Text(content: "|◀ ", color: prev_color)
            Text(content: "◀ ", color: prev_color)
            Text(content: "▶ ", color: next_color)
            Text(content: "▶|", color: next_color)
        }
    }
}
