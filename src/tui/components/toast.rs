//! Toast notification system
//!
//! Transient notification bar used for validation errors, simulated action
//! progress, and success feedback.

use iocraft::prelude::*;
use std::time::Instant;

/// A toast notification message
#[derive(Debug, Clone)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
    /// When the toast was created
    pub timestamp: Instant,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    /// Get the color associated with this toast's level
    pub fn color(&self) -> Color {
        match self.level {
            ToastLevel::Info => Color::Cyan,
            ToastLevel::Warning => Color::Yellow,
            ToastLevel::Error => Color::Red,
            ToastLevel::Success => Color::Green,
        }
    }
}

/// Props for the ToastNotification component
#[derive(Default, Props)]
pub struct ToastNotificationProps {
    /// The toast to display
    pub toast: Option<Toast>,
}

/// Notification bar rendered above the footer when a toast is active.
#[component]
pub fn ToastNotification(props: &ToastNotificationProps) -> impl Into<AnyElement<'static>> {
    element! {
        View() {
            #(props.toast.as_ref().map(|t| {
                element! {
                    View(
                        width: 100pct,
                        height: 3,
                        align_items: AlignItems::Center,
                        justify_content: JustifyContent::Center,
                        background_color: Color::Black,
                        border_edges: Edges::Top,
                        border_style: BorderStyle::Single,
                        border_color: t.color(),
                    ) {
                        Text(content: t.message.clone(), color: t.color())
                    }
                }
            }))
        }
    }
}
