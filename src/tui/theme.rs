//! Theme system for TUI colors and styles.
//!
//! All enum-to-color decisions live here as lookup methods with explicit
//! fallback arms, so an `Unknown` wire value always renders with the
//! default styling.

use iocraft::prelude::Color;

use crate::grid::BadgeColor;
use crate::types::{IssueStatus, MergeStatus, Priority, RecordKind};

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Semantic badge colors
    pub badge_default: Color,
    pub badge_info: Color,
    pub badge_success: Color,
    pub badge_warning: Color,
    pub badge_danger: Color,
    pub badge_accent: Color,
    pub badge_muted: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub id_color: Color,
    pub grab_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let gray = Color::Rgb {
            r: 120,
            g: 120,
            b: 120,
        };
        Self {
            badge_default: Color::White,
            badge_info: Color::Cyan,
            badge_success: Color::Green,
            badge_warning: Color::Yellow,
            badge_danger: Color::Red,
            badge_accent: Color::Magenta,
            badge_muted: gray,

            border: gray,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: gray,
            highlight: Color::Blue,
            highlight_text: Color::White,
            id_color: Color::Cyan,
            grab_color: Color::Yellow,
        }
    }
}

impl Theme {
    /// Resolve a semantic badge token to a terminal color.
    pub fn badge_color(&self, color: BadgeColor) -> Color {
        match color {
            BadgeColor::Default => self.badge_default,
            BadgeColor::Info => self.badge_info,
            BadgeColor::Success => self.badge_success,
            BadgeColor::Warning => self.badge_warning,
            BadgeColor::Danger => self.badge_danger,
            BadgeColor::Accent => self.badge_accent,
            BadgeColor::Muted => self.badge_muted,
        }
    }
}

/// Badge token for an issue status; the fallback arm covers unmapped values.
pub fn issue_status_badge(status: IssueStatus) -> BadgeColor {
    match status {
        IssueStatus::Open => BadgeColor::Success,
        IssueStatus::InProgress => BadgeColor::Info,
        IssueStatus::Closed => BadgeColor::Accent,
        IssueStatus::Unknown => BadgeColor::Default,
    }
}

/// Badge token for a merge request status.
pub fn merge_status_badge(status: MergeStatus) -> BadgeColor {
    match status {
        MergeStatus::Open => BadgeColor::Success,
        MergeStatus::InReview => BadgeColor::Warning,
        MergeStatus::Merged => BadgeColor::Accent,
        MergeStatus::Unknown => BadgeColor::Default,
    }
}

/// Badge token for a priority bucket.
pub fn priority_badge(priority: Priority) -> BadgeColor {
    match priority {
        Priority::Critical => BadgeColor::Danger,
        Priority::High => BadgeColor::Warning,
        Priority::Medium => BadgeColor::Info,
        Priority::Low => BadgeColor::Success,
        Priority::Unknown => BadgeColor::Default,
    }
}

/// Icon and badge token for a record kind.
pub fn kind_presentation(kind: RecordKind) -> (&'static str, BadgeColor) {
    match kind {
        RecordKind::Bug => ("✗", BadgeColor::Danger),
        RecordKind::Feature => ("✦", BadgeColor::Info),
        RecordKind::Security => ("⚠", BadgeColor::Warning),
        RecordKind::Performance => ("↯", BadgeColor::Accent),
        RecordKind::Documentation => ("¶", BadgeColor::Muted),
        RecordKind::Unknown => ("•", BadgeColor::Default),
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
