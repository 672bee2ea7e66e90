//! Column and cell descriptors for the generic grid.
//!
//! A `TableSchema` is the per-entity configuration: one `ColumnSpec` per
//! column, each carrying plain-function accessors for cell rendering,
//! filtering, and sorting. Enum-to-presentation mapping lives in the cell
//! accessors as exhaustive matches with an explicit `Unknown` arm, so an
//! unmapped wire value renders through the default branch instead of
//! crashing.

use jiff::civil::Date;

/// Stable identifier for a column within a schema.
pub type ColumnId = &'static str;

/// A record that can be shown in the grid.
///
/// `id` must be unique within a collection and stable across renders; it is
/// the only key used for selection, reordering, and detail identity.
pub trait GridRecord: Clone + std::fmt::Debug + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Text blob matched by the free-text filter.
    fn search_text(&self) -> String;
}

/// Semantic color token for badges and icons, resolved by the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeColor {
    #[default]
    Default,
    Info,
    Success,
    Warning,
    Danger,
    Accent,
    Muted,
}

/// Render descriptor for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Badge {
        label: String,
        color: BadgeColor,
    },
    IconText {
        icon: &'static str,
        color: BadgeColor,
        label: String,
    },
    /// One-way boolean flag (AI analyzed / AI reviewed).
    Flag {
        set: bool,
        set_label: &'static str,
        unset_label: &'static str,
    },
    People(Vec<String>),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Text(String::new())
    }
}

impl Cell {
    /// Plain-text rendering, used for narrow layouts and tests.
    pub fn plain(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Badge { label, .. } => label.clone(),
            Cell::IconText { icon, label, .. } => format!("{} {}", icon, label),
            Cell::Flag {
                set,
                set_label,
                unset_label,
            } => {
                if *set {
                    (*set_label).to_string()
                } else {
                    (*unset_label).to_string()
                }
            }
            Cell::People(names) => names.join(", "),
        }
    }
}

/// Ordering key produced by a column's sort accessor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    /// Case-folded text.
    Text(String),
    Number(i64),
    Date(Date),
    /// Closed-enum rank (priority, status).
    Rank(u8),
    Flag(bool),
}

impl SortKey {
    pub fn text(s: &str) -> Self {
        SortKey::Text(s.to_lowercase())
    }

    /// Parse a civil date, sorting unparseable values first.
    pub fn date(s: &str) -> Self {
        SortKey::Date(s.parse().unwrap_or(Date::MIN))
    }
}

/// How a column filter matches cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Case-insensitive whole-value match (enum columns).
    Exact,
    /// Column cannot be filtered.
    None,
}

/// One column of the grid.
pub struct ColumnSpec<R> {
    pub id: ColumnId,
    pub title: &'static str,
    /// Rendered width in terminal cells; the title column stretches.
    pub width: u16,
    /// Hidden columns are excluded from render and from the column menu
    /// when not hideable (selection and drag handles are structural and
    /// never part of the schema).
    pub hideable: bool,
    pub sortable: bool,
    pub filter: FilterMode,
    pub text: fn(&R) -> String,
    pub sort_key: fn(&R) -> SortKey,
    pub cell: fn(&R) -> Cell,
}

// All fields are Copy (fn pointers included); manual impls avoid the
// derive's spurious R: Copy bound.
impl<R> Clone for ColumnSpec<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ColumnSpec<R> {}

/// Per-entity grid configuration.
pub struct TableSchema<R> {
    pub columns: Vec<ColumnSpec<R>>,
}

impl<R> Clone for TableSchema<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> TableSchema<R> {
    pub fn new(columns: Vec<ColumnSpec<R>>) -> Self {
        Self { columns }
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnSpec<R>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Columns offered in the "customize columns" menu.
    pub fn hideable_columns(&self) -> impl Iterator<Item = &ColumnSpec<R>> {
        self.columns.iter().filter(|c| c.hideable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_text_case_folds() {
        assert_eq!(SortKey::text("Alpha"), SortKey::text("alpha"));
        assert!(SortKey::text("alpha") < SortKey::text("Beta"));
    }

    #[test]
    fn test_sort_key_date_fallback() {
        let good = SortKey::date("2025-06-01");
        let bad = SortKey::date("not a date");
        assert!(bad < good);
    }

    #[test]
    fn test_cell_plain() {
        assert_eq!(Cell::Text("x".into()).plain(), "x");
        assert_eq!(
            Cell::Flag {
                set: true,
                set_label: "Analyzed",
                unset_label: "Analyze"
            }
            .plain(),
            "Analyzed"
        );
        assert_eq!(
            Cell::People(vec!["a".into(), "b".into()]).plain(),
            "a, b"
        );
    }
}
