use std::fmt;

/// Sort order for a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    #[default]
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Asc", alias = "asc", alias = "Ascending", alias = "ascending")
    )]
    Ascending,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Desc", alias = "desc", alias = "Descending", alias = "descending")
    )]
    Descending,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        matches!(self, SortDirection::Descending)
    }

    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("Asc"),
            SortDirection::Descending => f.write_str("Desc"),
        }
    }
}

/// Caller-supplied request to order by one column.
///
/// Directives are order-significant: the first one is the primary sort key,
/// each following one only breaks ties left by the ones before it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SortDirective {
    /// Name of the field/column to sort by. Matched case-insensitively.
    pub sort_column_name: String,
    /// Missing means ascending.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_direction: Option<SortDirection>,
}

impl SortDirective {
    pub fn new(column: impl Into<String>, direction: Option<SortDirection>) -> Self {
        Self {
            sort_column_name: column.into(),
            sort_direction: direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, Some(SortDirection::Ascending))
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, Some(SortDirection::Descending))
    }

    /// Effective direction, defaulting to ascending.
    pub fn direction(&self) -> SortDirection {
        self.sort_direction.unwrap_or_default()
    }
}
