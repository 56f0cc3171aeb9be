//! Inbound request shapes.
//!
//! The filter is opaque to the engine: callers apply it to their query source
//! before handing the source over, the request only carries it along.

use crate::sorting::SortDirective;

/// Anything that carries optional 1-based paging parameters.
///
/// Values are signed so that validation can reject zero and negative input
/// instead of it being silently unrepresentable.
pub trait HasPaging {
    fn page(&self) -> Option<i32>;
    fn page_size(&self) -> Option<i32>;
}

/// Request for one sorted page of records.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PaginatedItemsQuery<F> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub page: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub page_size: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sorting: Vec<SortDirective>,
    pub filter: Option<F>,
}

impl<F> PaginatedItemsQuery<F> {
    pub fn new(
        page: Option<i32>,
        page_size: Option<i32>,
        sorting: Vec<SortDirective>,
        filter: Option<F>,
    ) -> Self {
        Self {
            page,
            page_size,
            sorting,
            filter,
        }
    }
}

impl<F> Default for PaginatedItemsQuery<F> {
    fn default() -> Self {
        Self {
            page: None,
            page_size: None,
            sorting: Vec::new(),
            filter: None,
        }
    }
}

impl<F> HasPaging for PaginatedItemsQuery<F> {
    fn page(&self) -> Option<i32> {
        self.page
    }

    fn page_size(&self) -> Option<i32> {
        self.page_size
    }
}

/// Search-as-you-type request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AutoCompleteQuery<F> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub page: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub page_size: Option<i32>,
    pub filter: F,
}

impl<F> AutoCompleteQuery<F> {
    pub fn new(page: Option<i32>, page_size: Option<i32>, filter: F) -> Self {
        Self {
            page,
            page_size,
            filter,
        }
    }
}

impl<F> HasPaging for AutoCompleteQuery<F> {
    fn page(&self) -> Option<i32> {
        self.page
    }

    fn page_size(&self) -> Option<i32> {
        self.page_size
    }
}
