//! Outbound result shapes.

/// One page of records plus the total number of records matching the filter.
///
/// `count` always reflects the unpaged total, so a page past the end carries
/// empty `data` and the real `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PaginatedResult<T> {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub count: u64,
    pub data: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub fn new(page: Option<u32>, page_size: Option<u32>, count: u64, data: Vec<T>) -> Self {
        Self {
            page,
            page_size,
            count,
            data,
        }
    }

    /// Project every record while keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            page: self.page,
            page_size: self.page_size,
            count: self.count,
            data: self.data.into_iter().map(f).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Result of a search-as-you-type request.
///
/// `has_more` is true when more than the requested page size matched, which
/// is detected by over-fetching a single record rather than counting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AutoCompleteResult<T> {
    pub data: Vec<T>,
    pub has_more: bool,
}

impl<T> AutoCompleteResult<T> {
    pub fn new(data: Vec<T>, has_more: bool) -> Self {
        Self { data, has_more }
    }

    pub fn map<U, F>(self, f: F) -> AutoCompleteResult<U>
    where
        F: FnMut(T) -> U,
    {
        AutoCompleteResult {
            data: self.data.into_iter().map(f).collect(),
            has_more: self.has_more,
        }
    }
}

impl<T> Default for AutoCompleteResult<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            has_more: false,
        }
    }
}
