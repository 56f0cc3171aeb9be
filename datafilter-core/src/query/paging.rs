//! 1-based page arithmetic shared by the executors.

/// A validated page request. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    /// Paging only applies when both values are present.
    pub fn from_parts(page: Option<u32>, page_size: Option<u32>) -> Option<Self> {
        match (page, page_size) {
            (Some(page), Some(page_size)) => Some(Self { page, page_size }),
            _ => None,
        }
    }

    /// Records skipped before this page, saturating instead of overflowing.
    pub fn offset(&self) -> usize {
        let preceding = u64::from(self.page.saturating_sub(1));
        let offset = preceding.saturating_mul(u64::from(self.page_size));
        usize::try_from(offset).unwrap_or(usize::MAX)
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }

    /// One more than the page holds, to detect a following page.
    pub fn over_fetch_limit(&self) -> usize {
        self.limit().saturating_add(1)
    }
}
