//! Request validation run before any resolution or I/O.

use super::paging::PageWindow;
use crate::config::DataFilterConfig;
use crate::error::{DataFilterError, Result};
use datafilter_model::HasPaging;
use tracing::debug;

/// Checks paging parameters against the configured limits.
#[derive(Debug, Clone, Copy)]
pub struct PagingValidator<'c> {
    config: &'c DataFilterConfig,
}

impl<'c> PagingValidator<'c> {
    pub fn new(config: &'c DataFilterConfig) -> Self {
        Self { config }
    }

    /// `page` and `pageSize` go together, both at least 1, and `pageSize`
    /// within `max_page_size` when one is configured.
    pub fn validate_paginated(&self, request: &impl HasPaging) -> Result<Option<PageWindow>> {
        validate(request, self.config.max_page_size)
    }

    /// Same pairing rules, with `pageSize` capped by
    /// `autocomplete_max_page_size`.
    pub fn validate_autocomplete(&self, request: &impl HasPaging) -> Result<Option<PageWindow>> {
        validate(request, Some(self.config.autocomplete_max_page_size))
    }
}

fn validate(request: &impl HasPaging, max_page_size: Option<u32>) -> Result<Option<PageWindow>> {
    let (page, page_size) = match (request.page(), request.page_size()) {
        (None, None) => return Ok(None),
        (Some(_), None) => return Err(invalid("pageSize is required when page is set")),
        (None, Some(_)) => return Err(invalid("page is required when pageSize is set")),
        (Some(page), Some(page_size)) => (page, page_size),
    };

    let page = positive("page", page)?;
    let page_size = positive("pageSize", page_size)?;

    if let Some(max) = max_page_size
        && page_size > max
    {
        return Err(invalid(format!(
            "pageSize must be less than or equal to {max}, got {page_size}"
        )));
    }

    Ok(Some(PageWindow { page, page_size }))
}

fn positive(field: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|&value| value >= 1)
        .ok_or_else(|| invalid(format!("{field} must be at least 1, got {value}")))
}

fn invalid(message: impl Into<String>) -> DataFilterError {
    let message = message.into();
    debug!(target: "datafilter::paging", %message, "rejected paging input");
    DataFilterError::InvalidPagingInput(message)
}
