//! Page-number pagination.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ArgumentError;

/// Default number of records per page for keyword search.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Default number of records per page when a filter and sort run first.
pub const FILTERED_PAGE_SIZE: u64 = 10;

/// Which page of a result set to return. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The 1-based page number.
    pub page_number: u64,

    /// Maximum number of records per page. `None` leaves the choice to the
    /// operation, see [`DEFAULT_PAGE_SIZE`] and [`FILTERED_PAGE_SIZE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: None,
        }
    }
}

impl Pagination {
    /// Creates pagination for the given page.
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size: Some(page_size),
        }
    }

    /// Sets the page number.
    pub fn with_page_number(mut self, page_number: u64) -> Self {
        self.page_number = page_number;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Fills an unset page size with `default_size`.
    pub fn or_page_size(mut self, default_size: u64) -> Self {
        if self.page_size.is_none() {
            self.page_size = Some(default_size);
        }
        self
    }

    /// The page size in effect, [`DEFAULT_PAGE_SIZE`] when unset.
    pub fn effective_page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Checks that both the page number and size are at least 1.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.page_number == 0 {
            return Err(ArgumentError::InvalidPageNumber {
                page_number: self.page_number,
            });
        }
        if self.effective_page_size() == 0 {
            return Err(ArgumentError::InvalidPageSize { page_size: 0 });
        }
        Ok(())
    }

    /// Number of pages needed for `count` records.
    pub fn total_pages(&self, count: usize) -> u64 {
        let page_size = self.effective_page_size();
        if page_size == 0 {
            return 0;
        }
        (count as u64).div_ceil(page_size)
    }

    /// Index range of this page within `count` records, clamped to the end.
    ///
    /// A page past the end yields an empty range.
    pub fn range(&self, count: usize) -> Range<usize> {
        let page_size = self.effective_page_size();
        let start = self.page_number.saturating_sub(1).saturating_mul(page_size);
        let end = start.saturating_add(page_size);
        let clamp = |n: u64| usize::try_from(n).unwrap_or(usize::MAX).min(count);
        clamp(start)..clamp(end)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Number of pages in the full result set.
    pub total_pages: u64,

    /// The page returned.
    pub page_number: u64,

    /// The page size requested.
    pub page_size: u64,

    /// The records on this page, projected.
    pub results: Vec<Value>,
}

impl SearchPage {
    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}
