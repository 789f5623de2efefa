//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 20;
/// Maximum page size.
pub const MAX_LIMIT: u64 = 100;
/// Highest page number; keeps `offset()` within an SQL `BIGINT`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT;

/// Offset/limit window for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
}

impl PageRequest {
    /// Create a page request, clamping out-of-range values.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(request.limit)
        };
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
        }
    }
}
