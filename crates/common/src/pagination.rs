//! Pagination envelopes for list queries.

use serde::Serialize;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum page size accepted from clients.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of matching rows.
    pub total: u64,
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Total number of pages; zero when there are no rows.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from query results.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }

    /// Map the items of this page, keeping the metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(total / limit)`; zero rows yield zero pages.
#[must_use]
pub const fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Clamp a client-supplied `(page, limit)` pair to sane bounds.
#[must_use]
pub fn clamp_page_params(page: u64, limit: u64) -> (u64, u64) {
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Row offset for a 1-based page number; saturates rather than overflow
/// on absurd page numbers.
#[must_use]
pub const fn page_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn test_total_pages_empty() {
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn test_total_pages_zero_limit() {
        assert_eq!(total_pages(25, 0), 0);
    }

    #[test]
    fn test_clamp_page_params() {
        assert_eq!(clamp_page_params(0, 0), (1, 1));
        assert_eq!(clamp_page_params(3, 500), (3, MAX_PAGE_SIZE));
        assert_eq!(clamp_page_params(2, 10), (2, 10));
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn test_page_offset_saturates() {
        assert_eq!(page_offset(u64::MAX, MAX_PAGE_SIZE), u64::MAX);
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 3);
    }
}
