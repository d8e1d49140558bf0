//! List pagination: request normalization and page math.
//!
//! Every list endpoint responds `{ items, total, page, pages }`. The math
//! here is pure so it can be tested without a database.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Query-string paging parameters, as sent by clients.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// A page of items plus the totals clients need to render pagers.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, window: Window) -> Self {
        Self { items, total, page: window.page, pages: page_count(total, window.limit) }
    }
}

/// Clamp raw query parameters into a usable window. Page floors at 1,
/// limit at 1, and limit caps at [`MAX_LIMIT`].
#[must_use]
pub fn window(query: PageQuery) -> Window {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Window { page, limit, offset: (page - 1) * limit }
}

/// Number of pages needed for `total` rows at `limit` per page. An empty
/// result set still reports one page so clients never render "page 1 of 0".
#[must_use]
pub fn page_count(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 1;
    }
    (total + limit - 1) / limit
}
