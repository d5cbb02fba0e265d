//! Common API utilities and shared types

use serde::Deserialize;

/// Default page number (1-indexed)
pub fn default_page() -> i64 {
    1
}

/// Default page size for listings
pub fn default_page_size() -> i64 {
    10
}

/// Pagination query parameters with an optional keyword filter
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Keyword matched against post titles and content
    pub q: Option<String>,
}
