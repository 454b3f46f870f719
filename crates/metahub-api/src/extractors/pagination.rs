//! Pagination and sorting query parameters.

use serde::{Deserialize, Serialize};

use metahub_core::error::AppError;
use metahub_core::types::{PageRequest, Sort, SortKey};

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    25
}

impl PaginationParams {
    /// Converts to a clamped `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

/// Sort field and direction for listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortParams {
    /// Field to sort by.
    pub sorting: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
}

impl SortParams {
    /// Parse against the whitelist of `K`, falling back to the given defaults.
    pub fn into_sort<K: SortKey>(
        self,
        default_key: &str,
        default_order: &str,
    ) -> Result<Sort<K>, AppError> {
        let key = self.sorting.as_deref().unwrap_or(default_key);
        let order = self.order.as_deref().unwrap_or(default_order);
        Sort::parse(key, order)
    }
}
