//! Custom Axum extractors.

pub mod json;
pub mod pagination;
pub mod query;

pub use json::ValidatedJson;
pub use pagination::{PaginationParams, SortParams};
pub use query::ApiQuery;
