//! Core type definitions used across the MetaHub workspace.

pub mod pagination;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse};
pub use sorting::{Sort, SortDirection, SortKey};
