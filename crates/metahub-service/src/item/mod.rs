//! Item services.

pub mod request;
pub mod service;

pub use request::{CreateItemRequest, ItemSearch, UpdateItemRequest};
pub use service::{ChildEntry, ItemService};
