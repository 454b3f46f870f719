//! Collection services.

pub mod service;

pub use service::{CollectionRename, CollectionService, CreateCollectionRequest};
