//! # metahub-service
//!
//! Business logic for MetaHub. The [`hierarchy`] engine owns every
//! structural item mutation; the services wrap it and the simpler CRUD
//! use cases in one store transaction per call.
//!
//! Services follow constructor injection: the catalog store and limits are
//! provided at construction time.

pub mod collection;
pub mod hierarchy;
pub mod item;
pub mod template;

pub use collection::CollectionService;
pub use hierarchy::HierarchyEngine;
pub use item::ItemService;
pub use template::TemplateService;
