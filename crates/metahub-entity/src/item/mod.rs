//! Item domain entities.

pub mod extended;
pub mod kind;
pub mod model;
pub mod sort;
pub mod storage;

pub use extended::{AttributeValues, ExtendedExtra, ItemExtended};
pub use kind::{ContainerType, ItemType};
pub use model::{Item, ItemDetails};
pub use sort::ItemSortKey;
pub use storage::ItemStorage;
