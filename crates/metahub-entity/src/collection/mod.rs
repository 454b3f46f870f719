//! Collection entities.

pub mod model;
pub mod sort;

pub use model::Collection;
pub use sort::CollectionSortKey;
