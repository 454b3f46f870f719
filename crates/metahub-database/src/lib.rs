//! # metahub-database
//!
//! Catalog storage for MetaHub: the PostgreSQL connection pool and
//! migrations, the transactional [`CatalogStore`] abstraction the services
//! are written against, and its two backends.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;
pub use store::{
    CatalogStore, CatalogTransaction, CollectionRepository, ItemQuery, ItemRepository,
    TemplateRepository,
};
