//! Hierarchy engine.
//!
//! Items store their ancestry by value: `parent_path` (or `restore_path`
//! while archived) holds the encoded labels of every ancestor. Renaming,
//! moving or archiving a folder therefore rewrites the paths of its whole
//! subtree. Every operation here works on a caller-supplied
//! [`CatalogTransaction`]; the caller commits.

mod archive;
mod bequeath;
mod mutate;
mod naming;
mod subtree;

use uuid::Uuid;

use metahub_core::config::CatalogConfig;
use metahub_core::error::AppError;
use metahub_core::result::AppResult;
use metahub_database::{CatalogTransaction, ItemRepository};
use metahub_entity::item::Item;

pub use bequeath::Bequest;
pub use mutate::NewItem;
pub use naming::split_extension;
pub use subtree::{Descendant, Subtree};

/// Stateless engine for structural item mutations.
#[derive(Debug, Clone)]
pub struct HierarchyEngine {
    /// Candidate names tried before giving up on a collision.
    max_name_attempts: u32,
}

impl HierarchyEngine {
    /// Creates a new engine.
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            max_name_attempts: config.max_name_attempts,
        }
    }

    /// Load an item, take the namespace lock of its (container, zone) and
    /// re-read it under a row lock.
    pub(crate) async fn lock_target(
        &self,
        tx: &mut dyn CatalogTransaction,
        id: Uuid,
    ) -> AppResult<Item> {
        let details = tx
            .find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;
        tx.lock_namespace(&details.item.container_code, details.item.zone)
            .await?;
        tx.find_item(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))
    }
}

#[cfg(test)]
mod tests;
