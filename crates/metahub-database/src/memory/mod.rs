//! Process-local catalog store.
//!
//! A transaction holds the store's mutex for its whole lifetime and works
//! on a private copy of the state, which replaces the shared state on
//! commit. Writers are therefore fully serialized and an abandoned
//! transaction leaves nothing behind.

mod collections;
mod items;
mod templates;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use metahub_core::result::AppResult;
use metahub_entity::collection::Collection;
use metahub_entity::item::{Item, ItemExtended, ItemStorage};
use metahub_entity::template::AttributeTemplate;

use crate::store::{CatalogStore, CatalogTransaction};

/// All catalog tables.
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogState {
    items: HashMap<Uuid, Item>,
    /// Keyed by item id.
    storage: HashMap<Uuid, ItemStorage>,
    /// Keyed by item id.
    extended: HashMap<Uuid, ItemExtended>,
    templates: HashMap<Uuid, AttributeTemplate>,
    collections: HashMap<Uuid, Collection>,
    /// `(collection_id, item_id)` pairs.
    memberships: BTreeSet<(Uuid, Uuid)>,
}

/// In-memory catalog store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<CatalogState>>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn begin(&self) -> AppResult<Box<dyn CatalogTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// One in-memory transaction.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<CatalogState>,
    working: CatalogState,
}

#[async_trait]
impl CatalogTransaction for MemoryTransaction {
    async fn lock_namespace(&mut self, container_code: &str, zone: i32) -> AppResult<()> {
        // The transaction already holds the store exclusively.
        debug!(container_code, zone, "Namespace lock is implicit in memory store");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
