//! In-memory collections and memberships.

use async_trait::async_trait;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse, Sort};
use metahub_entity::collection::{Collection, CollectionSortKey};
use metahub_entity::item::{Item, ItemDetails, ItemSortKey};

use super::MemoryTransaction;
use crate::store::CollectionRepository;

impl MemoryTransaction {
    fn check_collection_name(&self, collection: &Collection) -> AppResult<()> {
        let clash = self.working.collections.values().any(|other| {
            other.id != collection.id
                && other.owner == collection.owner
                && other.container_code == collection.container_code
                && other.name == collection.name
        });
        if clash {
            return Err(AppError::conflict("A collection with this name already exists"));
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionRepository for MemoryTransaction {
    async fn list_collections(
        &mut self,
        owner: &str,
        container_code: &str,
        sort: Sort<CollectionSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Collection>> {
        let mut collections: Vec<Collection> = self
            .working
            .collections
            .values()
            .filter(|c| c.owner == owner && c.container_code == container_code)
            .cloned()
            .collect();
        collections.sort_by(|a, b| {
            sort.direction
                .apply(sort.key.compare(a, b))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page.slice(collections))
    }

    async fn count_collections(&mut self, owner: &str, container_code: &str) -> AppResult<u64> {
        Ok(self
            .working
            .collections
            .values()
            .filter(|c| c.owner == owner && c.container_code == container_code)
            .count() as u64)
    }

    async fn find_collection(&mut self, id: Uuid) -> AppResult<Option<Collection>> {
        Ok(self.working.collections.get(&id).cloned())
    }

    async fn find_collection_by_name(
        &mut self,
        owner: &str,
        container_code: &str,
        name: &str,
    ) -> AppResult<Option<Collection>> {
        Ok(self
            .working
            .collections
            .values()
            .find(|c| c.owner == owner && c.container_code == container_code && c.name == name)
            .cloned())
    }

    async fn insert_collection(&mut self, collection: &Collection) -> AppResult<()> {
        if self.working.collections.contains_key(&collection.id) {
            return Err(AppError::conflict(format!(
                "Collection {} already exists",
                collection.id
            )));
        }
        self.check_collection_name(collection)?;
        self.working
            .collections
            .insert(collection.id, collection.clone());
        Ok(())
    }

    async fn update_collection(&mut self, collection: &Collection) -> AppResult<()> {
        self.check_collection_name(collection)?;
        self.working
            .collections
            .insert(collection.id, collection.clone());
        Ok(())
    }

    async fn delete_collection(&mut self, id: Uuid) -> AppResult<()> {
        self.working
            .memberships
            .retain(|(collection_id, _)| *collection_id != id);
        self.working.collections.remove(&id);
        Ok(())
    }

    async fn add_collection_items(
        &mut self,
        collection_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<()> {
        for item_id in item_ids {
            self.working.memberships.insert((collection_id, *item_id));
        }
        Ok(())
    }

    async fn remove_collection_items(
        &mut self,
        collection_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<()> {
        for item_id in item_ids {
            self.working.memberships.remove(&(collection_id, *item_id));
        }
        Ok(())
    }

    async fn list_collection_items(
        &mut self,
        collection_id: Uuid,
        archived: bool,
        sort: Sort<ItemSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let mut items: Vec<&Item> = self
            .working
            .memberships
            .iter()
            .filter(|(c, _)| *c == collection_id)
            .filter_map(|(_, item_id)| self.working.items.get(item_id))
            .filter(|item| item.archived == archived)
            .collect();
        items.sort_by(|a, b| {
            a.container_type
                .cmp(&b.container_type)
                .then_with(|| sort.direction.apply(sort.key.compare(a, b)))
                .then_with(|| a.id.cmp(&b.id))
        });
        page.slice(items)
            .try_map(|item| self.working.details(item))
    }
}
