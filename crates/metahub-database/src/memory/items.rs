//! In-memory item tables.

use async_trait::async_trait;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::ltree::{Label, LabelPath};
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse};
use metahub_entity::item::{
    ContainerType, Item, ItemDetails, ItemExtended, ItemStorage, ItemType,
};

use super::{CatalogState, MemoryTransaction};
use crate::store::{ItemQuery, ItemRepository};

impl CatalogState {
    pub(super) fn details(&self, item: &Item) -> AppResult<ItemDetails> {
        let storage = self.storage.get(&item.id).cloned().ok_or_else(|| {
            AppError::internal(format!("Item {} has no storage row", item.id))
        })?;
        let extended = self.extended.get(&item.id).cloned().ok_or_else(|| {
            AppError::internal(format!("Item {} has no extended row", item.id))
        })?;
        Ok(ItemDetails {
            item: item.clone(),
            storage,
            extended,
        })
    }

    /// Items matching `filter`, in creation order.
    fn ordered_items(&self, filter: impl Fn(&Item) -> bool) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().filter(|i| filter(i)).collect();
        items.sort_by(|a, b| {
            a.created_time
                .cmp(&b.created_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    fn page_details(
        &self,
        items: Vec<&Item>,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        page.slice(items)
            .try_map(|item| self.details(item))
    }

    /// Enforce the unique indexes of the items table for `item`.
    fn check_unique(&self, item: &Item) -> AppResult<()> {
        let clash = self.items.values().any(|other| {
            if other.id == item.id || other.container_code != item.container_code {
                return false;
            }
            match (item.item_type, other.item_type) {
                (ItemType::NameFolder, ItemType::NameFolder) => {
                    other.zone == item.zone
                        && other.name == item.name
                        && other.container_type == item.container_type
                }
                (ItemType::NameFolder, _) | (_, ItemType::NameFolder) => false,
                _ => {
                    !item.archived
                        && !other.archived
                        && other.zone == item.zone
                        && other.parent_path == item.parent_path
                        && other.name == item.name
                }
            }
        });
        if clash {
            return Err(match item.item_type {
                ItemType::NameFolder => {
                    AppError::conflict("A name folder with this name already exists")
                }
                _ => AppError::conflict(
                    "An active item with this name already exists at this location",
                ),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for MemoryTransaction {
    async fn find_item(&mut self, id: Uuid) -> AppResult<Option<Item>> {
        Ok(self.working.items.get(&id).cloned())
    }

    async fn find_details(&mut self, id: Uuid) -> AppResult<Option<ItemDetails>> {
        match self.working.items.get(&id) {
            Some(item) => self.working.details(item).map(Some),
            None => Ok(None),
        }
    }

    async fn find_details_many(
        &mut self,
        ids: &[Uuid],
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let items = self.working.ordered_items(|i| ids.contains(&i.id));
        self.working.page_details(items, page)
    }

    async fn find_by_exact_path(
        &mut self,
        container_code: &str,
        zone: i32,
        path: Option<&LabelPath>,
        name: &Label,
        archived: bool,
    ) -> AppResult<Option<Item>> {
        Ok(self
            .working
            .ordered_items(|i| {
                i.container_code == container_code
                    && i.zone == zone
                    && i.archived == archived
                    && &i.name == name
                    && i.parent_path.as_ref() == path
            })
            .first()
            .map(|i| (*i).clone()))
    }

    async fn find_name_folder(
        &mut self,
        container_code: &str,
        zone: i32,
        container_type: ContainerType,
        name: &Label,
    ) -> AppResult<Option<Item>> {
        Ok(self
            .working
            .ordered_items(|i| {
                i.item_type == ItemType::NameFolder
                    && i.container_code == container_code
                    && i.zone == zone
                    && i.container_type == container_type
                    && &i.name == name
            })
            .first()
            .map(|i| (*i).clone()))
    }

    async fn find_subtree(
        &mut self,
        container_code: &str,
        zone: i32,
        prefix: &LabelPath,
        archived: bool,
    ) -> AppResult<Vec<Item>> {
        let mut items: Vec<Item> = self
            .working
            .ordered_items(|i| {
                let location = if archived {
                    i.restore_path.as_ref()
                } else {
                    i.parent_path.as_ref()
                };
                i.container_code == container_code
                    && i.zone == zone
                    && i.archived == archived
                    && location.is_some_and(|p| p.starts_with(prefix))
            })
            .into_iter()
            .cloned()
            .collect();
        items.sort_by_key(|i| i.location().map_or(0, LabelPath::depth));
        Ok(items)
    }

    async fn search(
        &mut self,
        query: &ItemQuery,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let items = self.working.ordered_items(|i| query.matches(i));
        self.working.page_details(items, page)
    }

    async fn find_storage(&mut self, item_id: Uuid) -> AppResult<Option<ItemStorage>> {
        Ok(self.working.storage.get(&item_id).cloned())
    }

    async fn find_extended(&mut self, item_id: Uuid) -> AppResult<Option<ItemExtended>> {
        Ok(self.working.extended.get(&item_id).cloned())
    }

    async fn insert_item(&mut self, details: &ItemDetails) -> AppResult<()> {
        let item = &details.item;
        if self.working.items.contains_key(&item.id) {
            return Err(AppError::conflict(format!("Item {} already exists", item.id)));
        }
        self.working.check_unique(item)?;
        self.working.items.insert(item.id, item.clone());
        self.working
            .storage
            .insert(item.id, details.storage.clone());
        self.working
            .extended
            .insert(item.id, details.extended.clone());
        Ok(())
    }

    async fn update_item(&mut self, item: &Item) -> AppResult<()> {
        if !self.working.items.contains_key(&item.id) {
            return Err(AppError::not_found(format!("Item {} not found", item.id)));
        }
        self.working.check_unique(item)?;
        self.working.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn update_storage(&mut self, storage: &ItemStorage) -> AppResult<()> {
        self.working.storage.insert(storage.item_id, storage.clone());
        Ok(())
    }

    async fn update_extended(&mut self, extended: &ItemExtended) -> AppResult<()> {
        self.working
            .extended
            .insert(extended.item_id, extended.clone());
        Ok(())
    }

    async fn delete_item(&mut self, id: Uuid) -> AppResult<()> {
        self.working.memberships.retain(|(_, item_id)| *item_id != id);
        self.working.extended.remove(&id);
        self.working.storage.remove(&id);
        self.working.items.remove(&id);
        Ok(())
    }
}
