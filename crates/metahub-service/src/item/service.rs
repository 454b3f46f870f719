//! Item use cases. Every public method runs in one store transaction.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use metahub_core::config::CatalogConfig;
use metahub_core::error::AppError;
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse};
use metahub_database::{CatalogStore, CatalogTransaction, ItemRepository};
use metahub_entity::item::{ContainerType, ExtendedExtra, Item, ItemDetails, ItemType};

use super::request::{CreateItemRequest, ItemSearch, UpdateItemRequest};
use crate::hierarchy::{Bequest, HierarchyEngine, NewItem};
use crate::template::check_attributes;

/// A descendant with its depth below the queried item.
#[derive(Debug, Clone)]
pub struct ChildEntry {
    /// Depth relative to the queried item; direct children are at 1.
    pub depth: usize,
    /// The descendant.
    pub details: ItemDetails,
}

/// Manages items.
#[derive(Clone)]
pub struct ItemService {
    /// Catalog store.
    store: Arc<dyn CatalogStore>,
    /// Structural mutations.
    engine: HierarchyEngine,
    /// Tag limits.
    config: CatalogConfig,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(store: Arc<dyn CatalogStore>, config: CatalogConfig) -> Self {
        Self {
            store,
            engine: HierarchyEngine::new(&config),
            config,
        }
    }

    /// Gets an item with its storage and extended rows.
    pub async fn get(&self, id: Uuid) -> AppResult<ItemDetails> {
        let mut tx = self.store.begin().await?;
        tx.find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))
    }

    /// Gets a page of items by ID.
    pub async fn get_many(
        &self,
        ids: &[Uuid],
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let mut tx = self.store.begin().await?;
        tx.find_details_many(ids, page).await
    }

    /// Searches items by location.
    pub async fn search(
        &self,
        search: &ItemSearch,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let query = search.to_query()?;
        let mut tx = self.store.begin().await?;
        tx.search(&query, page).await
    }

    /// Lists every descendant of an item, shallowest first.
    pub async fn children(&self, id: Uuid) -> AppResult<Vec<ChildEntry>> {
        let mut tx = self.store.begin().await?;
        let root = load_details(tx.as_mut(), id).await?.item;
        let subtree = self.engine.read_subtree(tx.as_mut(), &root).await?;

        let mut entries = Vec::with_capacity(subtree.len());
        for descendant in subtree.descendants() {
            entries.push(ChildEntry {
                depth: descendant.depth,
                details: load_details(tx.as_mut(), descendant.item.id).await?,
            });
        }
        Ok(entries)
    }

    /// Creates an item.
    pub async fn create(&self, request: CreateItemRequest) -> AppResult<ItemDetails> {
        let mut tx = self.store.begin().await?;
        let details = self.create_in(tx.as_mut(), request).await?;
        tx.commit().await?;
        Ok(details)
    }

    /// Creates several items atomically.
    ///
    /// Two entries naming the same slot are a validation error, whether the
    /// parent is given by id or by path. Entries may nest under items created
    /// earlier in the same batch.
    pub async fn create_many(
        &self,
        requests: Vec<CreateItemRequest>,
    ) -> AppResult<Vec<ItemDetails>> {
        let mut tx = self.store.begin().await?;
        let mut seen = HashSet::new();
        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            let parent = if request.parent.is_some() || request.parent_path.is_some() {
                let parent = self
                    .engine
                    .resolve_parent(
                        tx.as_mut(),
                        &request.container_code,
                        request.zone,
                        request.parent,
                        request.parent_path.as_deref(),
                    )
                    .await?;
                Some(parent.id)
            } else {
                None
            };
            let slot = (
                request.container_code.clone(),
                request.container_type.clone(),
                request.zone,
                parent,
                request.name.clone(),
            );
            if !seen.insert(slot) {
                return Err(AppError::validation(format!(
                    "Duplicate item '{}' in request",
                    request.name
                )));
            }
            created.push(self.create_in(tx.as_mut(), request).await?);
        }
        tx.commit().await?;

        info!(count = created.len(), "Items created");
        Ok(created)
    }

    /// Updates an item.
    pub async fn update(&self, id: Uuid, request: UpdateItemRequest) -> AppResult<ItemDetails> {
        let mut tx = self.store.begin().await?;
        let details = self.update_in(tx.as_mut(), id, request).await?;
        tx.commit().await?;
        Ok(details)
    }

    /// Updates several items atomically. `ids` and `requests` pair up by
    /// position.
    pub async fn update_many(
        &self,
        ids: &[Uuid],
        requests: Vec<UpdateItemRequest>,
    ) -> AppResult<Vec<ItemDetails>> {
        if ids.len() != requests.len() {
            return Err(AppError::validation(format!(
                "Got {} ids for {} items",
                ids.len(),
                requests.len()
            )));
        }

        let mut tx = self.store.begin().await?;
        let mut updated = Vec::with_capacity(ids.len());
        for (id, request) in ids.iter().zip(requests) {
            updated.push(self.update_in(tx.as_mut(), *id, request).await?);
        }
        tx.commit().await?;
        Ok(updated)
    }

    /// Archives or restores an item and its subtree.
    pub async fn set_archived(&self, id: Uuid, archived: bool) -> AppResult<Vec<ItemDetails>> {
        let mut tx = self.store.begin().await?;
        let items = self.engine.set_archived(tx.as_mut(), id, archived).await?;
        let details = attach_details(tx.as_mut(), items).await?;
        tx.commit().await?;
        Ok(details)
    }

    /// Deletes an item and its subtree. Returns the deleted ids.
    pub async fn delete(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        let mut tx = self.store.begin().await?;
        let deleted = self.engine.delete(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    /// Deletes several items atomically. Items already removed as part of
    /// an earlier subtree in the same call are skipped.
    pub async fn delete_many(&self, ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        let mut tx = self.store.begin().await?;
        let mut deleted: Vec<Uuid> = Vec::new();
        let mut gone: HashSet<Uuid> = HashSet::new();
        for id in ids {
            if gone.contains(id) {
                continue;
            }
            for removed in self.engine.delete(tx.as_mut(), *id).await? {
                gone.insert(removed);
                deleted.push(removed);
            }
        }
        tx.commit().await?;
        Ok(deleted)
    }

    /// Writes attributes and/or system tags onto every descendant of a folder.
    pub async fn bequeath(&self, id: Uuid, bequest: Bequest) -> AppResult<Vec<ItemDetails>> {
        if let Some(tags) = &bequest.system_tags {
            self.check_tag_limit("system tags", tags.len(), self.config.max_system_tags)?;
        }
        let mut tx = self.store.begin().await?;
        let updated = self.engine.bequeath(tx.as_mut(), id, &bequest).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn create_in(
        &self,
        tx: &mut dyn CatalogTransaction,
        request: CreateItemRequest,
    ) -> AppResult<ItemDetails> {
        let item_type: ItemType = request.item_type.parse()?;
        let container_type: ContainerType = request.container_type.parse()?;
        if request.container_code.trim().is_empty() {
            return Err(AppError::validation("container_code cannot be empty"));
        }
        self.check_tag_limit("tags", request.tags.len(), self.config.max_tags)?;
        self.check_tag_limit(
            "system tags",
            request.system_tags.len(),
            self.config.max_system_tags,
        )?;
        check_attributes(tx, request.attribute_template_id, &request.attributes).await?;

        let extra = ExtendedExtra {
            tags: request.tags,
            system_tags: request.system_tags,
            attributes: ExtendedExtra::template_attributes(
                request.attribute_template_id,
                request.attributes,
            ),
        };
        self.engine
            .create(
                tx,
                NewItem {
                    parent: request.parent,
                    parent_path: request.parent_path,
                    name: request.name,
                    item_type,
                    zone: request.zone,
                    size: request.size,
                    owner: request.owner,
                    container_code: request.container_code,
                    container_type,
                    location_uri: request.location_uri,
                    version: request.version,
                    extra,
                },
            )
            .await
    }

    async fn update_in(
        &self,
        tx: &mut dyn CatalogTransaction,
        id: Uuid,
        request: UpdateItemRequest,
    ) -> AppResult<ItemDetails> {
        if let Some(tags) = &request.tags {
            self.check_tag_limit("tags", tags.len(), self.config.max_tags)?;
        }
        if let Some(tags) = &request.system_tags {
            self.check_tag_limit("system tags", tags.len(), self.config.max_system_tags)?;
        }
        let moves = request.moves();
        let touches_attributes = request.touches_attributes();
        let attributes = request.attributes.clone().unwrap_or_default();
        if touches_attributes {
            check_attributes(tx, request.attribute_template_id, &attributes).await?;
        }

        if moves {
            self.engine
                .move_item(
                    tx,
                    id,
                    request.parent,
                    request.parent_path.as_deref(),
                    request.name.as_deref(),
                )
                .await?;
        } else if let Some(name) = &request.name {
            self.engine.rename(tx, id, name).await?;
        }

        let mut details = load_details(tx, id).await?;

        if request.size.is_some() || request.owner.is_some() {
            let item = &mut details.item;
            if let Some(size) = request.size {
                item.size = Some(size);
            }
            if let Some(owner) = request.owner {
                item.owner = Some(owner);
            }
            item.touch();
            tx.update_item(item).await?;
        }

        if request.location_uri.is_some() || request.version.is_some() {
            let storage = &mut details.storage;
            if let Some(uri) = request.location_uri {
                storage.location_uri = Some(uri);
            }
            if let Some(version) = request.version {
                storage.version = Some(version);
            }
            tx.update_storage(storage).await?;
        }

        if request.tags.is_some() || request.system_tags.is_some() || touches_attributes {
            let extra = &mut details.extended.extra;
            if let Some(tags) = request.tags {
                extra.tags = tags;
            }
            if let Some(tags) = request.system_tags {
                extra.system_tags = tags;
            }
            if touches_attributes {
                extra.attributes =
                    ExtendedExtra::template_attributes(request.attribute_template_id, attributes);
            }
            tx.update_extended(&details.extended).await?;
        }

        info!(item_id = %id, "Item updated");
        Ok(details)
    }

    fn check_tag_limit(&self, what: &str, count: usize, max: usize) -> AppResult<()> {
        if count > max {
            return Err(AppError::validation(format!("Maximum of {max} {what}")));
        }
        Ok(())
    }
}

async fn load_details(tx: &mut dyn CatalogTransaction, id: Uuid) -> AppResult<ItemDetails> {
    tx.find_details(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))
}

/// Pair mutated items with their storage and extended rows.
async fn attach_details(
    tx: &mut dyn CatalogTransaction,
    items: Vec<Item>,
) -> AppResult<Vec<ItemDetails>> {
    let mut details = Vec::with_capacity(items.len());
    for item in items {
        let mut loaded = load_details(tx, item.id).await?;
        loaded.item = item;
        details.push(loaded);
    }
    Ok(details)
}
