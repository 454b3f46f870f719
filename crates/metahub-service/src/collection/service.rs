//! Collection use cases.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use metahub_core::config::CatalogConfig;
use metahub_core::error::AppError;
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse, Sort};
use metahub_database::{
    CatalogStore, CatalogTransaction, CollectionRepository, ItemRepository,
};
use metahub_entity::collection::{Collection, CollectionSortKey};
use metahub_entity::item::{ItemDetails, ItemSortKey};

/// Request to create a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    /// Client-chosen ID, generated when absent.
    pub id: Option<Uuid>,
    /// Owning user.
    pub owner: String,
    /// Project code.
    pub container_code: String,
    /// Collection name; surrounding whitespace is dropped.
    pub name: String,
}

/// New name for one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRename {
    /// Collection ID.
    pub id: Uuid,
    /// New name; surrounding whitespace is dropped.
    pub name: String,
}

/// Manages collections and their members.
#[derive(Clone)]
pub struct CollectionService {
    /// Catalog store.
    store: Arc<dyn CatalogStore>,
    /// Per-owner collection limit.
    max_collections: usize,
}

impl CollectionService {
    /// Creates a new collection service.
    pub fn new(store: Arc<dyn CatalogStore>, config: &CatalogConfig) -> Self {
        Self {
            store,
            max_collections: config.max_collections,
        }
    }

    /// Lists the collections of an owner within a project.
    pub async fn list(
        &self,
        owner: &str,
        container_code: &str,
        sort: Sort<CollectionSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Collection>> {
        let mut tx = self.store.begin().await?;
        tx.list_collections(owner, container_code, sort, page).await
    }

    /// Gets a collection by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<Collection> {
        let mut tx = self.store.begin().await?;
        find_collection(tx.as_mut(), id).await
    }

    /// Creates a collection.
    pub async fn create(&self, request: CreateCollectionRequest) -> AppResult<Collection> {
        let name = normalize_name(&request.name)?;

        let mut tx = self.store.begin().await?;
        let count = tx
            .count_collections(&request.owner, &request.container_code)
            .await?;
        if count >= self.max_collections as u64 {
            return Err(AppError::validation(format!(
                "Cannot create more than {} collections",
                self.max_collections
            )));
        }
        if tx
            .find_collection_by_name(&request.owner, &request.container_code, &name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!("Collection {name} already exists")));
        }

        let collection = Collection::new(request.id, name, request.container_code, request.owner);
        tx.insert_collection(&collection).await?;
        tx.commit().await?;

        info!(collection_id = %collection.id, owner = %collection.owner, "Collection created");
        Ok(collection)
    }

    /// Renames several collections of one owner atomically.
    pub async fn rename_many(
        &self,
        owner: &str,
        container_code: &str,
        renames: Vec<CollectionRename>,
    ) -> AppResult<Vec<Collection>> {
        let mut names = HashSet::new();
        let mut normalized = Vec::with_capacity(renames.len());
        for rename in renames {
            let name = normalize_name(&rename.name)?;
            if !names.insert(name.clone()) {
                return Err(AppError::validation(format!(
                    "Duplicate collection name '{name}' in request"
                )));
            }
            normalized.push((rename.id, name));
        }

        let mut tx = self.store.begin().await?;
        let mut renamed = Vec::with_capacity(normalized.len());
        for (id, name) in normalized {
            let mut collection = find_collection(tx.as_mut(), id).await?;
            if collection.owner != owner || collection.container_code != container_code {
                return Err(AppError::not_found(format!("Collection {id} not found")));
            }
            if let Some(other) = tx
                .find_collection_by_name(owner, container_code, &name)
                .await?
            {
                if other.id != id {
                    return Err(AppError::conflict(format!(
                        "Collection {name} already exists"
                    )));
                }
            }
            collection.name = name;
            collection.last_updated_time = Utc::now();
            tx.update_collection(&collection).await?;
            renamed.push(collection);
        }
        tx.commit().await?;

        info!(owner = %owner, count = renamed.len(), "Collections renamed");
        Ok(renamed)
    }

    /// Deletes a collection. Its items are untouched.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        find_collection(tx.as_mut(), id).await?;
        tx.delete_collection(id).await?;
        tx.commit().await?;

        info!(collection_id = %id, "Collection deleted");
        Ok(())
    }

    /// Adds items to a collection.
    pub async fn add_items(&self, id: Uuid, item_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        find_collection(tx.as_mut(), id).await?;
        for item_id in item_ids {
            if tx.find_details(*item_id).await?.is_none() {
                return Err(AppError::not_found(format!("Item {item_id} not found")));
            }
        }
        tx.add_collection_items(id, item_ids).await?;
        tx.commit().await?;

        info!(collection_id = %id, count = item_ids.len(), "Items added to collection");
        Ok(())
    }

    /// Removes items from a collection.
    pub async fn remove_items(&self, id: Uuid, item_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        find_collection(tx.as_mut(), id).await?;
        tx.remove_collection_items(id, item_ids).await?;
        tx.commit().await?;

        info!(collection_id = %id, count = item_ids.len(), "Items removed from collection");
        Ok(())
    }

    /// Lists the members of a collection, grouped by container type and
    /// ordered by `sort` within each group.
    pub async fn list_items(
        &self,
        id: Uuid,
        archived: bool,
        sort: Sort<ItemSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let mut tx = self.store.begin().await?;
        find_collection(tx.as_mut(), id).await?;
        tx.list_collection_items(id, archived, sort, page).await
    }
}

async fn find_collection(tx: &mut dyn CatalogTransaction, id: Uuid) -> AppResult<Collection> {
    tx.find_collection(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Collection {id} not found")))
}

fn normalize_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Collection name cannot be empty"));
    }
    Ok(trimmed.to_string())
}
