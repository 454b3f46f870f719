//! Transactional catalog store abstraction.
//!
//! Services never touch a connection directly. Every top-level operation
//! opens one [`CatalogTransaction`] through [`CatalogStore::begin`], issues
//! its reads and writes through the repository traits, and finishes with
//! [`CatalogTransaction::commit`]. Dropping a transaction without committing
//! discards all of its writes.

use async_trait::async_trait;
use uuid::Uuid;

use metahub_core::ltree::{Label, LabelPath};
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse, Sort};
use metahub_entity::collection::{Collection, CollectionSortKey};
use metahub_entity::item::{
    ContainerType, Item, ItemDetails, ItemExtended, ItemSortKey, ItemStorage,
};
use metahub_entity::template::AttributeTemplate;

/// Filter for location searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    /// Container code.
    pub container_code: String,
    /// Storage zone.
    pub zone: i32,
    /// Match archived or active items.
    pub archived: bool,
    /// Parent path to search under; `None` means the container roots.
    pub parent_path: Option<LabelPath>,
    /// Include everything beneath `parent_path`, not only direct children.
    pub recursive: bool,
    /// Exact encoded name.
    pub name: Option<Label>,
}

impl ItemQuery {
    /// Whether an item satisfies this filter.
    pub fn matches(&self, item: &Item) -> bool {
        if item.container_code != self.container_code
            || item.zone != self.zone
            || item.archived != self.archived
        {
            return false;
        }
        if let Some(name) = &self.name {
            if &item.name != name {
                return false;
            }
        }
        match (&self.parent_path, &item.parent_path) {
            (Some(wanted), Some(actual)) if self.recursive => actual.starts_with(wanted),
            (Some(wanted), Some(actual)) => actual == wanted,
            (Some(_), None) => false,
            (None, actual) => self.recursive || actual.is_none(),
        }
    }
}

/// Item, storage and extended rows.
#[async_trait]
pub trait ItemRepository: Send {
    /// Load an item and lock it for the rest of the transaction.
    async fn find_item(&mut self, id: Uuid) -> AppResult<Option<Item>>;

    /// Load an item with its storage and extended rows.
    async fn find_details(&mut self, id: Uuid) -> AppResult<Option<ItemDetails>>;

    /// Load a page of items by id, in creation order.
    async fn find_details_many(
        &mut self,
        ids: &[Uuid],
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>>;

    /// Find the item with exactly this name, `parent_path` and archive flag.
    ///
    /// `None` matches a null `parent_path`. Archived items never carry a
    /// `parent_path`, so `(None, archived = true)` is the flat archive bucket.
    async fn find_by_exact_path(
        &mut self,
        container_code: &str,
        zone: i32,
        path: Option<&LabelPath>,
        name: &Label,
        archived: bool,
    ) -> AppResult<Option<Item>>;

    /// The name folder `name` of one container kind, if any.
    async fn find_name_folder(
        &mut self,
        container_code: &str,
        zone: i32,
        container_type: ContainerType,
        name: &Label,
    ) -> AppResult<Option<Item>>;

    /// Every item whose location equals `prefix` or lies beneath it,
    /// shallowest first.
    async fn find_subtree(
        &mut self,
        container_code: &str,
        zone: i32,
        prefix: &LabelPath,
        archived: bool,
    ) -> AppResult<Vec<Item>>;

    /// Like [`find_subtree`](Self::find_subtree), with the rows locked for
    /// the rest of the transaction.
    async fn lock_subtree(
        &mut self,
        container_code: &str,
        zone: i32,
        prefix: &LabelPath,
        archived: bool,
    ) -> AppResult<Vec<Item>> {
        self.find_subtree(container_code, zone, prefix, archived)
            .await
    }

    /// Resolve an active item by name and parent path.
    async fn find_active_by_name_and_path(
        &mut self,
        container_code: &str,
        zone: i32,
        name: &Label,
        path: Option<&LabelPath>,
    ) -> AppResult<Option<Item>> {
        self.find_by_exact_path(container_code, zone, path, name, false)
            .await
    }

    /// Search by location.
    async fn search(
        &mut self,
        query: &ItemQuery,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>>;

    /// Load the storage row of an item.
    async fn find_storage(&mut self, item_id: Uuid) -> AppResult<Option<ItemStorage>>;

    /// Load the extended row of an item.
    async fn find_extended(&mut self, item_id: Uuid) -> AppResult<Option<ItemExtended>>;

    /// Insert an item together with its storage and extended rows.
    async fn insert_item(&mut self, details: &ItemDetails) -> AppResult<()>;

    /// Overwrite every mutable column of an item.
    async fn update_item(&mut self, item: &Item) -> AppResult<()>;

    /// Overwrite a storage row.
    async fn update_storage(&mut self, storage: &ItemStorage) -> AppResult<()>;

    /// Overwrite an extended row.
    async fn update_extended(&mut self, extended: &ItemExtended) -> AppResult<()>;

    /// Delete an item, its storage and extended rows and its collection
    /// memberships.
    async fn delete_item(&mut self, id: Uuid) -> AppResult<()>;
}

/// Attribute template rows.
#[async_trait]
pub trait TemplateRepository: Send {
    /// Load a template.
    async fn find_template(&mut self, id: Uuid) -> AppResult<Option<AttributeTemplate>>;

    /// List templates of a project, by name.
    async fn list_templates(
        &mut self,
        project_code: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<AttributeTemplate>>;

    /// Insert a template.
    async fn insert_template(&mut self, template: &AttributeTemplate) -> AppResult<()>;

    /// Overwrite a template.
    async fn update_template(&mut self, template: &AttributeTemplate) -> AppResult<()>;

    /// Delete a template. Returns `false` when it did not exist.
    async fn delete_template(&mut self, id: Uuid) -> AppResult<bool>;
}

/// Collection rows and memberships.
#[async_trait]
pub trait CollectionRepository: Send {
    /// List the collections of an owner within a container.
    async fn list_collections(
        &mut self,
        owner: &str,
        container_code: &str,
        sort: Sort<CollectionSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Collection>>;

    /// Count the collections of an owner within a container.
    async fn count_collections(&mut self, owner: &str, container_code: &str) -> AppResult<u64>;

    /// Load a collection.
    async fn find_collection(&mut self, id: Uuid) -> AppResult<Option<Collection>>;

    /// Find an owner's collection by name.
    async fn find_collection_by_name(
        &mut self,
        owner: &str,
        container_code: &str,
        name: &str,
    ) -> AppResult<Option<Collection>>;

    /// Insert a collection.
    async fn insert_collection(&mut self, collection: &Collection) -> AppResult<()>;

    /// Overwrite a collection.
    async fn update_collection(&mut self, collection: &Collection) -> AppResult<()>;

    /// Delete a collection and its memberships.
    async fn delete_collection(&mut self, id: Uuid) -> AppResult<()>;

    /// Add items to a collection; existing memberships are kept.
    async fn add_collection_items(
        &mut self,
        collection_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<()>;

    /// Remove items from a collection.
    async fn remove_collection_items(
        &mut self,
        collection_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<()>;

    /// List member items ordered by container type, then by `sort`.
    async fn list_collection_items(
        &mut self,
        collection_id: Uuid,
        archived: bool,
        sort: Sort<ItemSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>>;
}

/// One unit of work against the catalog.
#[async_trait]
pub trait CatalogTransaction:
    ItemRepository + TemplateRepository + CollectionRepository + Send
{
    /// Serialize hierarchy mutations within one (container, zone) namespace
    /// until the transaction ends.
    async fn lock_namespace(&mut self, container_code: &str, zone: i32) -> AppResult<()>;

    /// Make every write of this transaction visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write of this transaction.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Factory for catalog transactions.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Open a transaction.
    async fn begin(&self) -> AppResult<Box<dyn CatalogTransaction>>;

    /// Check connectivity.
    async fn ping(&self) -> AppResult<()>;

    /// Backend name for health reporting.
    fn backend(&self) -> &'static str;
}
