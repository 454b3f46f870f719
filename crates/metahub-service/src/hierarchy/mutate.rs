//! Create, rename, move and delete.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::ltree::{Label, LabelPath};
use metahub_core::result::AppResult;
use metahub_database::{CatalogTransaction, ItemRepository};
use metahub_entity::item::{
    ContainerType, ExtendedExtra, Item, ItemDetails, ItemExtended, ItemStorage, ItemType,
};

use super::HierarchyEngine;

/// A new item as accepted by [`HierarchyEngine::create`].
///
/// `name` and `parent_path` are display forms; they are encoded here.
#[derive(Debug, Clone)]
pub struct NewItem {
    /// Parent item id.
    pub parent: Option<Uuid>,
    /// Dotted display path of the parent's own path, e.g. `admin.docs`.
    pub parent_path: Option<String>,
    /// Display name.
    pub name: String,
    /// Item type.
    pub item_type: ItemType,
    /// Storage zone.
    pub zone: i32,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Owning user name.
    pub owner: Option<String>,
    /// Project or dataset code.
    pub container_code: String,
    /// Kind of container.
    pub container_type: ContainerType,
    /// Storage location.
    pub location_uri: Option<String>,
    /// Storage version.
    pub version: Option<String>,
    /// Tags and attributes.
    pub extra: ExtendedExtra,
}

/// Reject names the tree cannot hold for `item_type`.
pub(crate) fn validate_name(item_type: ItemType, name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Item name cannot be empty"));
    }
    if item_type == ItemType::Folder && name.contains('.') {
        return Err(AppError::validation("Folder names cannot contain '.'"));
    }
    Ok(())
}

impl HierarchyEngine {
    /// Resolve the parent of an item from an id, a display path, or both.
    ///
    /// The parent must be an active folder or name folder in the given
    /// container and zone.
    pub async fn resolve_parent(
        &self,
        tx: &mut dyn CatalogTransaction,
        container_code: &str,
        zone: i32,
        parent: Option<Uuid>,
        parent_path: Option<&str>,
    ) -> AppResult<Item> {
        let by_path = match parent_path {
            Some(display) => {
                let path = LabelPath::from_display(display)?;
                let found = tx
                    .find_active_by_name_and_path(
                        container_code,
                        zone,
                        path.last(),
                        path.parent().as_ref(),
                    )
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(format!("Parent path '{display}' does not exist"))
                    })?;
                Some(found)
            }
            None => None,
        };

        let resolved = match (parent, by_path) {
            (Some(id), Some(found)) if found.id != id => {
                return Err(AppError::validation(
                    "parent and parent_path refer to different items",
                ));
            }
            (Some(id), None) => tx
                .find_item(id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Parent item {id} not found")))?,
            (_, Some(found)) => found,
            (None, None) => {
                return Err(AppError::validation(
                    "Either parent or parent_path is required",
                ));
            }
        };

        if resolved.archived {
            return Err(AppError::validation("Parent item is archived"));
        }
        if !resolved.item_type.is_container() {
            return Err(AppError::validation("Parent item is not a folder"));
        }
        if resolved.container_code != container_code || resolved.zone != zone {
            return Err(AppError::validation(
                "Parent item belongs to another container or zone",
            ));
        }
        Ok(resolved)
    }

    /// Insert a new item with its storage and extended rows.
    pub async fn create(
        &self,
        tx: &mut dyn CatalogTransaction,
        new: NewItem,
    ) -> AppResult<ItemDetails> {
        validate_name(new.item_type, &new.name)?;
        let has_parent = new.parent.is_some() || new.parent_path.is_some();
        match new.item_type {
            ItemType::NameFolder if has_parent => {
                return Err(AppError::validation(
                    "Name folders cannot have a parent or parent_path",
                ));
            }
            ItemType::File | ItemType::Folder if !has_parent => {
                return Err(AppError::validation(
                    "Files and folders need a parent or parent_path",
                ));
            }
            _ => {}
        }

        tx.lock_namespace(&new.container_code, new.zone).await?;

        let (parent, parent_path) = if has_parent {
            let parent = self
                .resolve_parent(
                    tx,
                    &new.container_code,
                    new.zone,
                    new.parent,
                    new.parent_path.as_deref(),
                )
                .await?;
            if parent.container_type != new.container_type {
                return Err(AppError::validation(
                    "Parent item belongs to another container type",
                ));
            }
            (Some(parent.id), Some(parent.own_path()))
        } else {
            (None, None)
        };

        let name = Label::encode(&new.name);
        let existing = if new.item_type == ItemType::NameFolder {
            tx.find_name_folder(&new.container_code, new.zone, new.container_type, &name)
                .await?
        } else {
            tx.find_by_exact_path(&new.container_code, new.zone, parent_path.as_ref(), &name, false)
                .await?
        };
        if existing.is_some() {
            return Err(AppError::conflict(format!(
                "An item named '{}' already exists at this location",
                new.name
            )));
        }

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            parent,
            parent_path,
            restore_path: None,
            archived: false,
            item_type: new.item_type,
            zone: new.zone,
            name,
            size: new.size,
            owner: new.owner,
            container_code: new.container_code,
            container_type: new.container_type,
            created_time: now,
            last_updated_time: now,
        };
        let details = ItemDetails {
            storage: ItemStorage::new(item.id, new.location_uri, new.version),
            extended: ItemExtended::new(item.id, new.extra),
            item,
        };
        tx.insert_item(&details).await?;

        info!(
            item_id = %details.item.id,
            item_type = %details.item.item_type,
            container_code = %details.item.container_code,
            "Item created"
        );
        Ok(details)
    }

    /// Rename an active item and rewrite the matching path segment of every
    /// descendant. Returns the item followed by its descendants.
    pub async fn rename(
        &self,
        tx: &mut dyn CatalogTransaction,
        id: Uuid,
        new_name: &str,
    ) -> AppResult<Vec<Item>> {
        let mut item = self.lock_target(tx, id).await?;
        if item.archived {
            return Err(AppError::invalid_operation("Archived items cannot be renamed"));
        }
        validate_name(item.item_type, new_name)?;

        let label = Label::encode(new_name);
        if label == item.name {
            return Ok(vec![item]);
        }
        if tx
            .find_by_exact_path(
                &item.container_code,
                item.zone,
                item.parent_path.as_ref(),
                &label,
                false,
            )
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "An item named '{new_name}' already exists at this location"
            )));
        }

        let subtree = self.subtree(tx, &item).await?;
        let index = item.own_path().depth() - 1;

        item.name = label.clone();
        item.touch();
        tx.update_item(&item).await?;

        let mut affected = Vec::with_capacity(subtree.len() + 1);
        affected.push(item);
        for mut child in subtree.into_items() {
            let path = child
                .parent_path
                .as_ref()
                .and_then(|p| p.replace_segment(index, &label))
                .ok_or_else(|| {
                    AppError::internal(format!("Item {} has an inconsistent path", child.id))
                })?;
            child.parent_path = Some(path);
            child.touch();
            tx.update_item(&child).await?;
            affected.push(child);
        }

        info!(item_id = %id, descendants = affected.len() - 1, "Item renamed");
        Ok(affected)
    }

    /// Re-parent an active item under another folder and rewrite the path
    /// prefix of every descendant. With `new_name` the item is renamed in the
    /// same step, so only the final (destination, name) slot must be free.
    /// Returns the item followed by its descendants.
    pub async fn move_item(
        &self,
        tx: &mut dyn CatalogTransaction,
        id: Uuid,
        parent: Option<Uuid>,
        parent_path: Option<&str>,
        new_name: Option<&str>,
    ) -> AppResult<Vec<Item>> {
        let mut item = self.lock_target(tx, id).await?;
        if item.archived {
            return Err(AppError::invalid_operation("Archived items cannot be moved"));
        }
        if item.item_type == ItemType::NameFolder {
            return Err(AppError::invalid_operation("Name folders cannot be moved"));
        }

        let target = self
            .resolve_parent(tx, &item.container_code, item.zone, parent, parent_path)
            .await?;
        if item.parent == Some(target.id) {
            return match new_name {
                Some(name) => self.rename(tx, id, name).await,
                None => Ok(vec![item]),
            };
        }

        let label = match new_name {
            Some(name) => {
                validate_name(item.item_type, name)?;
                Label::encode(name)
            }
            None => item.name.clone(),
        };

        let old_prefix = item.own_path();
        let new_location = target.own_path();
        if new_location.starts_with(&old_prefix) {
            return Err(AppError::validation(
                "An item cannot be moved into itself or one of its descendants",
            ));
        }
        if tx
            .find_by_exact_path(
                &item.container_code,
                item.zone,
                Some(&new_location),
                &label,
                false,
            )
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "An item with this name already exists at the destination",
            ));
        }

        let subtree = self.subtree(tx, &item).await?;

        item.parent = Some(target.id);
        item.parent_path = Some(new_location);
        item.name = label;
        item.touch();
        tx.update_item(&item).await?;
        let new_prefix = item.own_path();

        let mut affected = Vec::with_capacity(subtree.len() + 1);
        affected.push(item);
        for mut child in subtree.into_items() {
            let path = child
                .parent_path
                .as_ref()
                .and_then(|p| p.replace_prefix(&old_prefix, &new_prefix))
                .ok_or_else(|| {
                    AppError::internal(format!("Item {} has an inconsistent path", child.id))
                })?;
            child.parent_path = Some(path);
            child.touch();
            tx.update_item(&child).await?;
            affected.push(child);
        }

        info!(
            item_id = %id,
            parent_id = %target.id,
            descendants = affected.len() - 1,
            "Item moved"
        );
        Ok(affected)
    }

    /// Delete an item and, for folders, its whole subtree deepest first.
    /// Returns the ids of every deleted item.
    pub async fn delete(&self, tx: &mut dyn CatalogTransaction, id: Uuid) -> AppResult<Vec<Uuid>> {
        let item = self.lock_target(tx, id).await?;

        let mut deleted = Vec::new();
        if item.item_type.is_container() {
            let subtree = self.subtree(tx, &item).await?;
            deleted.reserve(subtree.len() + 1);
            for child in subtree.into_items().rev() {
                tx.delete_item(child.id).await?;
                deleted.push(child.id);
            }
        }
        tx.delete_item(item.id).await?;
        deleted.push(item.id);

        info!(item_id = %id, deleted = deleted.len(), "Item deleted");
        Ok(deleted)
    }
}
