//! Archive and restore transitions.

use tracing::info;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::ltree::LabelPath;
use metahub_core::result::AppResult;
use metahub_database::{CatalogTransaction, ItemRepository};
use metahub_entity::item::{Item, ItemType};

use super::HierarchyEngine;

impl HierarchyEngine {
    /// Move an item and its subtree into or out of the archive.
    ///
    /// Archiving detaches the subtree root into the flat archived
    /// namespace under a collision-free name and parks every location in
    /// `restore_path`. Restoring resolves the folder named by the root's
    /// `restore_path` and reattaches the subtree there, again under a
    /// collision-free name. Returns the root followed by its descendants.
    pub async fn set_archived(
        &self,
        tx: &mut dyn CatalogTransaction,
        id: Uuid,
        archived: bool,
    ) -> AppResult<Vec<Item>> {
        let item = self.lock_target(tx, id).await?;
        if item.item_type == ItemType::NameFolder {
            return Err(AppError::invalid_operation(
                "Name folders cannot be archived or restored",
            ));
        }
        match (item.archived, archived) {
            (false, true) => self.archive(tx, item).await,
            (true, false) => self.restore(tx, item).await,
            (true, true) => Err(AppError::invalid_operation(format!(
                "Item {id} is already archived"
            ))),
            (false, false) => Err(AppError::invalid_operation(format!(
                "Item {id} is not archived"
            ))),
        }
    }

    async fn archive(&self, tx: &mut dyn CatalogTransaction, mut item: Item) -> AppResult<Vec<Item>> {
        let subtree = self.subtree(tx, &item).await?;
        let old_prefix = item.own_path();

        let name = self
            .available_name(tx, &item.container_code, item.zone, &item.name, None, true)
            .await?;
        item.name = name;
        item.parent = None;
        item.restore_path = item.parent_path.take();
        item.archived = true;
        item.touch();
        tx.update_item(&item).await?;
        let new_prefix = item.own_path();

        let mut affected = Vec::with_capacity(subtree.len() + 1);
        affected.push(item);
        for mut child in subtree.into_items() {
            let path = rebase(child.parent_path.take(), &old_prefix, &new_prefix, child.id)?;
            child.restore_path = Some(path);
            child.archived = true;
            child.touch();
            tx.update_item(&child).await?;
            affected.push(child);
        }

        info!(item_id = %affected[0].id, descendants = affected.len() - 1, "Item archived");
        Ok(affected)
    }

    async fn restore(&self, tx: &mut dyn CatalogTransaction, mut item: Item) -> AppResult<Vec<Item>> {
        let restore_path = item
            .restore_path
            .clone()
            .ok_or_else(|| AppError::invalid_operation("restore destination does not exist"))?;
        let destination = tx
            .find_active_by_name_and_path(
                &item.container_code,
                item.zone,
                restore_path.last(),
                restore_path.parent().as_ref(),
            )
            .await?
            .filter(|d| d.item_type.is_container())
            .ok_or_else(|| AppError::invalid_operation("restore destination does not exist"))?;

        let subtree = self.subtree(tx, &item).await?;
        let old_prefix = item.own_path();

        let name = self
            .available_name(
                tx,
                &item.container_code,
                item.zone,
                &item.name,
                Some(&restore_path),
                false,
            )
            .await?;
        item.name = name;
        item.parent = Some(destination.id);
        item.parent_path = Some(restore_path);
        item.restore_path = None;
        item.archived = false;
        item.touch();
        tx.update_item(&item).await?;
        let new_prefix = item.own_path();

        let mut affected = Vec::with_capacity(subtree.len() + 1);
        affected.push(item);
        for mut child in subtree.into_items() {
            let path = rebase(child.restore_path.take(), &old_prefix, &new_prefix, child.id)?;
            child.parent_path = Some(path);
            child.archived = false;
            child.touch();
            tx.update_item(&child).await?;
            affected.push(child);
        }

        info!(
            item_id = %affected[0].id,
            parent_id = %destination.id,
            descendants = affected.len() - 1,
            "Item restored"
        );
        Ok(affected)
    }
}

/// Swap the subtree root prefix of a descendant location.
fn rebase(
    location: Option<LabelPath>,
    old_prefix: &LabelPath,
    new_prefix: &LabelPath,
    id: Uuid,
) -> AppResult<LabelPath> {
    location
        .and_then(|p| p.replace_prefix(old_prefix, new_prefix))
        .ok_or_else(|| AppError::internal(format!("Item {id} has an inconsistent path")))
}
