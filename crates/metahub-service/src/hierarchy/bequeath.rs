//! Pushing folder metadata down to descendants.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::result::AppResult;
use metahub_database::{CatalogTransaction, ItemRepository};
use metahub_entity::item::{AttributeValues, ExtendedExtra, ItemDetails};

use super::HierarchyEngine;
use crate::template::check_attributes;

/// Metadata written onto every descendant of a folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bequest {
    /// Template the attributes belong to.
    pub attribute_template_id: Option<Uuid>,
    /// Attribute values; replaces every descendant's attributes.
    pub attributes: Option<AttributeValues>,
    /// Replaces every descendant's system tags.
    pub system_tags: Option<Vec<String>>,
}

impl Bequest {
    fn touches_attributes(&self) -> bool {
        self.attribute_template_id.is_some() || self.attributes.is_some()
    }
}

impl HierarchyEngine {
    /// Overwrite the attributes and/or system tags of every descendant of
    /// a folder. Returns the updated descendants.
    pub async fn bequeath(
        &self,
        tx: &mut dyn CatalogTransaction,
        id: Uuid,
        bequest: &Bequest,
    ) -> AppResult<Vec<ItemDetails>> {
        let item = self.lock_target(tx, id).await?;
        if !item.item_type.is_container() {
            return Err(AppError::invalid_operation(
                "Only folders can pass metadata to their children",
            ));
        }
        if !bequest.touches_attributes() && bequest.system_tags.is_none() {
            return Err(AppError::validation("Nothing to bequeath"));
        }

        let attributes = bequest.attributes.clone().unwrap_or_default();
        if bequest.touches_attributes() {
            check_attributes(tx, bequest.attribute_template_id, &attributes).await?;
        }

        let subtree = self.subtree(tx, &item).await?;
        let mut updated = Vec::with_capacity(subtree.len());
        for child in subtree.into_items() {
            let mut extended = tx.find_extended(child.id).await?.ok_or_else(|| {
                AppError::internal(format!("Item {} has no extended row", child.id))
            })?;
            let storage = tx.find_storage(child.id).await?.ok_or_else(|| {
                AppError::internal(format!("Item {} has no storage row", child.id))
            })?;

            if bequest.touches_attributes() {
                extended.extra.attributes = ExtendedExtra::template_attributes(
                    bequest.attribute_template_id,
                    attributes.clone(),
                );
            }
            if let Some(tags) = &bequest.system_tags {
                extended.extra.system_tags = tags.clone();
            }
            tx.update_extended(&extended).await?;

            updated.push(ItemDetails {
                item: child,
                storage,
                extended,
            });
        }

        info!(item_id = %id, descendants = updated.len(), "Metadata bequeathed");
        Ok(updated)
    }
}
