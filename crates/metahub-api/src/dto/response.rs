//! Response DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::ltree::{LabelError, LabelPath};
use metahub_entity::item::{AttributeValues, ContainerType, ItemDetails, ItemType};
use metahub_service::item::ChildEntry;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Store backend name.
    pub backend: String,
    /// `connected` or `unavailable`.
    pub store: String,
}

/// Storage part of an item view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageView {
    /// Row ID.
    pub id: Uuid,
    /// Object location.
    pub location_uri: Option<String>,
    /// Object version.
    pub version: Option<String>,
}

/// Extended part of an item view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedView {
    /// Row ID.
    pub id: Uuid,
    /// User tags.
    pub tags: Vec<String>,
    /// System tags.
    pub system_tags: Vec<String>,
    /// Attribute values keyed by template ID.
    pub attributes: BTreeMap<Uuid, AttributeValues>,
}

/// An item with names and paths decoded for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemView {
    /// Item ID.
    pub id: Uuid,
    /// Parent item ID.
    pub parent: Option<Uuid>,
    /// Dotted display path of the ancestors.
    pub parent_path: Option<String>,
    /// Dotted display path the item was archived from.
    pub restore_path: Option<String>,
    /// Whether the item is archived.
    pub archived: bool,
    /// Item type.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Storage zone.
    pub zone: i32,
    /// Display name.
    pub name: String,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Owning user name.
    pub owner: Option<String>,
    /// Project or dataset code.
    pub container_code: String,
    /// Kind of container.
    pub container_type: ContainerType,
    /// Creation time.
    pub created_time: DateTime<Utc>,
    /// Last update time.
    pub last_updated_time: DateTime<Utc>,
    /// Storage location.
    pub storage: StorageView,
    /// Tags and attributes.
    pub extended: ExtendedView,
}

impl TryFrom<ItemDetails> for ItemView {
    type Error = AppError;

    fn try_from(details: ItemDetails) -> Result<Self, Self::Error> {
        let ItemDetails {
            item,
            storage,
            extended,
        } = details;

        let id = item.id;
        let decode_err = |e: LabelError| {
            let err = AppError::from(e);
            tracing::error!(item_id = %id, error = %err.message, "Failed to decode stored item");
            err
        };
        let name = item.name.decode().map_err(decode_err)?;
        let parent_path = display(item.parent_path.as_ref()).map_err(decode_err)?;
        let restore_path = display(item.restore_path.as_ref()).map_err(decode_err)?;
        let extra = extended.extra.0;

        Ok(Self {
            id,
            parent: item.parent,
            parent_path,
            restore_path,
            archived: item.archived,
            item_type: item.item_type,
            zone: item.zone,
            name,
            size: item.size,
            owner: item.owner,
            container_code: item.container_code,
            container_type: item.container_type,
            created_time: item.created_time,
            last_updated_time: item.last_updated_time,
            storage: StorageView {
                id: storage.id,
                location_uri: storage.location_uri,
                version: storage.version,
            },
            extended: ExtendedView {
                id: extended.id,
                tags: extra.tags,
                system_tags: extra.system_tags,
                attributes: extra.attributes,
            },
        })
    }
}

fn display(path: Option<&LabelPath>) -> Result<Option<String>, LabelError> {
    path.map(LabelPath::to_display).transpose()
}

/// Convert a batch of item rows to views.
pub fn item_views(details: Vec<ItemDetails>) -> Result<Vec<ItemView>, AppError> {
    details.into_iter().map(ItemView::try_from).collect()
}

/// Descendants sharing one depth below the queried item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthGroup {
    /// Depth below the queried item; direct children are at 1.
    pub depth: usize,
    /// The descendants at this depth.
    pub items: Vec<ItemView>,
}

/// Group descendants by depth, shallowest first.
pub fn group_by_depth(entries: Vec<ChildEntry>) -> Result<Vec<DepthGroup>, AppError> {
    let mut groups: Vec<DepthGroup> = Vec::new();
    for entry in entries {
        let view = ItemView::try_from(entry.details)?;
        match groups.last_mut() {
            Some(group) if group.depth == entry.depth => group.items.push(view),
            _ => groups.push(DepthGroup {
                depth: entry.depth,
                items: vec![view],
            }),
        }
    }
    Ok(groups)
}

/// IDs removed by a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Every removed item, subtree members included.
    pub deleted: Vec<Uuid>,
}
