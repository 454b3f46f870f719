//! Item service inputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::ltree::{Label, LabelPath};
use metahub_core::result::AppResult;
use metahub_database::ItemQuery;
use metahub_entity::item::AttributeValues;

/// Request to create an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    /// Parent item ID.
    pub parent: Option<Uuid>,
    /// Dotted display path of the parent, e.g. `admin.docs`.
    pub parent_path: Option<String>,
    /// `file`, `folder` or `name_folder`.
    #[serde(rename = "type")]
    pub item_type: String,
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
    /// `project` or `dataset`.
    pub container_type: String,
    /// Storage location.
    pub location_uri: Option<String>,
    /// Storage version.
    pub version: Option<String>,
    /// User tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// System tags.
    #[serde(default)]
    pub system_tags: Vec<String>,
    /// Template the attributes belong to.
    pub attribute_template_id: Option<Uuid>,
    /// Attribute values.
    #[serde(default)]
    pub attributes: AttributeValues,
}

/// Partial update of an item. Absent fields are left untouched.
///
/// A changed `parent`/`parent_path` moves the item, a changed `name`
/// renames it; both cascade to descendants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    /// New parent item ID.
    pub parent: Option<Uuid>,
    /// New parent display path.
    pub parent_path: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Owning user name.
    pub owner: Option<String>,
    /// Storage location.
    pub location_uri: Option<String>,
    /// Storage version.
    pub version: Option<String>,
    /// Replaces the user tags.
    pub tags: Option<Vec<String>>,
    /// Replaces the system tags.
    pub system_tags: Option<Vec<String>>,
    /// Template the attributes belong to.
    pub attribute_template_id: Option<Uuid>,
    /// Replaces the attribute values.
    pub attributes: Option<AttributeValues>,
}

impl UpdateItemRequest {
    pub(crate) fn moves(&self) -> bool {
        self.parent.is_some() || self.parent_path.is_some()
    }

    pub(crate) fn touches_attributes(&self) -> bool {
        self.attribute_template_id.is_some() || self.attributes.is_some()
    }
}

/// Search by location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSearch {
    /// Project or dataset code.
    pub container_code: String,
    /// Storage zone.
    pub zone: i32,
    /// Search archived instead of active items.
    #[serde(default)]
    pub archived: bool,
    /// Include the whole subtree below `parent_path`.
    #[serde(default)]
    pub recursive: bool,
    /// Dotted display path to search under.
    pub parent_path: Option<String>,
    /// Exact display name.
    pub name: Option<String>,
}

impl ItemSearch {
    /// Encode the display names into a store query.
    pub fn to_query(&self) -> AppResult<ItemQuery> {
        let parent_path = match self.parent_path.as_deref() {
            Some(p) if !p.is_empty() => Some(LabelPath::from_display(p)?),
            _ => None,
        };
        let name = match self.name.as_deref() {
            Some(n) if !n.is_empty() => Some(Label::encode(n)),
            _ => None,
        };
        if self.container_code.trim().is_empty() {
            return Err(AppError::validation("container_code cannot be empty"));
        }
        Ok(ItemQuery {
            container_code: self.container_code.clone(),
            zone: self.zone,
            archived: self.archived,
            parent_path,
            recursive: self.recursive,
            name,
        })
    }
}
