//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use metahub_entity::item::AttributeValues;
use metahub_entity::template::AttributeDefinition;
use metahub_service::collection::{CollectionRename, CreateCollectionRequest};
use metahub_service::hierarchy::Bequest;
use metahub_service::item::{CreateItemRequest, UpdateItemRequest};
use metahub_service::template::TemplateInput;

/// Create item request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemBody {
    /// Parent item ID.
    pub parent: Option<Uuid>,
    /// Dotted display path of the parent.
    pub parent_path: Option<String>,
    /// `file`, `folder` or `name_folder`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub item_type: String,
    /// Storage zone.
    #[validate(range(min = 0, message = "zone cannot be negative"))]
    pub zone: i32,
    /// Display name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Size in bytes.
    #[validate(range(min = 0, message = "size cannot be negative"))]
    pub size: Option<i64>,
    /// Owning user name.
    pub owner: Option<String>,
    /// Project or dataset code.
    #[validate(length(min = 1, message = "container_code is required"))]
    pub container_code: String,
    /// `project` or `dataset`.
    #[validate(length(min = 1, message = "container_type is required"))]
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

impl From<CreateItemBody> for CreateItemRequest {
    fn from(body: CreateItemBody) -> Self {
        Self {
            parent: body.parent,
            parent_path: body.parent_path,
            item_type: body.item_type,
            zone: body.zone,
            name: body.name,
            size: body.size,
            owner: body.owner,
            container_code: body.container_code,
            container_type: body.container_type,
            location_uri: body.location_uri,
            version: body.version,
            tags: body.tags,
            system_tags: body.system_tags,
            attribute_template_id: body.attribute_template_id,
            attributes: body.attributes,
        }
    }
}

/// Update item request body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItemBody {
    /// New parent item ID.
    pub parent: Option<Uuid>,
    /// New parent display path.
    pub parent_path: Option<String>,
    /// New display name.
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    /// Size in bytes.
    #[validate(range(min = 0, message = "size cannot be negative"))]
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

impl From<UpdateItemBody> for UpdateItemRequest {
    fn from(body: UpdateItemBody) -> Self {
        Self {
            parent: body.parent,
            parent_path: body.parent_path,
            name: body.name,
            size: body.size,
            owner: body.owner,
            location_uri: body.location_uri,
            version: body.version,
            tags: body.tags,
            system_tags: body.system_tags,
            attribute_template_id: body.attribute_template_id,
            attributes: body.attributes,
        }
    }
}

/// Bulk create body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkCreateBody {
    /// Items to create in one transaction.
    #[validate(length(min = 1, message = "items cannot be empty"), nested)]
    pub items: Vec<CreateItemBody>,
}

/// Bulk update body. `ids[i]` receives `items[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkUpdateBody {
    /// Target item IDs.
    #[validate(length(min = 1, message = "ids cannot be empty"))]
    pub ids: Vec<Uuid>,
    /// One update per ID.
    #[validate(nested)]
    pub items: Vec<UpdateItemBody>,
}

/// A list of item IDs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemIdsBody {
    /// Item IDs.
    #[validate(length(min = 1, message = "ids cannot be empty"))]
    pub ids: Vec<Uuid>,
}

/// Archive or restore request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ArchiveBody {
    /// `true` to archive, `false` to restore.
    pub archived: bool,
}

/// Values to push down a folder's subtree.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BequeathBody {
    /// Template the attributes belong to.
    pub attribute_template_id: Option<Uuid>,
    /// Attribute values to overwrite on every descendant.
    pub attributes: Option<AttributeValues>,
    /// System tags to overwrite on every descendant.
    pub system_tags: Option<Vec<String>>,
}

impl From<BequeathBody> for Bequest {
    fn from(body: BequeathBody) -> Self {
        Self {
            attribute_template_id: body.attribute_template_id,
            attributes: body.attributes,
            system_tags: body.system_tags,
        }
    }
}

/// Create or replace an attribute template.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TemplateBody {
    /// Template name.
    #[validate(length(min = 1, max = 256, message = "name must be 1-256 characters"))]
    pub name: String,
    /// Owning project.
    #[validate(length(min = 1, message = "project_code is required"))]
    pub project_code: String,
    /// Ordered attribute definitions.
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

impl From<TemplateBody> for TemplateInput {
    fn from(body: TemplateBody) -> Self {
        Self {
            name: body.name,
            project_code: body.project_code,
            attributes: body.attributes,
        }
    }
}

/// Create collection body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCollectionBody {
    /// Client-chosen ID.
    pub id: Option<Uuid>,
    /// Owning user.
    #[validate(length(min = 1, message = "owner is required"))]
    pub owner: String,
    /// Project code.
    #[validate(length(min = 1, message = "container_code is required"))]
    pub container_code: String,
    /// Collection name.
    #[validate(length(min = 1, max = 256, message = "name must be 1-256 characters"))]
    pub name: String,
}

impl From<CreateCollectionBody> for CreateCollectionRequest {
    fn from(body: CreateCollectionBody) -> Self {
        Self {
            id: body.id,
            owner: body.owner,
            container_code: body.container_code,
            name: body.name,
        }
    }
}

/// Rename several collections of one owner.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameCollectionsBody {
    /// Owning user.
    #[validate(length(min = 1, message = "owner is required"))]
    pub owner: String,
    /// Project code.
    #[validate(length(min = 1, message = "container_code is required"))]
    pub container_code: String,
    /// New names.
    #[validate(length(min = 1, message = "collections cannot be empty"))]
    pub collections: Vec<CollectionRename>,
}

/// Items to add to or remove from a collection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CollectionItemsBody {
    /// Item IDs.
    #[validate(length(min = 1, message = "item_ids cannot be empty"))]
    pub item_ids: Vec<Uuid>,
}
