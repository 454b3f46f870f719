//! Item tags and template attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// Attribute values keyed by attribute name.
pub type AttributeValues = serde_json::Map<String, serde_json::Value>;

/// Free-form metadata stored as JSON on the `extended` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedExtra {
    /// User tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// System tags.
    #[serde(default)]
    pub system_tags: Vec<String>,
    /// Attribute values grouped by template id.
    #[serde(default)]
    pub attributes: BTreeMap<Uuid, AttributeValues>,
}

impl ExtendedExtra {
    /// Build the attribute map for a single template, empty when no
    /// attributes were supplied.
    pub fn template_attributes(
        template_id: Option<Uuid>,
        attributes: AttributeValues,
    ) -> BTreeMap<Uuid, AttributeValues> {
        match template_id {
            Some(id) if !attributes.is_empty() => BTreeMap::from([(id, attributes)]),
            _ => BTreeMap::new(),
        }
    }
}

/// Extended metadata row. One row per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ItemExtended {
    /// Row identifier.
    pub id: Uuid,
    /// Owning item.
    pub item_id: Uuid,
    /// Tags and attributes.
    pub extra: Json<ExtendedExtra>,
}

impl ItemExtended {
    /// Create an extended row for a new item.
    pub fn new(item_id: Uuid, extra: ExtendedExtra) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            extra: Json(extra),
        }
    }
}
