//! Item storage location.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Where the bytes of an item live. One row per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ItemStorage {
    /// Row identifier.
    pub id: Uuid,
    /// Owning item.
    pub item_id: Uuid,
    /// Object location.
    pub location_uri: Option<String>,
    /// Object version.
    pub version: Option<String>,
}

impl ItemStorage {
    /// Create a storage row for a new item.
    pub fn new(item_id: Uuid, location_uri: Option<String>, version: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            location_uri,
            version,
        }
    }
}
