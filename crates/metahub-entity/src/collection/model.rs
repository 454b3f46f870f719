//! Collection entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named, owner-scoped grouping of items within a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Collection {
    /// Unique collection identifier.
    pub id: Uuid,
    /// Collection name, unique per owner and container.
    pub name: String,
    /// Project or dataset code.
    pub container_code: String,
    /// Owning user name.
    pub owner: String,
    /// When the collection was created.
    pub created_time: DateTime<Utc>,
    /// When the collection was last renamed.
    pub last_updated_time: DateTime<Utc>,
}

impl Collection {
    /// Create a new collection, using `id` when the caller supplied one.
    pub fn new(
        id: Option<Uuid>,
        name: impl Into<String>,
        container_code: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.unwrap_or_else(Uuid::new_v4),
            name: name.into(),
            container_code: container_code.into(),
            owner: owner.into(),
            created_time: now,
            last_updated_time: now,
        }
    }
}
